//! The `RulesOracle` trait: the table's only window into the game rules.
//!
//! The table never looks at pieces or squares. It asks the oracle three
//! questions: whose move is it in this position, what position results
//! from this move, and how do I write this position on the wire.

use std::fmt;

use gambit_protocol::{MoveRequest, Role};

/// Returned by [`RulesOracle::apply`] when a move is not legal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("illegal move")]
pub struct IllegalMove;

/// How a finished game ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The side to move is mated; `winner` delivered mate.
    Checkmate { winner: Role },
    /// The side to move has no legal move and is not in check.
    Stalemate,
    /// Drawn by rule, e.g. `"insufficient material"`.
    Draw { reason: &'static str },
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Checkmate { winner } => {
                write!(f, "Checkmate. {winner} wins.")
            }
            Self::Stalemate => write!(f, "Stalemate. The game is drawn."),
            Self::Draw { reason } => {
                write!(f, "Draw by {reason}. The game is drawn.")
            }
        }
    }
}

/// A rules engine for a two-player, alternating-turn board game.
///
/// Every method is an associated function over an explicit position, so
/// the oracle itself holds no state: the table owns the one position and
/// replaces it with whatever [`apply`](Self::apply) returns.
///
/// # Example
///
/// ```rust
/// use gambit_protocol::{MoveRequest, Role};
/// use gambit_table::{IllegalMove, RulesOracle};
///
/// /// A "game" where any move passes the turn. Position = plies played.
/// struct PassTheTurn;
///
/// impl RulesOracle for PassTheTurn {
///     type Position = u32;
///
///     fn mover(plies: &u32) -> Role {
///         if plies % 2 == 0 { Role::White } else { Role::Black }
///     }
///
///     fn apply(plies: &u32, _mv: &MoveRequest) -> Result<u32, IllegalMove> {
///         Ok(plies + 1)
///     }
///
///     fn notation(plies: &u32) -> String {
///         plies.to_string()
///     }
/// }
///
/// assert_eq!(PassTheTurn::mover(&1), Role::Black);
/// ```
pub trait RulesOracle: Send + Sync + 'static {
    /// A complete game position. Replaced, never mutated, by the table.
    type Position: Send + 'static;

    /// Returns the side entitled to move in `position`.
    ///
    /// This is the only source of "whose turn is it"; the table never
    /// tracks the mover separately.
    fn mover(position: &Self::Position) -> Role;

    /// Plays `mv` from `position` and returns the resulting position.
    ///
    /// # Errors
    /// Returns [`IllegalMove`] if the move is not legal in `position`,
    /// including when its squares or piece letters don't parse.
    fn apply(
        position: &Self::Position,
        mv: &MoveRequest,
    ) -> Result<Self::Position, IllegalMove>;

    /// Writes `position` in the portable notation sent as `boardState`.
    fn notation(position: &Self::Position) -> String;

    /// Returns how the game ended, or `None` while it is still going.
    ///
    /// Default: games never end.
    fn outcome(_position: &Self::Position) -> Option<Outcome> {
        None
    }
}
