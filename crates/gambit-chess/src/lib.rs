//! Chess rules for Gambit.
//!
//! [`StandardChess`] plugs the `chess` crate's move generator into a
//! Gambit table as its [`RulesOracle`](gambit_table::RulesOracle), with
//! positions exchanged as FEN.
//!
//! ```rust
//! use gambit_chess::{StandardChess, parse_fen};
//! use gambit_protocol::{MoveRequest, Role};
//! use gambit_table::RulesOracle;
//!
//! let start = parse_fen(None).unwrap();
//! let next = StandardChess::apply(&start, &MoveRequest::new("e2", "e4")).unwrap();
//! assert_eq!(StandardChess::mover(&next), Role::Black);
//! ```

mod error;
mod position;
mod rules;

pub use error::ChessError;
pub use position::ChessPosition;
pub use rules::StandardChess;

use std::str::FromStr;

/// Parses a starting position, defaulting to the standard opening setup.
///
/// The halfmove clock and fullmove number are read from the FEN when
/// present.
///
/// # Errors
/// Returns [`ChessError::InvalidFen`] if `fen` is not a legal position.
pub fn parse_fen(fen: Option<&str>) -> Result<ChessPosition, ChessError> {
    match fen {
        None => Ok(ChessPosition::default()),
        Some(fen) => ChessPosition::from_str(fen),
    }
}
