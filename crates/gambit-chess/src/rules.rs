//! Standard chess as a [`RulesOracle`].

use std::str::FromStr;

use chess::{Board, BoardStatus, ChessMove, Color, Piece, Rank, Square};
use gambit_protocol::{MoveRequest, Role};
use gambit_table::{IllegalMove, Outcome, RulesOracle};

use crate::ChessPosition;

/// Standard chess, backed by the `chess` crate's move generator.
///
/// Positions travel as FEN. A move is two squares in lowercase algebraic
/// form (`"e2"`, `"e4"`) plus an optional promotion letter.
///
/// Promotion follows the usual browser-client convention: clients may
/// send a promotion letter with every move. It is ignored unless a pawn
/// is moving onto its last rank, and required when one is.
///
/// Games end in checkmate or stalemate, and are drawn automatically on
/// insufficient material, after fifty moves without a capture or pawn
/// move, or when a position occurs for the third time.
pub struct StandardChess;

impl RulesOracle for StandardChess {
    type Position = ChessPosition;

    fn mover(position: &ChessPosition) -> Role {
        match position.board().side_to_move() {
            Color::White => Role::White,
            Color::Black => Role::Black,
        }
    }

    fn apply(
        position: &ChessPosition,
        mv: &MoveRequest,
    ) -> Result<ChessPosition, IllegalMove> {
        // A finished game accepts no further moves.
        if Self::outcome(position).is_some() {
            return Err(IllegalMove);
        }
        let board = position.board();
        let source = parse_square(&mv.from)?;
        let dest = parse_square(&mv.to)?;

        let promotion = if is_promotion(board, source, dest) {
            let letter = mv.promotion.as_deref().ok_or(IllegalMove)?;
            Some(parse_promotion(letter)?)
        } else {
            None
        };

        let chess_move = ChessMove::new(source, dest, promotion);
        if !board.legal(chess_move) {
            return Err(IllegalMove);
        }
        Ok(position.play(chess_move))
    }

    fn notation(position: &ChessPosition) -> String {
        position.to_string()
    }

    fn outcome(position: &ChessPosition) -> Option<Outcome> {
        match position.board().status() {
            BoardStatus::Stalemate => return Some(Outcome::Stalemate),
            BoardStatus::Checkmate => {
                return Some(Outcome::Checkmate {
                    winner: Self::mover(position).opponent(),
                });
            }
            BoardStatus::Ongoing => {}
        }

        let reason = if position.insufficient_material() {
            "insufficient material"
        } else if position.fifty_moves_elapsed() {
            "the fifty-move rule"
        } else if position.repetitions() >= 3 {
            "threefold repetition"
        } else {
            return None;
        };
        Some(Outcome::Draw { reason })
    }
}

fn parse_square(text: &str) -> Result<Square, IllegalMove> {
    let text = text.to_ascii_lowercase();
    if text.len() != 2 {
        return Err(IllegalMove);
    }
    Square::from_str(&text).map_err(|_| IllegalMove)
}

fn parse_promotion(letter: &str) -> Result<Piece, IllegalMove> {
    match letter.to_ascii_lowercase().as_str() {
        "q" => Ok(Piece::Queen),
        "r" => Ok(Piece::Rook),
        "b" => Ok(Piece::Bishop),
        "n" => Ok(Piece::Knight),
        _ => Err(IllegalMove),
    }
}

/// A pawn stepping onto the first or eighth rank.
fn is_promotion(position: &Board, source: Square, dest: Square) -> bool {
    position.piece_on(source) == Some(Piece::Pawn)
        && matches!(dest.get_rank(), Rank::First | Rank::Eighth)
}
