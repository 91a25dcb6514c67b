//! Error types for the chess rules crate.

/// Errors raised while setting up a chess table.
///
/// Move legality is never an error here; illegal moves are reported
/// through [`IllegalMove`](gambit_table::IllegalMove).
#[derive(Debug, thiserror::Error)]
pub enum ChessError {
    /// The starting position is not a valid FEN string.
    #[error("invalid FEN: {0}")]
    InvalidFen(String),
}
