//! A chess position plus the game record a bare `Board` does not keep.

use std::fmt;
use std::str::FromStr;

use chess::{Board, ChessMove, Color, Piece, Square};

use crate::ChessError;

/// Halfmoves without a capture or pawn move after which the game is drawn.
const FIFTY_MOVE_LIMIT: u32 = 100;

/// A board together with its FEN move counters and repetition history.
///
/// `Display` writes full six-field FEN; `FromStr` reads it back, taking
/// the counters as `0 1` when they are missing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChessPosition {
    board: Board,
    halfmove_clock: u32,
    fullmove_number: u32,
    /// Hashes of every position since the last capture or pawn move,
    /// this one included.
    history: Vec<u64>,
}

impl ChessPosition {
    fn new(board: Board, halfmove_clock: u32, fullmove_number: u32) -> Self {
        Self {
            history: vec![board.get_hash()],
            board,
            halfmove_clock,
            fullmove_number,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Halfmoves since the last capture or pawn move.
    pub fn halfmove_clock(&self) -> u32 {
        self.halfmove_clock
    }

    /// Starts at 1 and goes up after each Black move.
    pub fn fullmove_number(&self) -> u32 {
        self.fullmove_number
    }

    /// Plays a move already checked for legality.
    pub(crate) fn play(&self, mv: ChessMove) -> Self {
        let irreversible = self.board.piece_on(mv.get_source()) == Some(Piece::Pawn)
            || self.board.piece_on(mv.get_dest()).is_some();
        let board = self.board.make_move_new(mv);

        let mut history = if irreversible {
            Vec::new()
        } else {
            self.history.clone()
        };
        history.push(board.get_hash());

        Self {
            halfmove_clock: if irreversible {
                0
            } else {
                self.halfmove_clock + 1
            },
            fullmove_number: self.fullmove_number
                + u32::from(self.board.side_to_move() == Color::Black),
            board,
            history,
        }
    }

    /// How many times the current position has occurred.
    pub(crate) fn repetitions(&self) -> usize {
        let current = self.board.get_hash();
        self.history.iter().filter(|&&hash| hash == current).count()
    }

    pub(crate) fn fifty_moves_elapsed(&self) -> bool {
        self.halfmove_clock >= FIFTY_MOVE_LIMIT
    }

    /// Neither side has mating material: bare kings, a single minor
    /// piece, or bishops that all stand on one square colour.
    pub(crate) fn insufficient_material(&self) -> bool {
        let board = &self.board;
        let heavy = *board.pieces(Piece::Pawn)
            | *board.pieces(Piece::Rook)
            | *board.pieces(Piece::Queen);
        if heavy.popcnt() > 0 {
            return false;
        }

        let knights = board.pieces(Piece::Knight).popcnt();
        let bishops = *board.pieces(Piece::Bishop);
        match (knights, bishops.popcnt()) {
            (0, 0) | (1, 0) | (0, 1) => true,
            (0, _) => {
                let mut shades = bishops.map(shade);
                let first = shades.next();
                shades.all(|s| Some(s) == first)
            }
            _ => false,
        }
    }
}

fn shade(square: Square) -> usize {
    (square.get_rank().to_index() + square.get_file().to_index()) % 2
}

impl Default for ChessPosition {
    fn default() -> Self {
        Self::new(Board::default(), 0, 1)
    }
}

impl FromStr for ChessPosition {
    type Err = ChessError;

    fn from_str(fen: &str) -> Result<Self, ChessError> {
        let invalid = || ChessError::InvalidFen(fen.to_owned());
        let board = Board::from_str(fen.trim()).map_err(|_| invalid())?;

        let mut counters = fen.split_whitespace().skip(4);
        let halfmove_clock = match counters.next() {
            Some(field) => field.parse().map_err(|_| invalid())?,
            None => 0,
        };
        let fullmove_number = match counters.next() {
            Some(field) => field.parse::<u32>().map_err(|_| invalid())?.max(1),
            None => 1,
        };
        Ok(Self::new(board, halfmove_clock, fullmove_number))
    }
}

impl fmt::Display for ChessPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Placement, side, castling and en passant come from the board.
        let board = self.board.to_string();
        let fields: Vec<&str> = board.split_whitespace().take(4).collect();
        write!(
            f,
            "{} {} {}",
            fields.join(" "),
            self.halfmove_clock,
            self.fullmove_number
        )
    }
}
