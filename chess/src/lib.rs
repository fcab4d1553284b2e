//! # Chess rules arbiter
//!
//! `arbiter` enforces the rules of chess. Given a position, it computes all the legal moves,
//! applies moves (including castling, en passant and promotion), detects check, checkmate
//! and stalemate, and converts positions from and to FEN.
//!
//! It doesn't search or evaluate positions, so it's not a chess engine, only a referee.
//!
//! # Example
//!
//! ```
//! use arbiter::{Board, Color, GameResult};
//!
//! // Fool's mate
//! let mut board = Board::initial();
//! for mv in ["f2f3", "e7e5", "g2g4", "d8h4"] {
//!     board.play_uci(mv).unwrap();
//! }
//!
//! assert_eq!(board.result(), GameResult::BlackWin);
//! assert_eq!(board.result().winner(), Some(Color::Black));
//! assert!(board.is_check());
//! assert!(board.all_legal_moves().is_empty());
//! assert_eq!(board.history().to_string(), "1. f3 e5 2. g4 Qh4#");
//! assert_eq!(
//!     board.as_fen(),
//!     "rnb1kbnr/pppp1ppp/8/4p3/6Pq/5P2/PPPPP2P/RNBQKBNR w KQkq - 1 3"
//! );
//! ```
//!
//! # Logging
//!
//! With the `logging` feature enabled, the board reports loaded positions, applied moves and
//! game results via the [`log`](https://docs.rs/log) crate at debug level.

#[cfg(feature = "logging")]
macro_rules! debug {
    ($($arg:tt)*) => {
        log::debug!($($arg)*)
    };
}

#[cfg(not(feature = "logging"))]
macro_rules! debug {
    ($($arg:tt)*) => {};
}

pub mod board;
pub mod fen;
pub mod grid;
pub mod history;
pub mod legal;
pub mod movegen;
pub mod moves;
pub mod types;

pub use arbiter_base::geometry;

pub use board::{Board, MoveError, Progress};
pub use fen::{FenParseError, RawPosition, ValidateError};
pub use grid::Grid;
pub use history::{MoveHistory, MovePair};
pub use movegen::{MoveList, MoveSet};
pub use moves::{Move, MoveType, PromoteKind, Style, UciMove};
pub use types::{
    CastlingRights, CastlingSide, Color, Coord, File, GameResult, Piece, PieceKind, Rank,
};
