//! # Base types for arbiter
//!
//! This is an auxiliary crate for `arbiter`, which contains the core vocabulary of the board:
//! files, ranks, squares, colors, pieces and castling rights, together with some fixed
//! geometry of the starting position.
//!
//! Normally you don't want to use this crate directly. Use `arbiter` instead.

pub mod geometry;
pub mod types;

pub use types::{CastlingRights, CastlingSide, Color, Coord, File, Piece, PieceKind, Rank};
