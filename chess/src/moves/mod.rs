//! Moves and their text forms

mod base;

pub mod notation;
pub mod uci;

pub use base::*;
pub use notation::Style;

pub type UciMove = uci::Move;
