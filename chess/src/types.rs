//! Core chess types

use std::fmt;

pub use arbiter_base::types::*;

/// State of the game
///
/// The game starts [`GameResult::InProgress`] and moves into one of the terminal states
/// once the side to move has no legal moves. Terminal states are never left, except by
/// loading a new position.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum GameResult {
    /// Game is still running
    #[default]
    InProgress,
    /// White has checkmated Black
    WhiteWin,
    /// Black has checkmated White
    BlackWin,
    /// Stalemate
    Draw,
}

impl GameResult {
    /// Creates a win of the given color
    #[inline]
    pub fn win(color: Color) -> GameResult {
        match color {
            Color::White => GameResult::WhiteWin,
            Color::Black => GameResult::BlackWin,
        }
    }

    /// Returns the winner, if any
    #[inline]
    pub fn winner(&self) -> Option<Color> {
        match *self {
            GameResult::WhiteWin => Some(Color::White),
            GameResult::BlackWin => Some(Color::Black),
            GameResult::InProgress | GameResult::Draw => None,
        }
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        *self != GameResult::InProgress
    }
}

impl fmt::Display for GameResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let s = match *self {
            GameResult::InProgress => "*",
            GameResult::WhiteWin => "1-0",
            GameResult::BlackWin => "0-1",
            GameResult::Draw => "1/2-1/2",
        };
        write!(f, "{}", s)
    }
}
