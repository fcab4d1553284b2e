//! Utilities to work with moves in UCI format

use super::base::{self, MoveType, PromoteKind};
use crate::types::{Coord, CoordParseError};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing a move in UCI format
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum RawParseError {
    /// Bad string length
    #[error("bad string length")]
    BadLength,
    /// Bad source square
    #[error("bad source: {0}")]
    BadSrc(CoordParseError),
    /// Bad destination square
    #[error("bad destination: {0}")]
    BadDst(CoordParseError),
    /// Bad promote character
    #[error("bad promote char {0:?}")]
    BadPromote(char),
}

/// Parsed move in UCI format, like `e2e4` or `e7e8q`
///
/// Such a move is only a pair of squares with an optional promotion. It becomes a real
/// [`moves::Move`](super::Move) when it's looked up in the position, see
/// [`Board::play_uci()`](crate::Board::play_uci).
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct Move {
    /// Source square
    pub src: Coord,
    /// Destination square
    pub dst: Coord,
    /// Piece to promote, if any
    pub promote: Option<PromoteKind>,
}

impl From<&base::Move> for Move {
    #[inline]
    fn from(mv: &base::Move) -> Move {
        let promote = match mv.kind() {
            MoveType::Promotion => PromoteKind::from_piece_kind(mv.piece().kind()),
            _ => None,
        };
        Move {
            src: mv.src(),
            dst: mv.dst(),
            promote,
        }
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}{}", self.src, self.dst)?;
        if let Some(promote) = self.promote {
            write!(f, "{}", promote.as_char())?;
        }
        Ok(())
    }
}

impl FromStr for Move {
    type Err = RawParseError;

    fn from_str(s: &str) -> Result<Move, Self::Err> {
        if !s.is_ascii() || !matches!(s.len(), 4 | 5) {
            return Err(RawParseError::BadLength);
        }
        let src = Coord::from_str(&s[0..2]).map_err(RawParseError::BadSrc)?;
        let dst = Coord::from_str(&s[2..4]).map_err(RawParseError::BadDst)?;
        let promote = match s.as_bytes().get(4) {
            Some(&b) => Some(
                PromoteKind::from_char(b as char).ok_or(RawParseError::BadPromote(b as char))?,
            ),
            None => None,
        };
        Ok(Move { src, dst, promote })
    }
}
