//! FEN codec

use crate::geometry;
use crate::grid::Grid;
use crate::history::MoveHistory;
use crate::types::{
    CastlingRights, CastlingRightsParseError, Color, ColorParseError, Coord, CoordParseError,
    File, Piece, Rank,
};

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;

use thiserror::Error;

/// FEN of the initial position
pub const INITIAL: &str = "rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNR w KQkq - 0 1";

/// Position validation error
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum ValidateError {
    /// Too many pieces of given color
    ///
    /// No more than 16 pieces of each color is allowed.
    #[error("too many pieces of color {0:?}")]
    TooManyPieces(Color),
    /// One of the sides doesn't have a king
    #[error("no king of color {0:?}")]
    NoKing(Color),
    /// One of the sides has more than one king
    #[error("more than one king of color {0:?}")]
    TooManyKings(Color),
    /// There is a pawn on the 1st or on the 8th rank
    #[error("invalid pawn position {0}")]
    InvalidPawn(Coord),
    /// Opponent's king is under attack
    #[error("opponent's king is attacked")]
    OpponentKingAttacked,
}

/// Error parsing the first part of FEN (i.e. the placement of pieces on the board)
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PlacementParseError {
    /// Rank is too large
    #[error("too many items in rank {0}")]
    RankOverflow(Rank),
    /// Rank is too small
    #[error("not enough items in rank {0}")]
    RankUnderflow(Rank),
    /// Too many ranks
    #[error("too many ranks")]
    Overflow,
    /// Not enough ranks
    #[error("not enough ranks")]
    Underflow,
    /// Unexpected character
    #[error("unexpected char {0:?}")]
    UnexpectedChar(char),
}

/// Error parsing position from FEN
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum FenParseError {
    /// FEN contains non-ASCII characters
    #[error("non-ASCII data in FEN")]
    NonAscii,
    /// FEN doesn't have board part
    #[error("board not specified")]
    NoBoard,
    /// Error parsing piece placement
    #[error("bad board: {0}")]
    Placement(#[from] PlacementParseError),
    /// FEN doesn't have move side part
    #[error("no move side")]
    NoMoveSide,
    /// Error parsing move side
    #[error("bad move side: {0}")]
    MoveSide(#[from] ColorParseError),
    /// FEN doesn't have castling rights part
    #[error("no castling rights")]
    NoCastling,
    /// Error parsing castling rights
    #[error("bad castling rights: {0}")]
    Castling(#[from] CastlingRightsParseError),
    /// FEN doesn't have en passant part
    #[error("no en passant")]
    NoEnpassant,
    /// Error parsing en passant square
    #[error("bad en passant: {0}")]
    Enpassant(#[from] CoordParseError),
    /// En passant square is on a wrong rank
    #[error("invalid en passant rank {0}")]
    InvalidEnpassantRank(Rank),
    /// Error parsing half-move clock
    #[error("bad half-move clock: {0}")]
    HalfMoveClock(ParseIntError),
    /// Error parsing full move number
    #[error("bad full move number: {0}")]
    FullMoveNumber(ParseIntError),
    /// FEN contains extra data
    #[error("extra data in FEN")]
    ExtraData,
    /// FEN was parsed, but the position is invalid
    #[error("invalid position: {0}")]
    Invalid(#[from] ValidateError),
}

/// Position parsed from FEN
///
/// Unlike [`Board`](crate::Board), the raw position is not validated and may be impossible.
/// All the pieces in it are considered unmoved. It must be converted to a board via
/// [`Board::try_from()`](crate::Board::try_from) to play on it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RawPosition {
    pub grid: Grid,
    pub side: Color,
    pub castling: CastlingRights,
    pub ep_target: Option<Coord>,
    pub half_move_clock: u16,
    pub full_move_number: u16,
}

impl RawPosition {
    pub fn initial() -> RawPosition {
        RawPosition {
            grid: Grid::initial(),
            side: Color::White,
            castling: CastlingRights::FULL,
            ep_target: None,
            half_move_clock: 0,
            full_move_number: 1,
        }
    }

    #[inline]
    pub fn from_fen(fen: &str) -> Result<RawPosition, FenParseError> {
        RawPosition::from_str(fen)
    }

    #[inline]
    pub fn as_fen(&self) -> String {
        self.to_string()
    }

    /// Creates an empty history which starts from this position
    pub fn history(&self) -> MoveHistory {
        MoveHistory::new(
            self.castling,
            self.ep_target,
            self.half_move_clock,
            self.full_move_number,
        )
    }
}

impl Default for RawPosition {
    fn default() -> RawPosition {
        RawPosition::initial()
    }
}

fn parse_placement(s: &str) -> Result<Grid, PlacementParseError> {
    type Error = PlacementParseError;

    // Ranks go from the 8th to the 1st
    let rank_at = |row: usize| Rank::from_index(7 - row);

    let mut file = 0_usize;
    let mut row = 0_usize;
    let mut grid = Grid::empty();
    for b in s.bytes() {
        match b {
            b'1'..=b'8' => {
                let add = (b - b'0') as usize;
                if file + add > 8 {
                    return Err(Error::RankOverflow(rank_at(row)));
                }
                file += add;
            }
            b'/' => {
                if file < 8 {
                    return Err(Error::RankUnderflow(rank_at(row)));
                }
                row += 1;
                file = 0;
                if row >= 8 {
                    return Err(Error::Overflow);
                }
            }
            _ => {
                if file >= 8 {
                    return Err(Error::RankOverflow(rank_at(row)));
                }
                let piece = Piece::from_char(b as char).ok_or(Error::UnexpectedChar(b as char))?;
                grid.put2(File::from_index(file), rank_at(row), Some(piece));
                file += 1;
            }
        }
    }

    if file < 8 {
        return Err(Error::RankUnderflow(rank_at(row)));
    }
    if row < 7 {
        return Err(Error::Underflow);
    }

    Ok(grid)
}

fn parse_ep_target(s: &str, side: Color) -> Result<Option<Coord>, FenParseError> {
    if s == "-" {
        return Ok(None);
    }
    let target = Coord::from_str(s)?;
    if target.rank() != geometry::enpassant_dst_rank(side) {
        return Err(FenParseError::InvalidEnpassantRank(target.rank()));
    }
    Ok(Some(target))
}

impl FromStr for RawPosition {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<RawPosition, Self::Err> {
        type Error = FenParseError;

        if !s.is_ascii() {
            return Err(Error::NonAscii);
        }
        let mut iter = s.split(' ').fuse();

        let grid = parse_placement(iter.next().ok_or(Error::NoBoard)?)?;
        let side = Color::from_str(iter.next().ok_or(Error::NoMoveSide)?)?;
        let castling = CastlingRights::from_str(iter.next().ok_or(Error::NoCastling)?)?;
        let ep_target = parse_ep_target(iter.next().ok_or(Error::NoEnpassant)?, side)?;
        let half_move_clock = match iter.next() {
            Some(s) => u16::from_str(s).map_err(Error::HalfMoveClock)?,
            None => 0,
        };
        let full_move_number = match iter.next() {
            Some(s) => u16::from_str(s).map_err(Error::FullMoveNumber)?,
            None => 1,
        };

        if iter.next().is_some() {
            return Err(Error::ExtraData);
        }

        Ok(RawPosition {
            grid,
            side,
            castling,
            ep_target,
            half_move_clock,
            full_move_number,
        })
    }
}

fn format_placement(grid: &Grid, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
    for rank in Rank::iter().rev() {
        if rank != Rank::R8 {
            write!(f, "/")?;
        }
        let mut empty = 0;
        for file in File::iter() {
            let piece = match grid.get2(file, rank) {
                Some(piece) => piece,
                None => {
                    empty += 1;
                    continue;
                }
            };
            if empty != 0 {
                write!(f, "{}", empty)?;
                empty = 0;
            }
            write!(f, "{}", piece)?;
        }
        if empty != 0 {
            write!(f, "{}", empty)?;
        }
    }
    Ok(())
}

impl fmt::Display for RawPosition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        format_placement(&self.grid, f)?;
        write!(f, " {} {}", self.side, self.castling)?;
        match self.ep_target {
            Some(p) => write!(f, " {}", p)?,
            None => write!(f, " -")?,
        };
        write!(f, " {} {}", self.half_move_clock, self.full_move_number)
    }
}
