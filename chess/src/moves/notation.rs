//! Human-readable move notation
//!
//! The notation follows algebraic style without disambiguation: castling is `O-O` or `O-O-O`,
//! pawn captures are prefixed with the source file, other pieces with their letter. Captures
//! are marked with `x`, promotions with `=Q`, en passant with a trailing ` e.p.`, and check or
//! checkmate with `+` or `#`.

use super::base::{Move, MoveType};
use crate::types::{CastlingSide, Piece, PieceKind};

use std::fmt;

/// Move output style
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Style {
    /// Use capital Latin letters for pieces
    #[default]
    Algebraic,
    /// Use Unicode chess symbols for pieces
    Figurine,
}

trait PieceTheme {
    fn piece_to_char(piece: Piece) -> char;
    fn promote_sign() -> &'static str;
}

struct AlgebraicTheme;

impl PieceTheme for AlgebraicTheme {
    fn piece_to_char(piece: Piece) -> char {
        piece.kind().as_char()
    }

    fn promote_sign() -> &'static str {
        "="
    }
}

struct FigurineTheme;

impl PieceTheme for FigurineTheme {
    fn piece_to_char(piece: Piece) -> char {
        piece.as_utf8_char()
    }

    fn promote_sign() -> &'static str {
        ""
    }
}

fn do_format<T: PieceTheme>(mv: &Move, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
    match mv.kind().castling_side() {
        Some(CastlingSide::King) => write!(f, "O-O")?,
        Some(CastlingSide::Queen) => write!(f, "O-O-O")?,
        None => {
            if mv.is_pawn_move() {
                if mv.is_capture() {
                    write!(f, "{}", mv.src().file())?;
                }
            } else {
                write!(f, "{}", T::piece_to_char(mv.piece()))?;
            }
            if mv.is_capture() {
                write!(f, "x")?;
            }
            write!(f, "{}", mv.dst())?;
            // A pending promotion still carries the pawn
            if mv.kind() == MoveType::Promotion && mv.piece().kind() != PieceKind::Pawn {
                write!(f, "{}{}", T::promote_sign(), T::piece_to_char(mv.piece()))?;
            }
            if mv.kind() == MoveType::EnPassant {
                write!(f, " e.p.")?;
            }
        }
    }
    if mv.is_checkmate() {
        write!(f, "#")?;
    } else if mv.is_check() {
        write!(f, "+")?;
    }
    Ok(())
}

pub(super) fn format(mv: &Move, style: Style, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
    match style {
        Style::Algebraic => do_format::<AlgebraicTheme>(mv, f),
        Style::Figurine => do_format::<FigurineTheme>(mv, f),
    }
}
