use crate::types::{CastlingSide, Color, Coord, File, Rank};

/// Rank on which the pieces of color `c` start, including king and rooks
pub const fn home_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R1,
        Color::Black => Rank::R8,
    }
}

pub const fn pawn_start_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R2,
        Color::Black => Rank::R7,
    }
}

/// Rank on which the pawns of color `c` promote
pub const fn promote_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R8,
        Color::Black => Rank::R1,
    }
}

/// Rank delta of a single pawn step
pub const fn pawn_forward(c: Color) -> isize {
    match c {
        Color::White => 1,
        Color::Black => -1,
    }
}

/// Rank of the en passant target square when `c` is the side to capture
pub const fn enpassant_dst_rank(c: Color) -> Rank {
    match c {
        Color::White => Rank::R6,
        Color::Black => Rank::R3,
    }
}

pub const fn king_home(c: Color) -> Coord {
    Coord::from_parts(File::E, home_rank(c))
}

pub const fn rook_home(c: Color, s: CastlingSide) -> Coord {
    let file = match s {
        CastlingSide::King => File::H,
        CastlingSide::Queen => File::A,
    };
    Coord::from_parts(file, home_rank(c))
}

pub const fn castling_king_dst(c: Color, s: CastlingSide) -> Coord {
    let file = match s {
        CastlingSide::King => File::G,
        CastlingSide::Queen => File::C,
    };
    Coord::from_parts(file, home_rank(c))
}

/// Destination of the rook in castling
///
/// This is also the square the king passes over.
pub const fn castling_rook_dst(c: Color, s: CastlingSide) -> Coord {
    let file = match s {
        CastlingSide::King => File::F,
        CastlingSide::Queen => File::D,
    };
    Coord::from_parts(file, home_rank(c))
}

/// Files strictly between the king and the rook, which must be empty for castling
pub fn castling_path(s: CastlingSide) -> &'static [File] {
    match s {
        CastlingSide::King => &[File::F, File::G],
        CastlingSide::Queen => &[File::B, File::C, File::D],
    }
}
