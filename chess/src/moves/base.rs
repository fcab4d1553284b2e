use super::notation::{self, Style};
use super::uci;
use crate::types::{CastlingSide, Coord, Piece, PieceKind};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error parsing [`PromoteKind`] from its name
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum PromoteKindParseError {
    #[error("unknown promotion kind {0:?}")]
    UnknownKind(String),
}

/// Move type
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum MoveType {
    /// Any move which is not listed below, including a single or double pawn push
    Standard,
    /// En passant capture
    EnPassant,
    /// Kingside castling
    KingsideCastle,
    /// Queenside castling
    QueensideCastle,
    /// Pawn move onto the last rank, with or without capture
    Promotion,
}

impl MoveType {
    /// Returns the castling side if the move is castling
    #[inline]
    pub fn castling_side(&self) -> Option<CastlingSide> {
        match *self {
            MoveType::KingsideCastle => Some(CastlingSide::King),
            MoveType::QueensideCastle => Some(CastlingSide::Queen),
            _ => None,
        }
    }
}

impl From<CastlingSide> for MoveType {
    #[inline]
    fn from(side: CastlingSide) -> Self {
        match side {
            CastlingSide::King => MoveType::KingsideCastle,
            CastlingSide::Queen => MoveType::QueensideCastle,
        }
    }
}

/// Target piece for promotion
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum PromoteKind {
    Knight,
    Bishop,
    Rook,
    Queen,
}

impl PromoteKind {
    pub const ALL: [PromoteKind; 4] = [
        PromoteKind::Queen,
        PromoteKind::Rook,
        PromoteKind::Bishop,
        PromoteKind::Knight,
    ];

    /// Parses the lowercase letter used in coordinate notation
    pub fn from_char(c: char) -> Option<PromoteKind> {
        match c {
            'n' => Some(PromoteKind::Knight),
            'b' => Some(PromoteKind::Bishop),
            'r' => Some(PromoteKind::Rook),
            'q' => Some(PromoteKind::Queen),
            _ => None,
        }
    }

    pub fn as_char(&self) -> char {
        PieceKind::from(*self).as_char().to_ascii_lowercase()
    }

    /// Returns the promotion target matching `kind`, or `None` for pawns and kings
    pub fn from_piece_kind(kind: PieceKind) -> Option<PromoteKind> {
        match kind {
            PieceKind::Knight => Some(PromoteKind::Knight),
            PieceKind::Bishop => Some(PromoteKind::Bishop),
            PieceKind::Rook => Some(PromoteKind::Rook),
            PieceKind::Queen => Some(PromoteKind::Queen),
            PieceKind::Pawn | PieceKind::King => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match *self {
            PromoteKind::Knight => "knight",
            PromoteKind::Bishop => "bishop",
            PromoteKind::Rook => "rook",
            PromoteKind::Queen => "queen",
        }
    }
}

impl From<PromoteKind> for PieceKind {
    #[inline]
    fn from(p: PromoteKind) -> Self {
        match p {
            PromoteKind::Knight => PieceKind::Knight,
            PromoteKind::Bishop => PieceKind::Bishop,
            PromoteKind::Rook => PieceKind::Rook,
            PromoteKind::Queen => PieceKind::Queen,
        }
    }
}

impl FromStr for PromoteKind {
    type Err = PromoteKindParseError;

    /// Parses one of `"queen"`, `"rook"`, `"bishop"` or `"knight"`, ignoring case
    fn from_str(s: &str) -> Result<PromoteKind, Self::Err> {
        PromoteKind::ALL
            .into_iter()
            .find(|k| k.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| PromoteKindParseError::UnknownKind(s.to_string()))
    }
}

impl fmt::Display for PromoteKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.name())
    }
}

/// Chess move
///
/// A move is created by the move generator and is never constructed by hand outside of
/// this crate. To obtain a move, use [`Board::legal_moves()`](crate::Board::legal_moves),
/// [`Board::find_move()`](crate::Board::find_move) or parse it in [UCI format](uci::Move).
///
/// Besides the squares and the type, the move carries the check annotations, which are
/// set only after the move has been played on the board and the reply is evaluated.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Move {
    src: Coord,
    dst: Coord,
    piece: Piece,
    kind: MoveType,
    capture: bool,
    check: bool,
    checkmate: bool,
}

impl Move {
    pub(crate) const fn new(
        src: Coord,
        dst: Coord,
        piece: Piece,
        kind: MoveType,
        capture: bool,
    ) -> Move {
        Move {
            src,
            dst,
            piece,
            kind,
            capture,
            check: false,
            checkmate: false,
        }
    }

    #[inline]
    pub const fn src(&self) -> Coord {
        self.src
    }

    #[inline]
    pub const fn dst(&self) -> Coord {
        self.dst
    }

    /// Returns the moved piece
    ///
    /// For a completed promotion, this is the new piece, not the pawn.
    #[inline]
    pub const fn piece(&self) -> Piece {
        self.piece
    }

    #[inline]
    pub const fn kind(&self) -> MoveType {
        self.kind
    }

    /// Returns `true` if the move captures a piece, including en passant
    #[inline]
    pub const fn is_capture(&self) -> bool {
        self.capture
    }

    #[inline]
    pub const fn is_check(&self) -> bool {
        self.check
    }

    #[inline]
    pub const fn is_checkmate(&self) -> bool {
        self.checkmate
    }

    /// Returns `true` if the move is made by a pawn
    pub fn is_pawn_move(&self) -> bool {
        matches!(self.kind, MoveType::EnPassant | MoveType::Promotion)
            || self.piece.kind() == PieceKind::Pawn
    }

    /// Returns `true` if the move is a pawn advance by two squares
    pub fn is_pawn_double(&self) -> bool {
        self.kind == MoveType::Standard
            && self.piece.kind() == PieceKind::Pawn
            && self.src.rank().index().abs_diff(self.dst.rank().index()) == 2
    }

    /// Returns the square of the captured piece, if any
    ///
    /// For en passant, this square differs from the destination.
    pub fn captured_square(&self) -> Option<Coord> {
        if !self.capture {
            return None;
        }
        match self.kind {
            MoveType::EnPassant => Some(Coord::from_parts(self.dst.file(), self.src.rank())),
            _ => Some(self.dst),
        }
    }

    /// Converts the move into coordinate notation
    pub fn uci(&self) -> uci::Move {
        uci::Move::from(self)
    }

    /// Returns the wrapper which formats the move in the given style
    ///
    /// The resulting wrapper implements [`fmt::Display`]. Plain `Display` of [`Move`] uses
    /// [`Style::Algebraic`].
    #[inline]
    pub fn styled(&self, style: Style) -> StyledMove<'_> {
        StyledMove(self, style)
    }

    pub(crate) fn set_check(&mut self) {
        self.check = true;
    }

    pub(crate) fn set_checkmate(&mut self) {
        self.check = true;
        self.checkmate = true;
    }

    pub(crate) fn set_piece(&mut self, piece: Piece) {
        self.piece = piece;
    }
}

/// Wrapper to format [`Move`] with the given style
///
/// See [`Move::styled()`] for details.
pub struct StyledMove<'a>(&'a Move, Style);

impl<'a> fmt::Display for StyledMove<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        notation::format(self.0, self.1, f)
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        notation::format(self, Style::Algebraic, f)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Color;

    #[test]
    fn test_promote_kind() {
        assert_eq!(PromoteKind::from_str("queen"), Ok(PromoteKind::Queen));
        assert_eq!(PromoteKind::from_str("Knight"), Ok(PromoteKind::Knight));
        assert_eq!(PromoteKind::from_str("ROOK"), Ok(PromoteKind::Rook));
        assert_eq!(
            PromoteKind::from_str("king"),
            Err(PromoteKindParseError::UnknownKind("king".to_string()))
        );
        for kind in PromoteKind::ALL {
            assert_eq!(PromoteKind::from_char(kind.as_char()), Some(kind));
            assert_eq!(PromoteKind::from_str(&kind.to_string()), Ok(kind));
        }
        assert_eq!(PieceKind::from(PromoteKind::Bishop), PieceKind::Bishop);
    }

    #[test]
    fn test_move_props() {
        let pawn = Piece::new(Color::Black, PieceKind::Pawn);
        let c = |s: &str| Coord::from_str(s).unwrap();

        let double = Move::new(c("d7"), c("d5"), pawn, MoveType::Standard, false);
        assert!(double.is_pawn_double());
        assert!(double.is_pawn_move());
        assert_eq!(double.captured_square(), None);

        let ep = Move::new(c("d4"), c("e3"), pawn, MoveType::EnPassant, true);
        assert!(!ep.is_pawn_double());
        assert_eq!(ep.captured_square(), Some(c("e4")));

        let queen = Piece::new(Color::White, PieceKind::Queen);
        let promote = Move::new(c("b7"), c("a8"), queen, MoveType::Promotion, true);
        assert!(promote.is_pawn_move());
        assert_eq!(promote.captured_square(), Some(c("a8")));

        let mut mv = Move::new(c("d1"), c("h5"), queen, MoveType::Standard, false);
        assert!(!mv.is_pawn_move());
        assert!(!mv.is_check());
        mv.set_checkmate();
        assert!(mv.is_check());
        assert!(mv.is_checkmate());
    }
}
