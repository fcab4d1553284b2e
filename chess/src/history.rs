//! Record of the played moves and of the state derived from them

use crate::geometry;
use crate::moves::{Move, Style};
use crate::types::{CastlingRights, CastlingSide, Color, Coord, PieceKind, Rank};

use std::fmt;

/// Moves of one full turn
///
/// The white move is absent only if the history starts with a move of Black.
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash)]
pub struct MovePair {
    pub white: Option<Move>,
    pub black: Option<Move>,
}

/// History of the game
///
/// Apart from the list of moves, the history tracks everything in the position which cannot
/// be seen on the grid: castling rights, en passant target and move counters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct MoveHistory {
    turns: Vec<MovePair>,
    castling: CastlingRights,
    ep_target: Option<Coord>,
    half_move_clock: u16,
    full_move_number: u16,
    start_move_number: u16,
}

impl MoveHistory {
    /// Creates an empty history for a game which starts with the given state
    pub fn new(
        castling: CastlingRights,
        ep_target: Option<Coord>,
        half_move_clock: u16,
        full_move_number: u16,
    ) -> MoveHistory {
        MoveHistory {
            turns: Vec::new(),
            castling,
            ep_target,
            half_move_clock,
            full_move_number,
            start_move_number: full_move_number,
        }
    }

    #[inline]
    pub fn castling(&self) -> CastlingRights {
        self.castling
    }

    /// Square which can be captured en passant on this move
    ///
    /// It is set only right after a pawn has advanced by two squares.
    #[inline]
    pub fn ep_target(&self) -> Option<Coord> {
        self.ep_target
    }

    #[inline]
    pub fn half_move_clock(&self) -> u16 {
        self.half_move_clock
    }

    #[inline]
    pub fn full_move_number(&self) -> u16 {
        self.full_move_number
    }

    #[inline]
    pub fn turns(&self) -> &[MovePair] {
        &self.turns
    }

    /// Iterates over the moves in the order they were played
    pub fn iter(&self) -> impl Iterator<Item = &Move> + '_ {
        self.turns
            .iter()
            .flat_map(|p| p.white.iter().chain(p.black.iter()))
    }

    /// Returns the number of recorded moves
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn last_move(&self) -> Option<&Move> {
        let pair = self.turns.last()?;
        pair.black.as_ref().or(pair.white.as_ref())
    }

    fn last_move_mut(&mut self) -> Option<&mut Move> {
        let pair = self.turns.last_mut()?;
        if pair.black.is_some() {
            pair.black.as_mut()
        } else {
            pair.white.as_mut()
        }
    }

    /// Marks the last move as giving check
    pub fn record_check(&mut self) {
        if let Some(mv) = self.last_move_mut() {
            mv.set_check();
        }
    }

    /// Marks the last move as giving checkmate
    pub fn record_checkmate(&mut self) {
        if let Some(mv) = self.last_move_mut() {
            mv.set_checkmate();
        }
    }

    /// Appends the move and updates the state
    ///
    /// The move is expected to be legal and already made on the grid.
    pub fn record_move(&mut self, mv: Move) {
        let color = mv.piece().color();
        match color {
            Color::White => self.turns.push(MovePair {
                white: Some(mv),
                black: None,
            }),
            Color::Black => match self.turns.last_mut() {
                Some(pair) if pair.white.is_some() && pair.black.is_none() => {
                    pair.black = Some(mv)
                }
                _ => self.turns.push(MovePair {
                    white: None,
                    black: Some(mv),
                }),
            },
        }

        if mv.is_pawn_move() || mv.is_capture() {
            self.half_move_clock = 0;
        } else {
            self.half_move_clock = self.half_move_clock.saturating_add(1);
        }
        if color == Color::Black {
            self.full_move_number = self.full_move_number.saturating_add(1);
        }

        if mv.piece().kind() == PieceKind::King {
            self.castling.unset_color(color);
        }
        // Rook leaving its home square or being captured there
        for c in Color::ALL {
            for side in CastlingSide::ALL {
                let home = geometry::rook_home(c, side);
                if mv.src() == home || mv.dst() == home {
                    self.castling.unset(c, side);
                }
            }
        }

        self.ep_target = if mv.is_pawn_double() {
            let rank = (mv.src().rank().index() + mv.dst().rank().index()) / 2;
            Some(Coord::from_parts(mv.src().file(), Rank::from_index(rank)))
        } else {
            None
        };
    }

    /// Returns the wrapper which formats the history as a numbered move list, like
    /// `1. f3 e5 2. g4 Qh4#`
    #[inline]
    pub fn notation(&self, style: Style) -> Notation<'_> {
        Notation {
            history: self,
            style,
        }
    }
}

impl Default for MoveHistory {
    fn default() -> MoveHistory {
        MoveHistory::new(CastlingRights::FULL, None, 0, 1)
    }
}

/// Wrapper to format [`MoveHistory`] as a move list
///
/// See [`MoveHistory::notation()`] for details.
pub struct Notation<'a> {
    history: &'a MoveHistory,
    style: Style,
}

impl<'a> fmt::Display for Notation<'a> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        let mut num = self.history.start_move_number as usize;
        for (idx, pair) in self.history.turns.iter().enumerate() {
            if idx != 0 {
                write!(f, " ")?;
            }
            match (&pair.white, &pair.black) {
                (Some(white), black) => {
                    write!(f, "{}. {}", num, white.styled(self.style))?;
                    if let Some(black) = black {
                        write!(f, " {}", black.styled(self.style))?;
                    }
                }
                (None, Some(black)) => write!(f, "{}... {}", num, black.styled(self.style))?,
                (None, None) => {}
            }
            num += 1;
        }
        Ok(())
    }
}

impl fmt::Display for MoveHistory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.notation(Style::Algebraic))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::moves::MoveType;
    use crate::types::Piece;
    use std::str::FromStr;

    fn mv(src: &str, dst: &str, color: Color, kind: PieceKind, ty: MoveType, capture: bool) -> Move {
        Move::new(
            Coord::from_str(src).unwrap(),
            Coord::from_str(dst).unwrap(),
            Piece::new(color, kind),
            ty,
            capture,
        )
    }

    #[test]
    fn test_pairs() {
        let mut h = MoveHistory::default();
        assert!(h.is_empty());
        assert_eq!(h.last_move(), None);

        let e4 = mv("e2", "e4", Color::White, PieceKind::Pawn, MoveType::Standard, false);
        h.record_move(e4);
        assert_eq!(h.last_move(), Some(&e4));
        assert_eq!(h.ep_target(), Some(Coord::from_str("e3").unwrap()));
        assert_eq!(h.half_move_clock(), 0);
        assert_eq!(h.full_move_number(), 1);

        let nc6 = mv("b8", "c6", Color::Black, PieceKind::Knight, MoveType::Standard, false);
        h.record_move(nc6);
        assert_eq!(h.ep_target(), None);
        assert_eq!(h.half_move_clock(), 1);
        assert_eq!(h.full_move_number(), 2);
        assert_eq!(
            h.turns(),
            &[MovePair {
                white: Some(e4),
                black: Some(nc6)
            }]
        );

        let nf3 = mv("g1", "f3", Color::White, PieceKind::Knight, MoveType::Standard, false);
        h.record_move(nf3);
        assert_eq!(h.half_move_clock(), 2);
        assert_eq!(h.len(), 3);
        assert_eq!(h.turns().len(), 2);
        assert_eq!(h.to_string(), "1. e4 Nc6 2. Nf3");
    }

    #[test]
    fn test_black_first() {
        let mut h = MoveHistory::new(CastlingRights::EMPTY, None, 5, 12);
        h.record_move(mv("c7", "c5", Color::Black, PieceKind::Pawn, MoveType::Standard, false));
        assert_eq!(h.ep_target(), Some(Coord::from_str("c6").unwrap()));
        h.record_move(mv("d4", "c5", Color::White, PieceKind::Pawn, MoveType::Standard, true));
        h.record_check();
        assert_eq!(h.turns()[0].white, None);
        assert_eq!(h.full_move_number(), 13);
        assert_eq!(h.half_move_clock(), 0);
        assert_eq!(h.to_string(), "12... c5 13. dxc5+");
    }

    #[test]
    fn test_castling_rights() {
        let mut h = MoveHistory::default();
        h.record_move(mv("h1", "h3", Color::White, PieceKind::Rook, MoveType::Standard, false));
        assert!(!h.castling().has(Color::White, CastlingSide::King));
        assert!(h.castling().has(Color::White, CastlingSide::Queen));

        h.record_move(mv("e8", "c8", Color::Black, PieceKind::King, MoveType::QueensideCastle, false));
        assert!(!h.castling().has_any(Color::Black));

        // Rook captured on its home square
        h.record_move(mv("g7", "a1", Color::White, PieceKind::Bishop, MoveType::Standard, true));
        assert_eq!(h.castling(), CastlingRights::EMPTY);
        assert_eq!(h.notation(Style::Algebraic).to_string(), "1. Rh3 O-O-O 2. Bxa1");
    }

    #[test]
    fn test_checkmate_mark() {
        let mut h = MoveHistory::default();
        h.record_move(mv("f2", "f3", Color::White, PieceKind::Pawn, MoveType::Standard, false));
        h.record_move(mv("e7", "e5", Color::Black, PieceKind::Pawn, MoveType::Standard, false));
        h.record_move(mv("g2", "g4", Color::White, PieceKind::Pawn, MoveType::Standard, false));
        h.record_move(mv("d8", "h4", Color::Black, PieceKind::Queen, MoveType::Standard, false));
        h.record_checkmate();
        assert!(h.last_move().unwrap().is_checkmate());
        assert_eq!(h.to_string(), "1. f3 e5 2. g4 Qh4#");
        assert_eq!(h.notation(Style::Figurine).to_string(), "1. f3 e5 2. g4 ♛h4#");
        assert_eq!(h.half_move_clock(), 1);
        assert_eq!(h.full_move_number(), 3);
    }
}
