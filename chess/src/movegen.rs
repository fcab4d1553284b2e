//! Pseudo-legal move generation and attack detection

use crate::geometry;
use crate::grid::Grid;
use crate::history::MoveHistory;
use crate::moves::{Move, MoveType};
use crate::types::{CastlingRights, CastlingSide, Color, Coord, Piece, PieceKind};

use std::slice;

use arrayvec::ArrayVec;
use derive_more::{Deref, DerefMut};

const ROOK_DIRS: [(isize, isize); 4] = [(1, 0), (-1, 0), (0, 1), (0, -1)];
const BISHOP_DIRS: [(isize, isize); 4] = [(1, 1), (1, -1), (-1, 1), (-1, -1)];
const KNIGHT_OFFSETS: [(isize, isize); 8] = [
    (1, 2),
    (2, 1),
    (2, -1),
    (1, -2),
    (-1, -2),
    (-2, -1),
    (-2, 1),
    (-1, 2),
];
const KING_OFFSETS: [(isize, isize); 8] = [
    (1, 0),
    (1, 1),
    (0, 1),
    (-1, 1),
    (-1, 0),
    (-1, -1),
    (0, -1),
    (1, -1),
];

/// Sink for generated moves
pub trait MovePush {
    fn push(&mut self, m: Move);
}

impl<const N: usize> MovePush for ArrayVec<Move, N> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

impl MovePush for Vec<Move> {
    fn push(&mut self, m: Move) {
        self.push(m);
    }
}

/// All the moves of one side
#[derive(Default, Debug, Clone, Eq, PartialEq, Deref, DerefMut)]
pub struct MoveList(ArrayVec<Move, 256>);

impl MoveList {
    pub fn new() -> MoveList {
        MoveList(ArrayVec::new())
    }

    /// Finds the move from `src` to `dst`
    pub fn find(&self, src: Coord, dst: Coord) -> Option<&Move> {
        self.0.iter().find(|m| m.src() == src && m.dst() == dst)
    }
}

impl MovePush for MoveList {
    fn push(&mut self, m: Move) {
        self.0.push(m);
    }
}

impl<'a> IntoIterator for &'a MoveList {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Moves of a single piece
///
/// A piece never has two moves with the same destination, as a promotion is one move
/// until the new piece is chosen. So, the set can be looked up by destination square.
#[derive(Default, Debug, Clone, Eq, PartialEq, Deref, DerefMut)]
pub struct MoveSet(ArrayVec<Move, 32>);

impl MoveSet {
    pub fn new() -> MoveSet {
        MoveSet(ArrayVec::new())
    }

    /// Returns the move to `dst`, if any
    pub fn get(&self, dst: Coord) -> Option<&Move> {
        self.0.iter().find(|m| m.dst() == dst)
    }

    pub fn contains(&self, dst: Coord) -> bool {
        self.get(dst).is_some()
    }

    /// Iterates over the destination squares
    pub fn dsts(&self) -> impl Iterator<Item = Coord> + '_ {
        self.0.iter().map(Move::dst)
    }
}

impl MovePush for MoveSet {
    fn push(&mut self, m: Move) {
        self.0.push(m);
    }
}

impl<'a> IntoIterator for &'a MoveSet {
    type Item = &'a Move;
    type IntoIter = slice::Iter<'a, Move>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

struct AttackDetector {
    target: Coord,
    found: bool,
}

impl MovePush for AttackDetector {
    fn push(&mut self, m: Move) {
        if m.is_capture() && m.dst() == self.target {
            self.found = true;
        }
    }
}

struct MoveGenImpl<'a, P> {
    grid: &'a Grid,
    src: Coord,
    piece: Piece,
    ep_target: Option<Coord>,
    castling: CastlingRights,
    dst: &'a mut P,
}

impl<'a, P: MovePush> MoveGenImpl<'a, P> {
    fn add(&mut self, dst: Coord, kind: MoveType, capture: bool) {
        self.dst
            .push(Move::new(self.src, dst, self.piece, kind, capture));
    }

    fn is_enemy(&self, piece: Piece) -> bool {
        piece.color() != self.piece.color()
    }

    fn gen_slider(&mut self, dirs: &[(isize, isize)]) {
        for &(df, dr) in dirs {
            let mut cur = self.src;
            while let Some(next) = cur.try_shift(df, dr) {
                match self.grid.get(next) {
                    None => self.add(next, MoveType::Standard, false),
                    Some(p) => {
                        if self.is_enemy(p) {
                            self.add(next, MoveType::Standard, true);
                        }
                        break;
                    }
                }
                cur = next;
            }
        }
    }

    fn gen_leaper(&mut self, offsets: &[(isize, isize)]) {
        for &(df, dr) in offsets {
            let dst = match self.src.try_shift(df, dr) {
                Some(dst) => dst,
                None => continue,
            };
            match self.grid.get(dst) {
                None => self.add(dst, MoveType::Standard, false),
                Some(p) if self.is_enemy(p) => self.add(dst, MoveType::Standard, true),
                Some(_) => {}
            }
        }
    }

    fn pawn_move_type(&self, dst: Coord) -> MoveType {
        if dst.rank() == geometry::promote_rank(self.piece.color()) {
            MoveType::Promotion
        } else {
            MoveType::Standard
        }
    }

    fn gen_pawn(&mut self) {
        let color = self.piece.color();
        let forward = geometry::pawn_forward(color);

        if let Some(one) = self.src.try_shift(0, forward) {
            if self.grid.is_empty(one) {
                let kind = self.pawn_move_type(one);
                self.add(one, kind, false);
                if self.src.rank() == geometry::pawn_start_rank(color) {
                    if let Some(two) = one.try_shift(0, forward) {
                        if self.grid.is_empty(two) {
                            self.add(two, MoveType::Standard, false);
                        }
                    }
                }
            }
        }

        for df in [-1, 1] {
            let dst = match self.src.try_shift(df, forward) {
                Some(dst) => dst,
                None => continue,
            };
            match self.grid.get(dst) {
                Some(p) if self.is_enemy(p) => {
                    let kind = self.pawn_move_type(dst);
                    self.add(dst, kind, true);
                }
                Some(_) => {}
                None => {
                    if self.ep_target != Some(dst) {
                        continue;
                    }
                    let victim = Coord::from_parts(dst.file(), self.src.rank());
                    let is_pawn = self
                        .grid
                        .get(victim)
                        .map_or(false, |p| p.is(color.inv(), PieceKind::Pawn));
                    if is_pawn {
                        self.add(dst, MoveType::EnPassant, true);
                    }
                }
            }
        }
    }

    fn gen_castling(&mut self) {
        let color = self.piece.color();
        if self.piece.has_moved() || self.src != geometry::king_home(color) {
            return;
        }
        let rank = geometry::home_rank(color);
        for side in CastlingSide::ALL {
            if !self.castling.has(color, side) {
                continue;
            }
            let rook = self.grid.get(geometry::rook_home(color, side));
            if rook != Some(Piece::new(color, PieceKind::Rook)) {
                continue;
            }
            let path_clear = geometry::castling_path(side)
                .iter()
                .all(|&file| self.grid.get2(file, rank).is_none());
            if path_clear {
                self.add(geometry::castling_king_dst(color, side), side.into(), false);
            }
        }
    }

    fn gen(&mut self) {
        match self.piece.kind() {
            PieceKind::Pawn => self.gen_pawn(),
            PieceKind::Knight => self.gen_leaper(&KNIGHT_OFFSETS),
            PieceKind::Bishop => self.gen_slider(&BISHOP_DIRS),
            PieceKind::Rook => self.gen_slider(&ROOK_DIRS),
            PieceKind::Queen => {
                self.gen_slider(&ROOK_DIRS);
                self.gen_slider(&BISHOP_DIRS);
            }
            PieceKind::King => {
                self.gen_leaper(&KING_OFFSETS);
                self.gen_castling();
            }
        }
    }
}

/// Generates pseudo-legal moves of the piece on `src` into `dst`
///
/// Nothing is generated if the square is empty. The moves may leave the king of the moving
/// side in check; use [`legal`](crate::legal) to filter them.
pub fn gen_pseudo_legal<P: MovePush>(grid: &Grid, src: Coord, history: &MoveHistory, dst: &mut P) {
    if let Some(piece) = grid.get(src) {
        MoveGenImpl {
            grid,
            src,
            piece,
            ep_target: history.ep_target(),
            castling: history.castling(),
            dst,
        }
        .gen();
    }
}

pub fn pseudo_legal_moves(grid: &Grid, src: Coord, history: &MoveHistory) -> MoveSet {
    let mut res = MoveSet::new();
    gen_pseudo_legal(grid, src, history, &mut res);
    res
}

/// Returns `true` if some piece of color `by` can capture the piece standing on `target`
///
/// Pawns attack only occupied squares, so `target` is expected to hold a piece of the
/// opposite color.
pub fn is_square_attacked(grid: &Grid, target: Coord, by: Color) -> bool {
    let mut detector = AttackDetector {
        target,
        found: false,
    };
    for (src, piece) in grid.pieces_of(by) {
        // Castling and en passant never capture on the target, so skip them
        MoveGenImpl {
            grid,
            src,
            piece,
            ep_target: None,
            castling: CastlingRights::EMPTY,
            dst: &mut detector,
        }
        .gen();
        if detector.found {
            return true;
        }
    }
    false
}

/// Returns `true` if the king of color `color` is attacked
///
/// If there is no such king, returns `false`.
pub fn is_king_in_check(grid: &Grid, color: Color) -> bool {
    grid.king_pos(color)
        .map_or(false, |king| is_square_attacked(grid, king, color.inv()))
}
