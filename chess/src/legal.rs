//! Legal move filtering
//!
//! A pseudo-legal move is legal if it doesn't leave the king of the moving side in check.
//! Each candidate is played on a copy of the grid, so the original grid is never touched.

use crate::geometry;
use crate::grid::Grid;
use crate::history::MoveHistory;
use crate::movegen::{self, MoveList, MovePush, MoveSet};
use crate::moves::{Move, MoveType};
use crate::types::{Color, Coord};

/// Sink which passes only legal moves into the inner sink
pub struct LegalFilter<'a, P> {
    grid: &'a Grid,
    inner: &'a mut P,
}

impl<'a, P: MovePush> LegalFilter<'a, P> {
    pub fn new(grid: &'a Grid, inner: &'a mut P) -> Self {
        Self { grid, inner }
    }
}

impl<'a, P: MovePush> MovePush for LegalFilter<'a, P> {
    fn push(&mut self, mv: Move) {
        if is_legal(self.grid, &mv) {
            self.inner.push(mv);
        }
    }
}

fn keeps_king_safe(grid: &Grid, mv: &Move) -> bool {
    let mut trial = *grid;
    trial.make_move(mv);
    !movegen::is_king_in_check(&trial, mv.piece().color())
}

/// Returns `true` if the pseudo-legal move `mv` is legal
///
/// For castling, the king must not be in check, and both the square it passes over and its
/// destination must be safe.
pub fn is_legal(grid: &Grid, mv: &Move) -> bool {
    if let Some(side) = mv.kind().castling_side() {
        let color = mv.piece().color();
        if movegen::is_king_in_check(grid, color) {
            return false;
        }
        let transit = Move::new(
            mv.src(),
            geometry::castling_rook_dst(color, side),
            mv.piece(),
            MoveType::Standard,
            false,
        );
        if !keeps_king_safe(grid, &transit) {
            return false;
        }
    }
    keeps_king_safe(grid, mv)
}

/// Generates legal moves of the piece on `src` into `dst`
pub fn gen_legal<P: MovePush>(grid: &Grid, src: Coord, history: &MoveHistory, dst: &mut P) {
    let mut filter = LegalFilter::new(grid, dst);
    movegen::gen_pseudo_legal(grid, src, history, &mut filter);
}

/// Returns legal moves of the piece on `src`
pub fn legal_moves(grid: &Grid, src: Coord, history: &MoveHistory) -> MoveSet {
    let mut res = MoveSet::new();
    gen_legal(grid, src, history, &mut res);
    res
}

/// Returns legal moves of all the pieces of color `side`
pub fn gen_all(grid: &Grid, side: Color, history: &MoveHistory) -> MoveList {
    let mut res = MoveList::new();
    for (src, _) in grid.pieces_of(side) {
        gen_legal(grid, src, history, &mut res);
    }
    res
}
