//! Board grid

use crate::geometry;
use crate::moves::{Move, MoveType};
use crate::types::{Color, Coord, File, Piece, PieceKind, Rank};

/// Owned 8x8 array of squares, each holding at most one piece
///
/// The grid is indexed as `[rank][file]`, with [`Rank::R1`] first. It has value semantics:
/// copying the grid yields a fully independent board, which is how move legality is tested.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Grid {
    squares: [[Option<Piece>; 8]; 8],
}

impl Grid {
    /// Creates a grid without pieces
    pub const fn empty() -> Grid {
        Grid {
            squares: [[None; 8]; 8],
        }
    }

    /// Creates a grid with the pieces in their initial position
    pub fn initial() -> Grid {
        const BACK: [PieceKind; 8] = [
            PieceKind::Rook,
            PieceKind::Knight,
            PieceKind::Bishop,
            PieceKind::Queen,
            PieceKind::King,
            PieceKind::Bishop,
            PieceKind::Knight,
            PieceKind::Rook,
        ];

        let mut res = Grid::empty();
        for color in Color::ALL {
            for file in File::iter() {
                res.put2(
                    file,
                    geometry::home_rank(color),
                    Some(Piece::new(color, BACK[file.index()])),
                );
                res.put2(
                    file,
                    geometry::pawn_start_rank(color),
                    Some(Piece::new(color, PieceKind::Pawn)),
                );
            }
        }
        res
    }

    #[inline]
    pub fn get(&self, c: Coord) -> Option<Piece> {
        self.get2(c.file(), c.rank())
    }

    #[inline]
    pub fn get2(&self, file: File, rank: Rank) -> Option<Piece> {
        self.squares[rank.index()][file.index()]
    }

    #[inline]
    pub fn put(&mut self, c: Coord, piece: Option<Piece>) {
        self.put2(c.file(), c.rank(), piece)
    }

    #[inline]
    pub fn put2(&mut self, file: File, rank: Rank, piece: Option<Piece>) {
        self.squares[rank.index()][file.index()] = piece;
    }

    /// Removes the piece from the square and returns it
    #[inline]
    pub fn take(&mut self, c: Coord) -> Option<Piece> {
        self.squares[c.rank().index()][c.file().index()].take()
    }

    pub fn is_empty(&self, c: Coord) -> bool {
        self.get(c).is_none()
    }

    /// Iterates over all the pieces on the board together with their squares
    pub fn pieces(&self) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        Coord::iter().filter_map(move |c| self.get(c).map(|p| (c, p)))
    }

    pub fn pieces_of(&self, color: Color) -> impl Iterator<Item = (Coord, Piece)> + '_ {
        self.pieces().filter(move |(_, p)| p.color() == color)
    }

    /// Returns the square of the king of color `color`
    ///
    /// If there are many kings, the first one found is returned.
    pub fn king_pos(&self, color: Color) -> Option<Coord> {
        self.pieces()
            .find(|(_, p)| p.is(color, PieceKind::King))
            .map(|(c, _)| c)
    }

    /// Performs the piece movements of `mv`, without any bookkeeping
    ///
    /// The moved piece is marked as moved. For promotions, the pawn is left on the destination
    /// square; replacing it is up to the caller.
    pub(crate) fn make_move(&mut self, mv: &Move) {
        if mv.kind() == MoveType::EnPassant {
            self.take(Coord::from_parts(mv.dst().file(), mv.src().rank()));
        }
        if let Some(side) = mv.kind().castling_side() {
            let color = mv.piece().color();
            let rook = self.take(geometry::rook_home(color, side));
            self.put(
                geometry::castling_rook_dst(color, side),
                rook.map(|r| r.with_moved(true)),
            );
        }
        let piece = self.take(mv.src()).map(|p| p.with_moved(true));
        self.put(mv.dst(), piece);
    }
}

impl Default for Grid {
    fn default() -> Grid {
        Grid::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn sq(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    #[test]
    fn test_initial() {
        let grid = Grid::initial();
        assert_eq!(grid.pieces().count(), 32);
        assert_eq!(grid.pieces_of(Color::White).count(), 16);
        assert_eq!(
            grid.get(sq("d1")),
            Some(Piece::new(Color::White, PieceKind::Queen))
        );
        assert_eq!(
            grid.get(sq("e8")),
            Some(Piece::new(Color::Black, PieceKind::King))
        );
        assert_eq!(
            grid.get(sq("c7")),
            Some(Piece::new(Color::Black, PieceKind::Pawn))
        );
        assert_eq!(grid.get(sq("e4")), None);
        assert_eq!(grid.king_pos(Color::White), Some(sq("e1")));
        assert_eq!(grid.king_pos(Color::Black), Some(sq("e8")));
        assert_eq!(Grid::empty().king_pos(Color::White), None);
    }

    #[test]
    fn test_copy_is_independent() {
        let grid = Grid::initial();
        let mut trial = grid;
        trial.take(sq("e2"));
        assert!(trial.is_empty(sq("e2")));
        assert!(!grid.is_empty(sq("e2")));
    }

    #[test]
    fn test_make_move() {
        let pawn = Piece::new(Color::White, PieceKind::Pawn);
        let mut grid = Grid::initial();
        grid.make_move(&Move::new(
            sq("e2"),
            sq("e4"),
            pawn,
            MoveType::Standard,
            false,
        ));
        assert_eq!(grid.get(sq("e2")), None);
        assert_eq!(grid.get(sq("e4")), Some(pawn.with_moved(true)));

        let king = Piece::new(Color::White, PieceKind::King);
        let mut grid = Grid::empty();
        grid.put(sq("e1"), Some(king));
        grid.put(sq("h1"), Some(Piece::new(Color::White, PieceKind::Rook)));
        grid.make_move(&Move::new(
            sq("e1"),
            sq("g1"),
            king,
            MoveType::KingsideCastle,
            false,
        ));
        assert_eq!(grid.get(sq("g1")), Some(king.with_moved(true)));
        assert_eq!(
            grid.get(sq("f1")),
            Some(Piece::new(Color::White, PieceKind::Rook).with_moved(true))
        );
        assert_eq!(grid.get(sq("e1")), None);
        assert_eq!(grid.get(sq("h1")), None);

        let black_pawn = Piece::new(Color::Black, PieceKind::Pawn);
        let mut grid = Grid::empty();
        grid.put(sq("e5"), Some(pawn));
        grid.put(sq("d5"), Some(black_pawn));
        grid.make_move(&Move::new(
            sq("e5"),
            sq("d6"),
            pawn,
            MoveType::EnPassant,
            true,
        ));
        assert_eq!(grid.get(sq("d5")), None);
        assert_eq!(grid.get(sq("d6")), Some(pawn.with_moved(true)));
    }
}
