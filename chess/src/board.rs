//! Board and related things

use crate::fen::{FenParseError, RawPosition, ValidateError};
use crate::grid::Grid;
use crate::history::MoveHistory;
use crate::movegen::{self, MoveList, MovePush, MoveSet};
use crate::moves::{uci, Move, MoveType, PromoteKind};
use crate::types::{CastlingSide, Color, Coord, GameResult, Piece, PieceKind, Rank};
use crate::{geometry, legal};

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Error applying a move
#[derive(Debug, Clone, Error, Eq, PartialEq)]
pub enum MoveError {
    /// The game is over, so no moves can be made
    #[error("game is finished: {0}")]
    GameFinished(GameResult),
    /// A pawn is waiting to be promoted on the given square
    #[error("promotion on {0} is pending")]
    PromotionPending(Coord),
    /// There is no promotion to complete
    #[error("no pending promotion")]
    NoPendingPromotion,
    /// The move is not legal in the current position
    #[error("illegal move {0}")]
    NotLegal(uci::Move),
    /// Error parsing move
    #[error("cannot parse move: {0}")]
    Parse(#[from] uci::RawParseError),
}

/// Outcome of [`Board::apply_move()`]
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum Progress {
    /// The move is recorded and the turn passed to the opponent
    Completed,
    /// The pawn reached the last rank; call [`Board::complete_promotion()`] to finish the move
    PromotionPending,
}

/// Promotion waiting for the piece to be chosen
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
struct Pending {
    mv: Move,
    before: Grid,
}

/// Chess board
///
/// The board holds a valid position together with the game history, and allows to make
/// only legal moves on it. Legal moves of the side to move are computed once per turn and
/// cached, so queries like [`Board::legal_moves()`] are cheap.
///
/// A promotion is a two-phase move. After the pawn reaches the last rank,
/// [`Board::apply_move()`] returns [`Progress::PromotionPending`], and the turn doesn't pass
/// until [`Board::complete_promotion()`] is called.
///
/// # Example
///
/// ```
/// # use arbiter::{Board, Coord, GameResult};
/// # use std::str::FromStr;
/// #
/// let mut board = Board::initial();
/// let e2 = Coord::from_str("e2").unwrap();
/// let e4 = Coord::from_str("e4").unwrap();
/// assert!(board.legal_moves(e2).contains(e4));
///
/// let mv = board.find_move(e2, e4).unwrap();
/// board.apply_move(mv).unwrap();
/// assert_eq!(
///     board.as_fen(),
///     "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1"
/// );
/// assert_eq!(board.result(), GameResult::InProgress);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    grid: Grid,
    side: Color,
    history: MoveHistory,
    pending: Option<Pending>,
    result: GameResult,
    legal: MoveList,
}

impl Board {
    /// Creates a board with the initial position
    pub fn initial() -> Board {
        Board::from_parts(Grid::initial(), Color::White, MoveHistory::default())
    }

    fn from_parts(grid: Grid, side: Color, history: MoveHistory) -> Board {
        let mut board = Board {
            grid,
            side,
            history,
            pending: None,
            result: GameResult::InProgress,
            legal: MoveList::new(),
        };
        board.refresh();
        board
    }

    /// Creates a board from FEN
    #[inline]
    pub fn from_fen(fen: &str) -> Result<Board, FenParseError> {
        Board::from_str(fen)
    }

    /// Replaces the position with the one from FEN, dropping the history
    ///
    /// On error, the board is left unchanged.
    pub fn load_fen(&mut self, fen: &str) -> Result<(), FenParseError> {
        *self = Board::from_fen(fen)?;
        debug!("position loaded from fen: {}", fen);
        Ok(())
    }

    /// Converts the board back into a raw position
    ///
    /// Castling rights are kept only if both the king and the relevant rook haven't moved yet.
    /// While a promotion is pending, the position before the pawn move is returned.
    pub fn raw(&self) -> RawPosition {
        let mut grid = self.pending.map_or(self.grid, |p| p.before);

        let mut castling = self.history.castling();
        for color in Color::ALL {
            let king = grid.get(geometry::king_home(color));
            for side in CastlingSide::ALL {
                let rook = grid.get(geometry::rook_home(color, side));
                if king != Some(Piece::new(color, PieceKind::King))
                    || rook != Some(Piece::new(color, PieceKind::Rook))
                {
                    castling.unset(color, side);
                }
            }
        }

        for coord in Coord::iter() {
            let piece = grid.get(coord).map(|p| p.with_moved(false));
            grid.put(coord, piece);
        }

        RawPosition {
            grid,
            side: self.side,
            castling,
            ep_target: self.history.ep_target(),
            half_move_clock: self.history.half_move_clock(),
            full_move_number: self.history.full_move_number(),
        }
    }

    #[inline]
    pub fn as_fen(&self) -> String {
        self.to_string()
    }

    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Returns the piece on the square `c`
    #[inline]
    pub fn get(&self, c: Coord) -> Option<Piece> {
        self.grid.get(c)
    }

    /// Returns the side to move
    #[inline]
    pub fn side(&self) -> Color {
        self.side
    }

    #[inline]
    pub fn history(&self) -> &MoveHistory {
        &self.history
    }

    #[inline]
    pub fn result(&self) -> GameResult {
        self.result
    }

    /// Returns the move waiting for [`Board::complete_promotion()`], if any
    #[inline]
    pub fn pending_promotion(&self) -> Option<&Move> {
        self.pending.as_ref().map(|p| &p.mv)
    }

    /// Returns legal moves of the piece on `src`
    ///
    /// The set is empty if the square is empty, holds a piece of the opponent, the game is
    /// finished or a promotion is pending.
    pub fn legal_moves(&self, src: Coord) -> MoveSet {
        let mut res = MoveSet::new();
        for mv in self.legal.iter().filter(|m| m.src() == src) {
            MovePush::push(&mut res, *mv);
        }
        res
    }

    /// Returns legal moves of the side to move
    #[inline]
    pub fn all_legal_moves(&self) -> &MoveList {
        &self.legal
    }

    /// Returns pseudo-legal moves of the piece on `src`, which may leave its king in check
    pub fn pseudo_legal_moves(&self, src: Coord) -> MoveSet {
        movegen::pseudo_legal_moves(&self.grid, src, &self.history)
    }

    /// Returns `true` if the side to move is in check
    #[inline]
    pub fn is_check(&self) -> bool {
        self.is_king_in_check(self.side)
    }

    pub fn is_king_in_check(&self, color: Color) -> bool {
        movegen::is_king_in_check(&self.grid, color)
    }

    /// Finds the legal move from `src` to `dst`
    pub fn find_move(&self, src: Coord, dst: Coord) -> Option<Move> {
        self.legal.find(src, dst).copied()
    }

    fn ensure_playable(&self) -> Result<(), MoveError> {
        if self.result.is_finished() {
            return Err(MoveError::GameFinished(self.result));
        }
        if let Some(p) = &self.pending {
            return Err(MoveError::PromotionPending(p.mv.dst()));
        }
        Ok(())
    }

    /// Applies the move
    ///
    /// The move must be one of the legal moves of the side to move, matched by its source
    /// and destination squares. If the move is a promotion, the board waits for
    /// [`Board::complete_promotion()`] and the turn doesn't pass.
    pub fn apply_move(&mut self, mv: Move) -> Result<Progress, MoveError> {
        self.ensure_playable()?;
        let mv = self
            .find_move(mv.src(), mv.dst())
            .ok_or_else(|| MoveError::NotLegal(mv.uci()))?;

        let before = self.grid;
        self.grid.make_move(&mv);
        if mv.kind() == MoveType::Promotion {
            debug!("promotion pending on {}", mv.dst());
            self.pending = Some(Pending { mv, before });
            self.legal.clear();
            return Ok(Progress::PromotionPending);
        }
        self.finish_turn(mv);
        Ok(Progress::Completed)
    }

    /// Replaces the pawn of the pending promotion with a piece of kind `kind` and passes
    /// the turn
    pub fn complete_promotion(&mut self, kind: PromoteKind) -> Result<(), MoveError> {
        let mut mv = self.pending.take().ok_or(MoveError::NoPendingPromotion)?.mv;
        let piece = Piece::new(self.side, kind.into()).with_moved(true);
        self.grid.put(mv.dst(), Some(piece));
        mv.set_piece(piece);
        debug!("promotion on {} completed with {}", mv.dst(), kind);
        self.finish_turn(mv);
        Ok(())
    }

    /// Applies the move given in UCI format, like `e2e4` or `e7e8q`
    ///
    /// If the move is a promotion and the piece is specified, the promotion is completed
    /// immediately. Otherwise, it stays pending.
    pub fn play_uci(&mut self, s: &str) -> Result<Progress, MoveError> {
        let parsed = uci::Move::from_str(s)?;
        self.ensure_playable()?;
        let mv = self
            .find_move(parsed.src, parsed.dst)
            .ok_or(MoveError::NotLegal(parsed))?;
        match (mv.kind(), parsed.promote) {
            (MoveType::Promotion, Some(kind)) => {
                self.apply_move(mv)?;
                self.complete_promotion(kind)?;
                Ok(Progress::Completed)
            }
            (_, Some(_)) => Err(MoveError::NotLegal(parsed)),
            (_, None) => self.apply_move(mv),
        }
    }

    fn finish_turn(&mut self, mv: Move) {
        self.history.record_move(mv);
        self.side = self.side.inv();
        self.refresh();
        debug!("move {} applied, fen: {}", mv.uci(), self.as_fen());
        if self.result.is_finished() {
            debug!("game finished: {}", self.result);
        }
    }

    fn refresh(&mut self) {
        self.legal = legal::gen_all(&self.grid, self.side, &self.history);
        let check = self.is_check();
        self.result = match (self.legal.is_empty(), check) {
            (true, true) => GameResult::win(self.side.inv()),
            (true, false) => GameResult::Draw,
            (false, _) => GameResult::InProgress,
        };
        if check {
            if self.result.is_finished() {
                self.history.record_checkmate();
            } else {
                self.history.record_check();
            }
        }
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::initial()
    }
}

impl TryFrom<RawPosition> for Board {
    type Error = ValidateError;

    fn try_from(mut raw: RawPosition) -> Result<Board, ValidateError> {
        // Check TooManyPieces, NoKing, TooManyKings
        for color in Color::ALL {
            if raw.grid.pieces_of(color).count() > 16 {
                return Err(ValidateError::TooManyPieces(color));
            }
            match raw
                .grid
                .pieces()
                .filter(|(_, p)| p.is(color, PieceKind::King))
                .count()
            {
                0 => return Err(ValidateError::NoKing(color)),
                1 => {}
                _ => return Err(ValidateError::TooManyKings(color)),
            }
        }

        // Check InvalidPawn
        if let Some((coord, _)) = raw.grid.pieces().find(|(c, p)| {
            p.kind() == PieceKind::Pawn && matches!(c.rank(), Rank::R1 | Rank::R8)
        }) {
            return Err(ValidateError::InvalidPawn(coord));
        }

        // Check OpponentKingAttacked
        if movegen::is_king_in_check(&raw.grid, raw.side.inv()) {
            return Err(ValidateError::OpponentKingAttacked);
        }

        // Reset bad castling flags
        for color in Color::ALL {
            if raw.grid.get(geometry::king_home(color)).map(|p| p.is(color, PieceKind::King))
                != Some(true)
            {
                raw.castling.unset_color(color);
            }
            for side in CastlingSide::ALL {
                if raw
                    .grid
                    .get(geometry::rook_home(color, side))
                    .map(|p| p.is(color, PieceKind::Rook))
                    != Some(true)
                {
                    raw.castling.unset(color, side);
                }
            }
        }

        // Derive moved flags from the position
        for coord in Coord::iter() {
            let piece = match raw.grid.get(coord) {
                Some(piece) => piece,
                None => continue,
            };
            let color = piece.color();
            let moved = match piece.kind() {
                PieceKind::Pawn => coord.rank() != geometry::pawn_start_rank(color),
                PieceKind::King => !raw.castling.has_any(color),
                PieceKind::Rook => !CastlingSide::ALL.into_iter().any(|side| {
                    raw.castling.has(color, side) && coord == geometry::rook_home(color, side)
                }),
                _ => false,
            };
            raw.grid.put(coord, Some(piece.with_moved(moved)));
        }

        let history = raw.history();
        Ok(Board::from_parts(raw.grid, raw.side, history))
    }
}

impl FromStr for Board {
    type Err = FenParseError;

    fn from_str(s: &str) -> Result<Board, Self::Err> {
        Ok(RawPosition::from_str(s)?.try_into()?)
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> Result<(), fmt::Error> {
        write!(f, "{}", self.raw())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fen;
    use crate::types::{CastlingRights, File};

    fn sq(s: &str) -> Coord {
        Coord::from_str(s).unwrap()
    }

    fn uci_list(b: &Board) -> Vec<String> {
        b.all_legal_moves().iter().map(|m| m.uci().to_string()).collect()
    }

    #[test]
    fn test_initial() {
        let board = Board::initial();
        assert_eq!(board.to_string(), fen::INITIAL);
        assert_eq!(Board::from_fen(fen::INITIAL), Ok(Board::initial()));
        assert_eq!(board.all_legal_moves().len(), 20);
        assert_eq!(board.result(), GameResult::InProgress);
        assert_eq!(board.side(), Color::White);
        assert!(!board.is_check());
        assert_eq!(board.legal_moves(sq("g1")).len(), 2);
        assert!(board.legal_moves(sq("e7")).is_empty());
        assert!(board.legal_moves(sq("e4")).is_empty());
    }

    #[test]
    fn test_simple() {
        let mut b = Board::initial();
        for (mv_str, fen_str) in [
            (
                "e2e4",
                "rnbqkbnr/pppppppp/8/8/4P3/8/PPPP1PPP/RNBQKBNR b KQkq e3 0 1",
            ),
            (
                "b8c6",
                "r1bqkbnr/pppppppp/2n5/8/4P3/8/PPPP1PPP/RNBQKBNR w KQkq - 1 2",
            ),
            (
                "g1f3",
                "r1bqkbnr/pppppppp/2n5/8/4P3/5N2/PPPP1PPP/RNBQKB1R b KQkq - 2 2",
            ),
            (
                "e7e5",
                "r1bqkbnr/pppp1ppp/2n5/4p3/4P3/5N2/PPPP1PPP/RNBQKB1R w KQkq e6 0 3",
            ),
            (
                "f1b5",
                "r1bqkbnr/pppp1ppp/2n5/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R b KQkq - 1 3",
            ),
            (
                "g8f6",
                "r1bqkb1r/pppp1ppp/2n2n2/1B2p3/4P3/5N2/PPPP1PPP/RNBQK2R w KQkq - 2 4",
            ),
            (
                "e1g1",
                "r1bqkb1r/pppp1ppp/2n2n2/1B2p3/4P3/5N2/PPPP1PPP/RNBQ1RK1 b kq - 3 4",
            ),
            (
                "f6e4",
                "r1bqkb1r/pppp1ppp/2n5/1B2p3/4n3/5N2/PPPP1PPP/RNBQ1RK1 w kq - 0 5",
            ),
        ] {
            assert_eq!(b.play_uci(mv_str), Ok(Progress::Completed));
            assert_eq!(b.as_fen(), fen_str);
            let reloaded = Board::from_fen(fen_str).unwrap();
            assert_eq!(uci_list(&reloaded), uci_list(&b));
        }
        assert_eq!(
            b.history().to_string(),
            "1. e4 Nc6 2. Nf3 e5 3. Bb5 Nf6 4. O-O Nxe4"
        );
    }

    #[test]
    fn test_promote() {
        let b_orig = Board::from_fen("1b1b1K2/2P5/8/8/7k/8/8/8 w - - 0 1").unwrap();
        assert_eq!(b_orig.legal_moves(sq("c7")).len(), 3);

        for (mv_str, fen_str, san) in [
            ("c7c8q", "1bQb1K2/8/8/8/7k/8/8/8 b - - 0 1", "c8=Q"),
            ("c7b8n", "1N1b1K2/8/8/8/7k/8/8/8 b - - 0 1", "cxb8=N"),
            ("c7d8r", "1b1R1K2/8/8/8/7k/8/8/8 b - - 0 1", "cxd8=R"),
        ] {
            let mut b = b_orig.clone();
            assert_eq!(b.play_uci(mv_str), Ok(Progress::Completed));
            assert_eq!(b.as_fen(), fen_str);
            assert_eq!(b.history().last_move().unwrap().to_string(), san);
            assert_eq!(b.history().last_move().unwrap().uci().to_string(), mv_str);
        }
    }

    #[test]
    fn test_two_phase_promotion() {
        let mut b = Board::from_fen("8/P7/8/8/8/8/8/k6K w - - 0 1").unwrap();
        assert_eq!(b.complete_promotion(PromoteKind::Queen), Err(MoveError::NoPendingPromotion));

        assert_eq!(b.play_uci("a7a8"), Ok(Progress::PromotionPending));
        assert_eq!(b.side(), Color::White);
        assert_eq!(b.result(), GameResult::InProgress);
        assert_eq!(b.pending_promotion().map(Move::dst), Some(sq("a8")));
        assert_eq!(b.as_fen(), "8/P7/8/8/8/8/8/k6K w - - 0 1");
        assert!(Board::from_fen(&b.as_fen()).is_ok());
        assert!(b.history().is_empty());
        assert!(b.all_legal_moves().is_empty());
        assert!(b.legal_moves(sq("h1")).is_empty());
        assert_eq!(b.play_uci("h1g1"), Err(MoveError::PromotionPending(sq("a8"))));

        assert_eq!(b.complete_promotion(PromoteKind::Queen), Ok(()));
        assert_eq!(b.side(), Color::Black);
        assert_eq!(b.pending_promotion(), None);
        assert_eq!(
            b.get(sq("a8")),
            Some(Piece::new(Color::White, PieceKind::Queen).with_moved(true))
        );
        assert!(b.is_check());
        assert_eq!(b.history().to_string(), "1. a8=Q+");
        assert_eq!(b.as_fen(), "Q7/8/8/8/8/8/8/k6K b - - 0 1");

        let fen_str = "r3k3/1P6/8/8/8/8/8/4K3 w q - 0 1";
        let mut b = Board::from_fen(fen_str).unwrap();
        assert_eq!(b.play_uci("b7a8"), Ok(Progress::PromotionPending));
        assert_eq!(b.as_fen(), fen_str);
        b.complete_promotion(PromoteKind::Rook).unwrap();
        assert_eq!(b.as_fen(), "R3k3/8/8/8/8/8/8/4K3 b - - 0 1");
    }

    #[test]
    fn test_illegal() {
        let mut b = Board::initial();
        assert_eq!(
            b.play_uci("e2e5"),
            Err(MoveError::NotLegal(uci::Move::from_str("e2e5").unwrap()))
        );
        assert_eq!(
            b.play_uci("e7e5"),
            Err(MoveError::NotLegal(uci::Move::from_str("e7e5").unwrap()))
        );
        assert_eq!(
            b.play_uci("e2e4q"),
            Err(MoveError::NotLegal(uci::Move::from_str("e2e4q").unwrap()))
        );
        assert_eq!(
            b.play_uci("e2"),
            Err(MoveError::Parse(uci::RawParseError::BadLength))
        );
        assert_eq!(b, Board::initial());
    }

    #[test]
    fn test_fixes() {
        const FEN: &str = "r1bq1b1r/ppppkppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK1R1 w KQkq c6 6 5";

        let raw = RawPosition::from_fen(FEN).unwrap();
        assert_eq!(raw.castling, CastlingRights::FULL);

        let board: Board = raw.try_into().unwrap();
        assert_eq!(
            board.history().castling(),
            CastlingRights::EMPTY.with(Color::White, CastlingSide::Queen)
        );
        assert_eq!(
            board.as_fen(),
            "r1bq1b1r/ppppkppp/2n2n2/4p3/2B1P3/5N2/PPPP1PPP/RNBQK1R1 w Q c6 6 5"
        );
        assert!(board.get(sq("g1")).unwrap().has_moved());
        assert!(!board.get(sq("a1")).unwrap().has_moved());
        assert!(!board.get(sq("e1")).unwrap().has_moved());
        assert!(board.get(sq("e7")).unwrap().has_moved());
        assert!(board.get(sq("e4")).unwrap().has_moved());
        assert!(!board.get(sq("d2")).unwrap().has_moved());
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            Board::from_fen("QQQQQQnk/Q4Qpp/Q5QQ/Q6Q/Q6Q/Q6Q/Q6Q/KQQQQQQQ w - - 0 1"),
            Err(ValidateError::TooManyPieces(Color::White).into())
        );
        assert_eq!(
            Board::from_fen("kqqqqqqq/q6q/q6q/8/8/q6q/q6q/KQqqqqqq w - - 0 1"),
            Err(ValidateError::TooManyPieces(Color::Black).into())
        );
        assert_eq!(
            Board::from_fen("8/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(ValidateError::NoKing(Color::Black).into())
        );
        assert_eq!(
            Board::from_fen("4k3/8/8/8/8/8/8/8 w - - 0 1"),
            Err(ValidateError::NoKing(Color::White).into())
        );
        assert_eq!(
            Board::from_fen("4k3/8/8/8/8/8/8/3KK3 w - - 0 1"),
            Err(ValidateError::TooManyKings(Color::White).into())
        );
        assert_eq!(
            Board::from_fen("4k2P/8/8/8/8/8/8/4K3 w - - 0 1"),
            Err(ValidateError::InvalidPawn(Coord::from_parts(File::H, Rank::R8)).into())
        );
        assert_eq!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1"),
            Ok(Board::from_fen("4k3/8/8/8/8/8/8/4K2r w - - 0 1").unwrap())
        );
        assert_eq!(
            Board::from_fen("4k3/8/8/8/8/8/8/4K2r b - - 0 1"),
            Err(ValidateError::OpponentKingAttacked.into())
        );
    }

    #[test]
    fn test_load_fen_atomic() {
        let mut b = Board::initial();
        b.play_uci("e2e4").unwrap();
        let before = b.clone();
        assert!(b.load_fen("rnbqkbnr/pppppppp/8/8/8/8/PPPPPPPP/RNBQKBNX w KQkq - 0 1").is_err());
        assert_eq!(b, before);
        assert!(b.load_fen("4k3/8/8/8/8/8/8/8 w - - 0 1").is_err());
        assert_eq!(b, before);

        b.load_fen("4k3/8/8/8/8/8/8/4K3 b - - 7 40").unwrap();
        assert_eq!(b.side(), Color::Black);
        assert!(b.history().is_empty());
        assert_eq!(b.history().full_move_number(), 40);
        assert_eq!(b.as_fen(), "4k3/8/8/8/8/8/8/4K3 b - - 7 40");
    }

    #[test]
    fn test_game_finished() {
        let mut b = Board::from_fen("7k/4Q3/6K1/8/8/8/8/8 w - - 0 1").unwrap();
        assert_eq!(b.play_uci("e7f7"), Ok(Progress::Completed));
        assert_eq!(b.result(), GameResult::Draw);
        assert!(!b.is_check());
        assert!(b.legal_moves(sq("h8")).is_empty());
        assert_eq!(
            b.play_uci("h8g8"),
            Err(MoveError::GameFinished(GameResult::Draw))
        );
    }
}
