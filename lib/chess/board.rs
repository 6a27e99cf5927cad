use crate::chess::{Color, Coord, GameMode, Geometry, Move, Outcome, Piece, PieceId, Player, Role};
use derive_more::{Display, Error};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::debug;

/// The reason why a [`Move`] was rejected by [`Board::make_move`].
#[derive(Debug, Display, Clone, Eq, PartialEq, Error)]
#[display("move `{_0}` is illegal in this position")]
pub struct IllegalMove(#[error(not(source))] pub Move);

/// The chess board.
///
/// Owns the piece arena, the tile occupancy, and one [`Player`] roster per
/// side. The board knows how pieces move; which positions are acceptable is
/// delegated to the [`GameMode`]. Legality checking mutates the board
/// speculatively and restores it before returning, which is why the checking
/// methods take `&mut self`.
#[derive(Debug, Clone)]
pub struct Board {
    geometry: Arc<dyn Geometry>,
    mode: Arc<dyn GameMode>,
    pieces: Vec<Piece>,
    occupancy: HashMap<Coord, PieceId>,
    players: [Player; 2],
}

/// Boards compare by position only, not by geometry or rules.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.pieces == other.pieces
            && self.occupancy == other.occupancy
            && self.players == other.players
    }
}

impl Eq for Board {}

impl Board {
    /// Constructs a [`Board`] set up with the mode's starting position.
    pub fn new(geometry: Arc<dyn Geometry>, mode: Arc<dyn GameMode>) -> Self {
        let mut board = Board::empty(geometry, mode);
        let mode = Arc::clone(&board.mode);
        mode.init_pieces(&mut board);
        board
    }

    /// Constructs a [`Board`] with no pieces on it.
    pub fn empty(geometry: Arc<dyn Geometry>, mode: Arc<dyn GameMode>) -> Self {
        Board {
            geometry,
            mode,
            pieces: Vec::new(),
            occupancy: HashMap::new(),
            players: [Player::new(Color::White), Player::new(Color::Black)],
        }
    }

    /// The shape of this board.
    #[inline(always)]
    pub fn geometry(&self) -> &dyn Geometry {
        &*self.geometry
    }

    /// The rules this board is played under.
    #[inline(always)]
    pub fn mode(&self) -> &dyn GameMode {
        &*self.mode
    }

    /// The piece behind a handle.
    #[inline(always)]
    pub fn piece(&self, id: PieceId) -> &Piece {
        &self.pieces[id.index()]
    }

    /// The piece standing on a tile, if any.
    #[inline(always)]
    pub fn piece_at(&self, c: Coord) -> Option<PieceId> {
        self.occupancy.get(&c).copied()
    }

    /// The given side's roster.
    #[inline(always)]
    pub fn player(&self, color: Color) -> &Player {
        &self.players[color.index()]
    }

    /// Mutable access to the given side's roster.
    #[inline(always)]
    pub fn player_mut(&mut self, color: Color) -> &mut Player {
        &mut self.players[color.index()]
    }

    /// Places a new piece on the board and enrolls it with its side.
    pub fn spawn(&mut self, role: Role, color: Color, location: Coord) -> PieceId {
        debug_assert!(self.geometry.in_bounds(location));
        debug_assert!(self.piece_at(location).is_none());

        let id = PieceId(self.pieces.len() as u16);

        self.pieces.push(Piece {
            role,
            color,
            location,
            has_moved: false,
        });

        self.occupancy.insert(location, id);
        self.players[color.index()].add_piece(id, role);

        id
    }

    /// Whether the coordinate names a tile on this board.
    #[inline(always)]
    pub fn in_bounds(&self, c: Coord) -> bool {
        self.geometry.in_bounds(c)
    }

    /// Whether the tile holds a piece of the opposite color.
    pub fn has_enemy_piece(&self, c: Coord, color: Color) -> bool {
        self.piece_at(c).is_some_and(|id| self.piece(id).color != color)
    }

    /// Whether a piece of the given color may land on this tile.
    pub fn is_movable_tile(&self, c: Coord, color: Color, can_capture: bool) -> bool {
        self.in_bounds(c)
            && match self.piece_at(c) {
                None => true,
                Some(id) => can_capture && self.piece(id).color != color,
            }
    }

    /// Whether any of the victim's opponents could capture on this tile.
    ///
    /// Threats are read off raw capture candidates, so an opposing piece
    /// pressures a tile even when moving there would be illegal for it.
    pub fn is_threatened(&self, c: Coord, victim: Color) -> bool {
        self.player(!victim)
            .pieces()
            .iter()
            .any(|&id| self.capture_moves(id).iter().any(|m| m.whither() == c))
    }

    /// Whether the move would leave the board in a position the
    /// [`GameMode`] accepts.
    ///
    /// The move is applied speculatively, judged, and undone, leaving the
    /// board exactly as it was.
    pub fn is_legal(&mut self, m: &mut Move) -> bool {
        if m.is_applied() {
            return false;
        }

        let mode = Arc::clone(&self.mode);
        let mover = self.piece(m.piece()).color;

        m.execute(self, false);
        let valid = mode.board_valid(self, mover, m);
        m.undo(self);

        valid
    }

    /// Every legal move available to the given side.
    pub fn all_moves(&mut self, color: Color) -> Vec<Move> {
        let ids = self.player(color).pieces().to_vec();
        let mut moves = Vec::new();
        for id in ids {
            moves.extend(self.valid_moves(id));
        }
        moves
    }

    /// Whether the given side has no legal move left.
    pub fn no_possible_moves(&mut self, color: Color) -> bool {
        let ids = self.player(color).pieces().to_vec();
        ids.into_iter().all(|id| self.valid_moves(id).is_empty())
    }

    /// Commits a move to the board.
    ///
    /// The move must be one of the mover's [`Self::valid_moves`] and not
    /// already applied, otherwise the board is left untouched and the move is
    /// returned in the error.
    pub fn make_move(&mut self, m: &mut Move) -> Result<(), IllegalMove> {
        if m.is_applied() || !self.valid_moves(m.piece()).contains(m) {
            return Err(IllegalMove(m.clone()));
        }

        m.execute(self, true);
        debug!(%m, "played");
        self.mode.post_move_action(self, m);

        Ok(())
    }

    /// The result of the game, if it is over for the side to move.
    pub fn outcome(&mut self, to_move: Color) -> Option<Outcome> {
        if !self.no_possible_moves(to_move) {
            return None;
        }

        if self.mode.has_player_lost(self, to_move) {
            Some(Outcome::Win(!to_move))
        } else {
            Some(Outcome::Stalemate)
        }
    }

    /// The center of the tile in render space.
    pub fn render_position(&self, c: Coord) -> (f32, f32) {
        self.geometry.render_position(c)
    }

    /// The tile containing the given render-space point.
    pub fn board_position(&self, p: (f32, f32)) -> Coord {
        self.geometry.board_position(p)
    }

    pub(crate) fn capture(&mut self, id: PieceId) {
        let piece = self.pieces[id.index()];
        self.occupancy.remove(&piece.location);
        self.pieces[id.index()].location = Coord::OFF_BOARD;
        self.players[piece.color.index()].piece_captured(id);
    }

    pub(crate) fn uncapture(&mut self, id: PieceId, at: Coord) {
        let color = self.pieces[id.index()].color;
        self.pieces[id.index()].location = at;
        self.occupancy.insert(at, id);
        self.players[color.index()].piece_uncaptured(id);
    }

    pub(crate) fn relocate(&mut self, id: PieceId, to: Coord) {
        let from = self.pieces[id.index()].location;
        self.occupancy.remove(&from);
        self.occupancy.insert(to, id);
        self.pieces[id.index()].location = to;
    }

    pub(crate) fn set_has_moved(&mut self, id: PieceId, has_moved: bool) {
        self.pieces[id.index()].has_moved = has_moved;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chess::{MockGameMode, Rectangular, StandardGame};
    use proptest::sample::Selector;
    use test_strategy::proptest;

    fn board() -> Board {
        Board::new(Arc::new(Rectangular::default()), Arc::new(StandardGame))
    }

    fn empty() -> Board {
        Board::empty(Arc::new(Rectangular::default()), Arc::new(StandardGame))
    }

    #[test]
    fn spawned_pieces_occupy_their_tile() {
        let mut board = empty();
        let r = board.spawn(Role::Rook, Color::White, Coord::new(0, 0));

        assert_eq!(board.piece_at(Coord::new(0, 0)), Some(r));
        assert_eq!(board.piece(r).role, Role::Rook);
        assert_eq!(board.piece(r).color, Color::White);
        assert_eq!(board.piece(r).location(), Coord::new(0, 0));
        assert!(!board.piece(r).has_moved());
        assert_eq!(board.player(Color::White).pieces(), &[r]);
    }

    #[test]
    fn a_threatened_king_must_step_out_of_check() {
        let mut board = empty();
        board.spawn(Role::Bishop, Color::White, Coord::new(4, 4));
        let k = board.spawn(Role::King, Color::Black, Coord::new(2, 2));

        assert!(board.is_threatened(board.piece(k).location(), Color::Black));
        assert_eq!(board.all_moves(Color::Black).len(), 6);
    }

    #[test]
    fn a_friendly_pawn_blocks_the_check_and_is_pinned() {
        let mut board = empty();
        board.spawn(Role::Bishop, Color::White, Coord::new(4, 4));
        board.spawn(Role::Pawn, Color::Black, Coord::new(3, 3));
        let k = board.spawn(Role::King, Color::Black, Coord::new(2, 2));

        assert!(!board.is_threatened(board.piece(k).location(), Color::Black));
        assert_eq!(board.all_moves(Color::Black).len(), 7);
    }

    #[test]
    fn a_cornered_king_has_only_two_escapes() {
        let mut board = empty();
        board.spawn(Role::Bishop, Color::White, Coord::new(4, 4));
        board.spawn(Role::Rook, Color::White, Coord::new(4, 1));
        board.spawn(Role::Rook, Color::White, Coord::new(1, 4));
        let k = board.spawn(Role::King, Color::Black, Coord::new(2, 2));

        let moves = board.all_moves(Color::Black);
        assert_eq!(moves.len(), 2);
        assert!(moves.contains(&Move::new(k, Coord::new(2, 2), Coord::new(2, 3))));
        assert!(moves.contains(&Move::new(k, Coord::new(2, 2), Coord::new(3, 2))));

        let q = board.spawn(Role::Queen, Color::Black, Coord::new(3, 2));

        let moves = board.all_moves(Color::Black);
        assert_eq!(moves.len(), 2);
        assert!(moves.contains(&Move::new(k, Coord::new(2, 2), Coord::new(2, 3))));
        assert!(moves.contains(&Move::new(q, Coord::new(3, 2), Coord::new(3, 3))));
    }

    #[test]
    fn a_knight_delivers_a_smothered_mate() {
        let mut board = empty();
        board.spawn(Role::Bishop, Color::White, Coord::new(4, 4));
        let n = board.spawn(Role::Knight, Color::White, Coord::new(5, 4));
        board.spawn(Role::King, Color::White, Coord::new(3, 3));
        board.spawn(Role::Rook, Color::Black, Coord::new(5, 7));
        let k = board.spawn(Role::King, Color::Black, Coord::new(6, 7));
        board.spawn(Role::Pawn, Color::Black, Coord::new(5, 6));
        board.spawn(Role::Pawn, Color::Black, Coord::new(7, 6));
        board.spawn(Role::Pawn, Color::Black, Coord::new(6, 5));

        assert!(!board.is_threatened(board.piece(k).location(), Color::Black));

        let mut m = Move::new(n, Coord::new(5, 4), Coord::new(7, 5));
        assert_eq!(board.make_move(&mut m), Ok(()));

        assert!(board.is_threatened(board.piece(k).location(), Color::Black));
        assert!(board.no_possible_moves(Color::Black));
        assert!(board.all_moves(Color::Black).is_empty());
        assert_eq!(board.outcome(Color::Black), Some(Outcome::Win(Color::White)));
    }

    #[test]
    fn a_king_with_no_moves_and_no_check_is_stalemated() {
        let mut board = empty();
        board.spawn(Role::King, Color::Black, Coord::new(0, 7));
        board.spawn(Role::Queen, Color::White, Coord::new(2, 6));
        board.spawn(Role::King, Color::White, Coord::new(1, 5));

        assert_eq!(board.outcome(Color::Black), Some(Outcome::Stalemate));
        assert_eq!(board.outcome(Color::White), None);
    }

    #[test]
    fn the_game_is_not_over_while_moves_remain() {
        let mut board = board();
        assert!(!board.no_possible_moves(Color::White));
        assert_eq!(board.all_moves(Color::White).len(), 20);
        assert_eq!(board.outcome(Color::White), None);
        assert_eq!(board.outcome(Color::Black), None);
    }

    #[test]
    fn moves_outside_the_valid_set_are_rejected() {
        let mut board = board();
        let r = board.piece_at(Coord::new(0, 0)).unwrap();
        let mut m = Move::new(r, Coord::new(0, 0), Coord::new(0, 5));

        assert_eq!(board.make_move(&mut m), Err(IllegalMove(m.clone())));
        assert_eq!(board, Board::new(board.geometry.clone(), board.mode.clone()));
    }

    #[test]
    fn applied_moves_are_rejected() {
        let mut board = board();
        let p = board.piece_at(Coord::new(4, 1)).unwrap();
        let mut m = Move::new(p, Coord::new(4, 1), Coord::new(4, 3));

        assert_eq!(board.make_move(&mut m), Ok(()));
        assert_eq!(board.make_move(&mut m), Err(IllegalMove(m.clone())));
    }

    #[test]
    fn legality_is_judged_while_the_move_is_applied() {
        let mut mode = MockGameMode::new();
        mode.expect_board_valid()
            .once()
            .returning(|board, _, m| board.piece_at(m.whither()) == Some(m.piece()));

        let mut board = Board::empty(Arc::new(Rectangular::default()), Arc::new(mode));
        let n = board.spawn(Role::Knight, Color::White, Coord::new(1, 0));
        let before = board.clone();

        let mut m = Move::new(n, Coord::new(1, 0), Coord::new(2, 2));
        assert!(board.is_legal(&mut m));
        assert_eq!(board, before);
    }

    #[test]
    fn the_mode_is_notified_once_a_move_is_committed() {
        let mut mode = MockGameMode::new();
        mode.expect_board_valid().returning(|_, _, _| true);
        mode.expect_post_move_action().once().return_const(());

        let mut board = Board::empty(Arc::new(Rectangular::default()), Arc::new(mode));
        let n = board.spawn(Role::Knight, Color::White, Coord::new(1, 0));

        let mut m = Move::new(n, Coord::new(1, 0), Coord::new(2, 2));
        assert_eq!(board.make_move(&mut m), Ok(()));
        assert!(m.is_applied());
    }

    #[proptest]
    fn legality_checks_leave_the_board_untouched(selector: Selector) {
        let mut board = board();
        let before = board.clone();

        let ids = board.player(Color::White).pieces().to_vec();
        let candidates = ids
            .into_iter()
            .flat_map(|id| board.possible_moves(id))
            .collect::<Vec<_>>();

        let mut m = selector.select(candidates);
        let legal = board.is_legal(&mut m);
        assert_eq!(board, before);
        assert_eq!(board.is_legal(&mut m), legal);
    }

    #[proptest]
    fn legal_moves_never_leave_the_mover_exposed(selector: Selector) {
        let mut board = board();
        let mut m = selector.select(board.all_moves(Color::White));
        assert_eq!(board.make_move(&mut m), Ok(()));

        let k = board.player(Color::White).king().unwrap();
        assert!(!board.is_threatened(board.piece(k).location(), Color::White));
    }

    #[proptest]
    fn undoing_moves_in_reverse_order_restores_the_initial_position(
        #[strategy(0usize..4)] n: usize,
        selector: Selector,
    ) {
        let mut board = board();
        let initial = board.clone();
        let mut color = Color::White;
        let mut played = Vec::new();

        for _ in 0..n {
            let moves = board.all_moves(color);
            if moves.is_empty() {
                break;
            }

            let mut m = selector.select(moves);
            assert_eq!(board.make_move(&mut m), Ok(()));
            played.push(m);
            color = !color;
        }

        for mut m in played.into_iter().rev() {
            m.undo(&mut board);
        }

        assert_eq!(board, initial);
    }

    #[proptest]
    fn render_positions_delegate_to_the_geometry(
        #[strategy(0i8..8)] f: i8,
        #[strategy(0i8..8)] r: i8,
    ) {
        let board = board();
        let c = Coord::new(f, r);
        assert_eq!(board.render_position(c), Rectangular::default().render_position(c));
        assert_eq!(board.board_position(board.render_position(c)), c);
    }
}
