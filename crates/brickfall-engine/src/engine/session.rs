use std::{mem, time::Duration};

use log::{debug, info};
use rand::{Rng as _, SeedableRng as _};
use rand_pcg::Pcg32;

use crate::{
    PieceCollisionError, SessionError,
    core::{
        grid::Grid,
        piece::{Piece, RotationDirection},
    },
};

use super::{
    bag::{PieceBag, PieceSeed},
    config::{ConfigError, GameConfig},
    event::{GameEvent, GameSummary},
    stats::{GameStats, LockOutcome},
};

/// Lifecycle of a [`GameSession`].
///
/// `Idle -> Running <-> Paused`, and `Running -> GameOver` when a new piece
/// cannot spawn. Starting again from `GameOver` begins a new game.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum SessionState {
    #[default]
    Idle,
    Running,
    Paused,
    GameOver,
}

/// Result of a single downward step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::IsVariant)]
pub enum DropOutcome {
    /// The piece moved one row down.
    Moved,
    /// The piece could not move and was locked.
    Locked(LockOutcome),
}

/// Result of a hard drop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HardDrop {
    /// Rows the piece fell.
    pub distance: usize,
    /// Set when the piece was locked, which only happens if it moved.
    pub lock: Option<LockOutcome>,
}

/// A single game: grid, pieces, counters and the drop timer.
///
/// The session is driven by its caller: player actions are plain method
/// calls, and [`GameSession::tick`] advances gravity from a monotonically
/// increasing timestamp. Actions that cannot be applied return a
/// [`SessionError`] and leave the session untouched.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use brickfall_engine::{GameConfig, GameSession, RotationDirection};
///
/// let mut session = GameSession::new(GameConfig::default()).unwrap();
/// session.start(Duration::ZERO);
///
/// let _ = session.move_piece(-1, 0);
/// let _ = session.rotate(RotationDirection::Clockwise);
/// session.hard_drop().unwrap();
/// session.tick(Duration::from_secs(1));
///
/// for event in session.drain_events() {
///     println!("{event:?}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    seed_rng: Pcg32,
    seed: PieceSeed,
    grid: Grid,
    bag: PieceBag,
    current: Option<Piece>,
    next: Option<Piece>,
    held: Option<Piece>,
    can_hold: bool,
    stats: GameStats,
    state: SessionState,
    last_drop: Duration,
    events: Vec<GameEvent>,
}

impl GameSession {
    /// Creates an idle session with a random seed.
    pub fn new(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_seed(config, rand::rng().random())
    }

    /// Like [`Self::new`], but every game of this session draws its pieces
    /// from generators derived from `seed`.
    pub fn with_seed(config: GameConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut seed_rng = Pcg32::from_seed(seed.to_bytes());
        let game_seed = seed_rng.random();
        Ok(Self {
            grid: Grid::new(config.grid_width, config.grid_height),
            bag: PieceBag::with_seed(game_seed).with_spawn_shift(config.spawn_shift()),
            config,
            seed_rng,
            seed: game_seed,
            current: None,
            next: None,
            held: None,
            can_hold: true,
            stats: GameStats::new(),
            state: SessionState::Idle,
            last_drop: Duration::ZERO,
            events: vec![],
        })
    }

    /// Seeds the high score, typically with a previously stored value.
    #[must_use]
    pub fn with_high_score(mut self, high_score: usize) -> Self {
        self.stats = GameStats::with_high_score(high_score);
        self
    }

    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Seed of the piece generator of the current game.
    #[must_use]
    pub fn seed(&self) -> PieceSeed {
        self.seed
    }

    #[must_use]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    #[must_use]
    pub fn state(&self) -> SessionState {
        self.state
    }

    #[must_use]
    pub fn current_piece(&self) -> Option<&Piece> {
        self.current.as_ref()
    }

    #[must_use]
    pub fn next_piece(&self) -> Option<&Piece> {
        self.next.as_ref()
    }

    #[must_use]
    pub fn held_piece(&self) -> Option<&Piece> {
        self.held.as_ref()
    }

    #[must_use]
    pub fn can_hold(&self) -> bool {
        self.can_hold
    }

    /// Current gravity interval, derived from the level.
    #[must_use]
    pub fn drop_interval(&self) -> Duration {
        self.config.drop_interval(self.stats.level())
    }

    #[must_use]
    pub fn summary(&self) -> GameSummary {
        GameSummary {
            score: self.stats.score(),
            lines: self.stats.lines(),
            level: self.stats.level(),
            high_score: self.stats.high_score(),
        }
    }

    /// Takes every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        mem::take(&mut self.events)
    }

    /// Starts a new game from `Idle` or `GameOver`.
    ///
    /// The grid, bag and counters are reinitialized; the high score is kept.
    /// Has no effect while a game is running or paused.
    pub fn start(&mut self, now: Duration) {
        if matches!(self.state, SessionState::Running | SessionState::Paused) {
            return;
        }
        self.reinitialize();
        self.state = SessionState::Running;
        self.last_drop = now;
        info!("game started (seed {})", self.seed);
        self.spawn();
    }

    /// Returns to `Idle` with a fresh grid, bag and counters.
    pub fn reset(&mut self) {
        self.reinitialize();
        self.state = SessionState::Idle;
        info!("session reset");
    }

    fn reinitialize(&mut self) {
        self.seed = self.seed_rng.random();
        self.grid = Grid::new(self.config.grid_width, self.config.grid_height);
        self.bag = PieceBag::with_seed(self.seed).with_spawn_shift(self.config.spawn_shift());
        self.current = None;
        self.next = None;
        self.held = None;
        self.can_hold = true;
        self.stats = GameStats::with_high_score(self.stats.high_score());
    }

    /// Pauses a running game or resumes a paused one.
    ///
    /// Resuming restarts the drop timer at `now`, so time spent paused never
    /// triggers a drop.
    pub fn toggle_pause(&mut self, now: Duration) {
        match self.state {
            SessionState::Running => {
                self.state = SessionState::Paused;
                self.events.push(GameEvent::Paused);
            }
            SessionState::Paused => {
                self.state = SessionState::Running;
                self.last_drop = now;
                self.events.push(GameEvent::Resumed);
            }
            SessionState::Idle | SessionState::GameOver => {}
        }
    }

    /// Forces a pause when the game loses input focus. Never resumes.
    pub fn focus_lost(&mut self) {
        if self.state.is_running() {
            self.state = SessionState::Paused;
            self.events.push(GameEvent::Paused);
        }
    }

    /// Advances gravity: performs a soft drop once the drop interval has
    /// elapsed since the last automatic drop.
    pub fn tick(&mut self, now: Duration) -> Option<DropOutcome> {
        if !self.state.is_running() {
            return None;
        }
        if now.saturating_sub(self.last_drop) < self.drop_interval() {
            return None;
        }
        self.last_drop = now;
        self.soft_drop().ok()
    }

    fn active_piece(&self) -> Result<Piece, SessionError> {
        match (self.state, self.current) {
            (SessionState::Running, Some(piece)) => Ok(piece),
            _ => Err(SessionError::NotRunning),
        }
    }

    /// Translates the falling piece if the target position is free.
    pub fn move_piece(&mut self, dx: i32, dy: i32) -> Result<(), SessionError> {
        let piece = self.active_piece()?;
        if self.grid.collides(&piece, dx, dy) {
            return Err(PieceCollisionError.into());
        }
        self.current = Some(piece.moved(dx, dy));
        self.events.push(GameEvent::PieceMoved);
        Ok(())
    }

    /// Rotates the falling piece, trying wall kicks against the grid.
    pub fn rotate(&mut self, direction: RotationDirection) -> Result<(), SessionError> {
        let mut piece = self.active_piece()?;
        piece.rotate(direction, &self.grid)?;
        self.current = Some(piece);
        self.events.push(GameEvent::PieceRotated);
        Ok(())
    }

    /// Moves the falling piece one row down, locking it if it cannot move.
    pub fn soft_drop(&mut self) -> Result<DropOutcome, SessionError> {
        let piece = self.active_piece()?;
        if self.grid.collides(&piece, 0, 1) {
            return Ok(DropOutcome::Locked(self.lock(piece)));
        }
        self.current = Some(piece.moved(0, 1));
        self.events.push(GameEvent::PieceMoved);
        Ok(DropOutcome::Moved)
    }

    /// Drops the falling piece as far as it goes and locks it.
    ///
    /// A piece that is already resting (distance 0) is not locked and no
    /// event is queued; gravity locks it on the next tick.
    pub fn hard_drop(&mut self) -> Result<HardDrop, SessionError> {
        let mut piece = self.active_piece()?;
        let mut distance = 0;
        while !self.grid.collides(&piece, 0, 1) {
            piece.move_by(0, 1);
            distance += 1;
        }
        self.current = Some(piece);
        if distance == 0 {
            return Ok(HardDrop {
                distance,
                lock: None,
            });
        }
        self.events.push(GameEvent::HardDropped { distance });
        let lock = Some(self.lock(piece));
        Ok(HardDrop { distance, lock })
    }

    /// Banks the falling piece, or swaps it with the banked one.
    ///
    /// Allowed once per spawned piece. The first hold banks the piece and
    /// spawns the next one, which ends the game if the spawn is blocked. A
    /// swap is refused if the banked piece would collide at its spawn position.
    pub fn hold(&mut self) -> Result<(), SessionError> {
        let mut piece = self.active_piece()?;
        if !self.can_hold {
            return Err(SessionError::HoldAlreadyUsed);
        }
        piece.reset_position();

        let Some(mut held) = self.held else {
            self.held = Some(piece);
            self.events.push(GameEvent::HoldUsed);
            self.spawn();
            self.can_hold = false;
            return Ok(());
        };
        held.reset_position();
        if self.grid.collides(&held, 0, 0) {
            return Err(PieceCollisionError.into());
        }
        self.current = Some(held);
        self.held = Some(piece);
        self.can_hold = false;
        self.events.push(GameEvent::HoldUsed);
        Ok(())
    }

    /// Position the falling piece would land at after a hard drop.
    #[must_use]
    pub fn drop_preview(&self) -> Option<Piece> {
        let mut piece = self.current?;
        while !self.grid.collides(&piece, 0, 1) {
            piece.move_by(0, 1);
        }
        Some(piece)
    }

    fn lock(&mut self, piece: Piece) -> LockOutcome {
        self.grid.lock(&piece);
        let cleared = self.grid.clear_full_rows();
        let outcome = self.stats.record_lock(cleared, &self.config);
        debug!(
            "locked {:?} at ({}, {}), cleared {cleared}",
            piece.kind(),
            piece.position().x(),
            piece.position().y()
        );
        if cleared > 0 {
            self.events.push(GameEvent::LinesCleared {
                count: cleared,
                combo: outcome.combo,
                points: outcome.points,
            });
        }
        if let Some(level) = outcome.level_up {
            debug!("level up: {level}");
            self.events.push(GameEvent::LevelUp { level });
        }
        self.spawn();
        outcome
    }

    fn spawn(&mut self) {
        let piece = self.next.take().unwrap_or_else(|| self.bag.next_piece());
        self.next = Some(self.bag.next_piece());
        self.current = Some(piece);
        self.can_hold = true;
        debug!("spawned {:?}", piece.kind());
        if self.grid.collides(&piece, 0, 0) {
            self.state = SessionState::GameOver;
            let summary = self.summary();
            info!(
                "game over: score {}, lines {}, level {}",
                summary.score, summary.lines, summary.level
            );
            self.events.push(GameEvent::GameOver { summary });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{catalog::PieceKind, grid::Block, piece::Position};

    const SEED: PieceSeed = PieceSeed::from_bytes([7; 16]);

    fn started() -> GameSession {
        let mut session = GameSession::with_seed(GameConfig::default(), SEED).unwrap();
        session.start(Duration::ZERO);
        session.drain_events();
        session
    }

    fn with_current(kind: PieceKind) -> GameSession {
        let mut session = started();
        session.current = Some(Piece::new(kind));
        session
    }

    fn fill_row_except(session: &mut GameSession, y: i32, gaps: &[i32]) {
        for x in 0..10 {
            if !gaps.contains(&x) {
                session
                    .grid
                    .set_cell(Position::new(x, y), Block::Piece(PieceKind::J));
            }
        }
    }

    fn occupied(session: &GameSession) -> usize {
        session.grid.rows().flatten().filter(|b| !b.is_empty()).count()
    }

    mod lifecycle {
        use super::*;

        #[test]
        fn test_new_session_is_idle() {
            let mut session = GameSession::new(GameConfig::default()).unwrap();
            assert!(session.state().is_idle());
            assert!(session.current_piece().is_none());
            assert_eq!(session.move_piece(1, 0), Err(SessionError::NotRunning));
            assert_eq!(session.hold(), Err(SessionError::NotRunning));
            assert_eq!(session.tick(Duration::from_secs(10)), None);
        }

        #[test]
        fn test_invalid_config_is_rejected() {
            let config = GameConfig {
                lines_per_level: 0,
                ..GameConfig::default()
            };
            assert_eq!(
                GameSession::new(config).unwrap_err(),
                ConfigError::ZeroLinesPerLevel
            );
        }

        #[test]
        fn test_start_spawns_pieces() {
            let session = started();
            assert!(session.state().is_running());
            let current = session.current_piece().unwrap();
            assert_eq!(current.position(), current.kind().shape().spawn_offset());
            assert!(session.next_piece().is_some());
            assert!(session.held_piece().is_none());
            assert!(session.can_hold());
            assert_eq!(session.stats().level(), 1);
            assert_eq!(session.drop_interval(), Duration::from_millis(1000));
        }

        #[test]
        fn test_start_while_running_is_noop() {
            let mut session = started();
            session.move_piece(0, 3).unwrap();
            let before = *session.current_piece().unwrap();
            session.start(Duration::from_secs(5));
            assert_eq!(*session.current_piece().unwrap(), before);
        }

        #[test]
        fn test_same_seed_same_game() {
            let a = started();
            let b = started();
            assert_eq!(a.seed(), b.seed());
            assert_eq!(a.current_piece(), b.current_piece());
            assert_eq!(a.next_piece(), b.next_piece());
        }

        #[test]
        fn test_pause_and_resume() {
            let mut session = started();
            session.toggle_pause(Duration::from_millis(100));
            assert!(session.state().is_paused());
            assert_eq!(session.move_piece(1, 0), Err(SessionError::NotRunning));
            assert_eq!(session.tick(Duration::from_secs(60)), None);
            session.toggle_pause(Duration::from_millis(200));
            assert!(session.state().is_running());
            assert_eq!(
                session.drain_events(),
                vec![GameEvent::Paused, GameEvent::Resumed]
            );
        }

        #[test]
        fn test_focus_lost_pauses_without_resuming() {
            let mut session = started();
            session.focus_lost();
            assert!(session.state().is_paused());
            session.focus_lost();
            assert!(session.state().is_paused());
            assert_eq!(session.drain_events(), vec![GameEvent::Paused]);
        }

        #[test]
        fn test_reset_keeps_high_score() {
            let mut session = GameSession::with_seed(GameConfig::default(), SEED)
                .unwrap()
                .with_high_score(1234);
            session.start(Duration::ZERO);
            session.hard_drop().unwrap();
            session.reset();
            assert!(session.state().is_idle());
            assert_eq!(session.stats().high_score(), 1234);
            assert_eq!(session.stats().completed_pieces(), 0);
            assert_eq!(occupied(&session), 0);
            assert!(session.current_piece().is_none());
        }

        #[test]
        fn test_custom_width_spawns_centered() {
            let config = GameConfig {
                grid_width: 14,
                ..GameConfig::default()
            };
            let mut session = GameSession::with_seed(config, SEED).unwrap();
            session.start(Duration::ZERO);
            let piece = session.current_piece().unwrap();
            assert_eq!(
                piece.position(),
                piece.kind().shape().spawn_offset().offset(2, 0)
            );
            assert_eq!(session.grid().width(), 14);
        }
    }

    mod actions {
        use super::*;

        #[test]
        fn test_move_into_wall_is_rejected() {
            let mut session = with_current(PieceKind::O);
            for _ in 0..4 {
                session.move_piece(-1, 0).unwrap();
            }
            let before = *session.current_piece().unwrap();
            assert_eq!(
                session.move_piece(-1, 0),
                Err(SessionError::PieceCollision(PieceCollisionError))
            );
            assert_eq!(*session.current_piece().unwrap(), before);
            assert_eq!(session.drain_events().len(), 4);
        }

        #[test]
        fn test_rotate_emits_event() {
            let mut session = with_current(PieceKind::T);
            session.move_piece(0, 2).unwrap();
            session.drain_events();
            session.rotate(RotationDirection::Clockwise).unwrap();
            assert_eq!(session.current_piece().unwrap().rotation().value(), 1);
            assert_eq!(session.drain_events(), vec![GameEvent::PieceRotated]);
        }

        #[test]
        fn test_rotate_kicks_off_wall() {
            let mut session = with_current(PieceKind::T);
            session.move_piece(0, 2).unwrap();
            session.rotate(RotationDirection::Clockwise).unwrap();
            // vertical T hugging the left wall
            for _ in 0..4 {
                session.move_piece(-1, 0).unwrap();
            }
            assert_eq!(session.current_piece().unwrap().position().x(), -1);
            session.rotate(RotationDirection::Clockwise).unwrap();
            let cells = session.current_piece().unwrap().cells();
            assert!(cells.iter().all(|c| c.x() >= 0));
        }

        #[test]
        fn test_soft_drop_moves_then_locks() {
            let mut session = with_current(PieceKind::O);
            session.move_piece(0, 17).unwrap();
            session.drain_events();
            assert_eq!(session.soft_drop(), Ok(DropOutcome::Moved));
            assert_eq!(session.drain_events(), vec![GameEvent::PieceMoved]);
            let locked = session.soft_drop().unwrap();
            assert!(locked.is_locked());
            assert!(!session.drain_events().contains(&GameEvent::PieceMoved));
            assert_eq!(occupied(&session), 4);
            assert_eq!(session.stats().completed_pieces(), 1);
        }

        #[test]
        fn test_hard_drop_locks_at_bottom() {
            let mut session = with_current(PieceKind::O);
            let drop = session.hard_drop().unwrap();
            assert_eq!(drop.distance, 18);
            assert!(drop.lock.is_some());
            assert!(
                session
                    .drain_events()
                    .contains(&GameEvent::HardDropped { distance: 18 })
            );
            assert_eq!(
                session.grid().cell(Position::new(4, 19)),
                Some(Block::Piece(PieceKind::O))
            );
            assert_eq!(session.stats().completed_pieces(), 1);
            assert!(session.current_piece().is_some());
            assert!(session.state().is_running());
        }

        #[test]
        fn test_hard_drop_resting_piece_does_not_lock() {
            let mut session = with_current(PieceKind::O);
            session.move_piece(0, 18).unwrap();
            session.drain_events();
            let drop = session.hard_drop().unwrap();
            assert_eq!(drop, HardDrop { distance: 0, lock: None });
            assert!(session.drain_events().is_empty());
            assert_eq!(occupied(&session), 0);
            assert_eq!(session.stats().completed_pieces(), 0);
        }

        #[test]
        fn test_line_clear_scores() {
            let mut session = with_current(PieceKind::O);
            fill_row_except(&mut session, 18, &[4, 5]);
            fill_row_except(&mut session, 19, &[4, 5]);
            let drop = session.hard_drop().unwrap();
            let lock = drop.lock.unwrap();
            assert_eq!(lock.cleared_lines, 2);
            assert_eq!(session.stats().score(), 300);
            assert_eq!(session.stats().lines(), 2);
            assert_eq!(occupied(&session), 0);
            assert!(session.drain_events().contains(&GameEvent::LinesCleared {
                count: 2,
                combo: 1,
                points: 300
            }));
        }

        #[test]
        fn test_drop_preview() {
            let mut session = with_current(PieceKind::O);
            let preview = session.drop_preview().unwrap();
            assert_eq!(preview.position(), Position::new(4, 18));
            assert_eq!(session.current_piece().unwrap().position(), Position::new(4, 0));
            session.reset();
            assert_eq!(session.drop_preview(), None);
        }
    }

    mod hold {
        use super::*;

        #[test]
        fn test_first_hold_takes_next_piece() {
            let mut session = with_current(PieceKind::T);
            session.move_piece(1, 3).unwrap();
            let next = *session.next_piece().unwrap();
            session.hold().unwrap();
            let held = session.held_piece().unwrap();
            assert_eq!(held.kind(), PieceKind::T);
            assert_eq!(held.position(), held.spawn_position());
            assert_eq!(session.current_piece().unwrap().kind(), next.kind());
            assert!(!session.can_hold());
            assert_eq!(session.hold(), Err(SessionError::HoldAlreadyUsed));
        }

        #[test]
        fn test_hold_swaps_after_lock() {
            let mut session = with_current(PieceKind::T);
            session.hold().unwrap();
            session.hard_drop().unwrap();
            assert!(session.can_hold());
            let current = session.current_piece().unwrap().kind();
            session.hold().unwrap();
            assert_eq!(session.current_piece().unwrap().kind(), PieceKind::T);
            assert_eq!(session.held_piece().unwrap().kind(), current);
            assert!(session.drain_events().contains(&GameEvent::HoldUsed));
        }

        #[test]
        fn test_hold_keeps_rotation() {
            let mut session = with_current(PieceKind::L);
            session.move_piece(0, 2).unwrap();
            session.rotate(RotationDirection::Clockwise).unwrap();
            session.hold().unwrap();
            assert_eq!(session.held_piece().unwrap().rotation().value(), 1);
        }

        #[test]
        fn test_first_hold_into_blocked_spawn_ends_game() {
            let mut session = with_current(PieceKind::O);
            session.move_piece(0, 5).unwrap();
            fill_row_except(&mut session, 0, &[]);
            fill_row_except(&mut session, 1, &[]);
            session.drain_events();

            assert_eq!(session.hold(), Ok(()));
            assert_eq!(session.held_piece().unwrap().kind(), PieceKind::O);
            assert!(session.state().is_game_over());
            let events = session.drain_events();
            assert_eq!(events[0], GameEvent::HoldUsed);
            assert!(events[1].is_game_over());
        }

        #[test]
        fn test_swap_refused_when_held_piece_collides() {
            let mut session = with_current(PieceKind::O);
            session.hold().unwrap();
            session.hard_drop().unwrap();
            session.move_piece(0, 5).unwrap();
            fill_row_except(&mut session, 0, &[]);
            fill_row_except(&mut session, 1, &[]);
            let before = *session.current_piece().unwrap();
            assert_eq!(
                session.hold(),
                Err(SessionError::PieceCollision(PieceCollisionError))
            );
            assert_eq!(*session.current_piece().unwrap(), before);
            assert_eq!(session.held_piece().unwrap().kind(), PieceKind::O);
            assert!(session.can_hold());
            assert!(session.state().is_running());
        }
    }

    mod timing {
        use super::*;

        #[test]
        fn test_tick_drops_after_interval() {
            let mut session = with_current(PieceKind::I);
            let y = session.current_piece().unwrap().position().y();
            assert_eq!(session.tick(Duration::from_millis(999)), None);
            assert_eq!(
                session.tick(Duration::from_millis(1000)),
                Some(DropOutcome::Moved)
            );
            assert_eq!(session.current_piece().unwrap().position().y(), y + 1);
            assert_eq!(session.tick(Duration::from_millis(1500)), None);
            assert_eq!(
                session.tick(Duration::from_millis(2000)),
                Some(DropOutcome::Moved)
            );
        }

        #[test]
        fn test_resume_resets_drop_timer() {
            let mut session = with_current(PieceKind::I);
            session.toggle_pause(Duration::from_millis(500));
            session.toggle_pause(Duration::from_millis(5000));
            assert_eq!(session.tick(Duration::from_millis(5500)), None);
            assert_eq!(
                session.tick(Duration::from_millis(6000)),
                Some(DropOutcome::Moved)
            );
        }

        #[test]
        fn test_tick_locks_resting_piece() {
            let mut session = with_current(PieceKind::O);
            session.move_piece(0, 18).unwrap();
            let outcome = session.tick(Duration::from_secs(1)).unwrap();
            assert!(outcome.is_locked());
        }
    }

    mod game_over {
        use super::*;

        #[test]
        fn test_spawn_into_filled_board_ends_game() {
            let mut session = with_current(PieceKind::O);
            session.move_piece(0, 3).unwrap();
            fill_row_except(&mut session, 0, &[9]);
            fill_row_except(&mut session, 1, &[9]);
            session.drain_events();

            session.hard_drop().unwrap();

            assert!(session.state().is_game_over());
            assert_eq!(session.stats().score(), 0);
            let events = session.drain_events();
            assert_eq!(
                events.last(),
                Some(&GameEvent::GameOver {
                    summary: GameSummary {
                        score: 0,
                        lines: 0,
                        level: 1,
                        high_score: 0,
                    }
                })
            );
            assert_eq!(session.hard_drop(), Err(SessionError::NotRunning));
            assert_eq!(session.tick(Duration::from_secs(100)), None);
        }

        #[test]
        fn test_start_after_game_over_begins_new_game() {
            let mut session = with_current(PieceKind::O);
            session.move_piece(0, 3).unwrap();
            fill_row_except(&mut session, 0, &[9]);
            fill_row_except(&mut session, 1, &[9]);
            session.hard_drop().unwrap();
            assert!(session.state().is_game_over());

            session.start(Duration::from_secs(3));
            assert!(session.state().is_running());
            assert_eq!(occupied(&session), 0);
            assert_eq!(session.stats().completed_pieces(), 0);
        }
    }
}
