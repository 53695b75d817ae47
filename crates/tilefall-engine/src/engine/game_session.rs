use std::{collections::VecDeque, time::Duration};

use crate::{
    BoardError, ConfigError, SpawnBlocked,
    core::{Board, CellKind, Offset, ShapeId, clear_rows, compact_rows, detect_full_rows},
};

use super::{
    Command, GameConfig, GameEvent, GameOverReason, GameStats, PieceSeed, ShapeGenerator,
    active_piece::ActivePiece,
    movement::{self, RotationDirection},
};

/// Coarse game state exposed to collaborators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, derive_more::Display, derive_more::IsVariant)]
pub enum GameProgress {
    /// Configured, first piece not yet spawned.
    Waiting,
    /// A piece is falling and accepts commands.
    Playing,
    /// Rows are being removed; commands are ignored.
    Clearing,
    GameOver,
}

/// Where the timeline resumes next.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Phase {
    Waiting,
    Falling,
    /// Rows were emptied and wait to be compacted.
    ClearPause {
        rows: Vec<usize>,
    },
    /// Rows were compacted; the next piece spawns after this pause.
    CompactPause,
    GameOver,
}

/// One game from configuration to game over.
///
/// The session owns the board and the only timeline. It never sleeps: the
/// caller reports elapsed time with [`GameSession::advance`] (or forces the
/// next step with [`GameSession::resume`]) and the session performs one step
/// per fully elapsed interval. Gravity ticks wait
/// [`GameConfig::drop_interval`]; the two pauses of a line clear wait
/// [`GameConfig::delete_interval`].
///
/// Commands are applied synchronously and are silently ignored unless a piece
/// is falling. Everything that happened is queued as [`GameEvent`]s.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use tilefall_engine::{GameConfig, GameProgress, GameSession};
///
/// let mut session = GameSession::configure(GameConfig::DEFAULT).unwrap();
/// assert_eq!(session.progress(), GameProgress::Waiting);
///
/// let next = session.next_shape();
/// assert!(session.start_session());
/// assert_eq!(session.active_piece().unwrap().shape(), next);
///
/// session.move_left();
/// let steps = session.advance(Duration::from_millis(400)).unwrap();
/// assert_eq!(steps, 1);
///
/// let events: Vec<_> = session.drain_events().collect();
/// assert!(events[0].is_piece_spawned());
/// ```
#[derive(Debug, Clone)]
pub struct GameSession {
    config: GameConfig,
    board: Board,
    active: Option<ActivePiece>,
    generator: ShapeGenerator,
    stats: GameStats,
    phase: Phase,
    waited: Duration,
    events: VecDeque<GameEvent>,
}

impl GameSession {
    /// Creates a session in the `Waiting` state with a randomly seeded lookahead.
    pub fn configure(config: GameConfig) -> Result<Self, ConfigError> {
        Self::with_generator(config, ShapeGenerator::new())
    }

    /// Like [`Self::configure`], but the shape sequence is reproducible.
    pub fn with_seed(config: GameConfig, seed: PieceSeed) -> Result<Self, ConfigError> {
        Self::with_generator(config, ShapeGenerator::with_seed(seed))
    }

    fn with_generator(config: GameConfig, generator: ShapeGenerator) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(config.width, config.height).map_err(ConfigError::Board)?;
        Ok(Self {
            config,
            board,
            active: None,
            generator,
            stats: GameStats::new(),
            phase: Phase::Waiting,
            waited: Duration::ZERO,
            events: VecDeque::new(),
        })
    }

    /// Spawns the first piece. Returns `false` unless the session is `Waiting`.
    pub fn start_session(&mut self) -> bool {
        if self.phase != Phase::Waiting {
            return false;
        }
        self.waited = Duration::ZERO;
        self.spawn_next();
        true
    }

    /// Returns the setup this session was configured with.
    #[must_use]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Returns the live grid, falling cells included.
    #[must_use]
    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Owned copy of the grid, detached from later mutations.
    #[must_use]
    pub fn snapshot(&self) -> Board {
        self.board.clone()
    }

    /// Returns the coarse state of the session.
    #[must_use]
    pub fn progress(&self) -> GameProgress {
        match self.phase {
            Phase::Waiting => GameProgress::Waiting,
            Phase::Falling => GameProgress::Playing,
            Phase::ClearPause { .. } | Phase::CompactPause => GameProgress::Clearing,
            Phase::GameOver => GameProgress::GameOver,
        }
    }

    /// Returns the falling piece, if one exists.
    #[must_use]
    pub fn active_piece(&self) -> Option<&ActivePiece> {
        self.active.as_ref()
    }

    /// The lookahead: the shape the next spawn will use.
    #[must_use]
    pub fn next_shape(&self) -> ShapeId {
        self.generator.peek()
    }

    /// Unrotated layout of [`Self::next_shape`] for a preview panel.
    #[must_use]
    pub fn next_shape_preview(&self) -> &'static [Offset] {
        self.next_shape().offsets()
    }

    /// Returns the score and counters of this session.
    #[must_use]
    pub fn stats(&self) -> &GameStats {
        &self.stats
    }

    /// Takes every queued event, oldest first.
    pub fn drain_events(&mut self) -> impl Iterator<Item = GameEvent> + '_ {
        self.events.drain(..)
    }

    /// Interval the timeline is currently waiting for, or `None` when no
    /// step is pending (before the start and after game over).
    #[must_use]
    pub fn pending_interval(&self) -> Option<Duration> {
        match self.phase {
            Phase::Falling => Some(self.config.drop_interval),
            Phase::ClearPause { .. } | Phase::CompactPause => Some(self.config.delete_interval()),
            Phase::Waiting | Phase::GameOver => None,
        }
    }

    /// Reports `elapsed` time and performs one step for each pending interval
    /// that has fully elapsed. Time left over counts toward the next step.
    ///
    /// Returns the number of steps performed.
    pub fn advance(&mut self, elapsed: Duration) -> Result<usize, BoardError> {
        let Some(mut interval) = self.pending_interval() else {
            self.waited = Duration::ZERO;
            return Ok(0);
        };
        self.waited = self.waited.saturating_add(elapsed);
        let mut steps = 0;
        while self.waited >= interval {
            self.waited -= interval;
            self.step()?;
            steps += 1;
            let Some(next) = self.pending_interval() else {
                self.waited = Duration::ZERO;
                break;
            };
            interval = next;
        }
        Ok(steps)
    }

    /// Performs the pending step now, discarding any partially elapsed time.
    ///
    /// Returns `false` when no step is pending.
    pub fn resume(&mut self) -> Result<bool, BoardError> {
        if self.pending_interval().is_none() {
            return Ok(false);
        }
        self.waited = Duration::ZERO;
        self.step()?;
        Ok(true)
    }

    /// Moves the piece one column left. Returns whether it moved.
    pub fn move_left(&mut self) -> bool {
        self.translate_active(Offset::LEFT)
    }

    /// Moves the piece one column right. Returns whether it moved.
    pub fn move_right(&mut self) -> bool {
        self.translate_active(Offset::RIGHT)
    }

    /// Moves the piece one row down. A piece that cannot fall stays put; it
    /// locks on the next gravity tick.
    pub fn soft_drop_step(&mut self) -> bool {
        self.translate_active(Offset::DOWN)
    }

    /// Rotates the piece clockwise around its center. Returns whether it turned.
    pub fn rotate_cw(&mut self) -> bool {
        self.rotate_active(RotationDirection::Clockwise)
    }

    /// Rotates the piece counterclockwise around its center. Returns whether it turned.
    pub fn rotate_ccw(&mut self) -> bool {
        self.rotate_active(RotationDirection::CounterClockwise)
    }

    /// Dispatches `command` to the matching method above.
    pub fn apply(&mut self, command: Command) -> bool {
        match command {
            Command::MoveLeft => self.move_left(),
            Command::MoveRight => self.move_right(),
            Command::SoftDrop => self.soft_drop_step(),
            Command::RotateCw => self.rotate_cw(),
            Command::RotateCcw => self.rotate_ccw(),
        }
    }

    /// Ends the session. The falling piece, if any, is removed from the grid.
    ///
    /// Returns `false` if the session was already over.
    pub fn quit(&mut self) -> bool {
        if self.phase == Phase::GameOver {
            return false;
        }
        self.board.clear_falling();
        self.finish(GameOverReason::Quit);
        true
    }

    fn translate_active(&mut self, offset: Offset) -> bool {
        if self.phase != Phase::Falling {
            return false;
        }
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        movement::try_translate(piece, &mut self.board, offset)
    }

    fn rotate_active(&mut self, direction: RotationDirection) -> bool {
        if self.phase != Phase::Falling {
            return false;
        }
        let Some(piece) = self.active.as_mut() else {
            return false;
        };
        movement::rotate(piece, &mut self.board, direction)
    }

    fn step(&mut self) -> Result<(), BoardError> {
        match self.phase {
            Phase::Waiting | Phase::GameOver => {}
            Phase::Falling => self.gravity_tick()?,
            Phase::ClearPause { ref mut rows } => {
                let rows = std::mem::take(rows);
                compact_rows(&mut self.board, &rows);
                self.events.push_back(GameEvent::RowsCompacted { rows });
                self.phase = Phase::CompactPause;
            }
            Phase::CompactPause => self.spawn_next(),
        }
        Ok(())
    }

    fn gravity_tick(&mut self) -> Result<(), BoardError> {
        let Some(piece) = self.active.as_mut() else {
            return Ok(());
        };
        if movement::can_translate(piece, &self.board, Offset::DOWN) {
            return movement::translate(piece, &mut self.board, Offset::DOWN);
        }
        self.lock_piece()
    }

    fn lock_piece(&mut self) -> Result<(), BoardError> {
        let Some(piece) = self.active else {
            return Ok(());
        };
        self.board.replace_cells(
            &[],
            &piece.occupied_cells(),
            CellKind::Settled,
            piece.color(),
        )?;
        self.active = None;
        self.events.push_back(GameEvent::PieceLocked {
            shape: piece.shape(),
        });

        let rows = detect_full_rows(&self.board);
        let amount = self.stats.record_lock(rows.len());
        if rows.is_empty() {
            self.spawn_next();
            return Ok(());
        }

        clear_rows(&mut self.board, &rows);
        self.events.push_back(GameEvent::LinesCleared { rows: rows.clone() });
        self.events.push_back(GameEvent::ScoreDelta {
            lines: rows.len(),
            amount,
        });
        self.phase = Phase::ClearPause { rows };
        Ok(())
    }

    fn spawn_next(&mut self) {
        let shape = self.generator.pop_next();
        match ActivePiece::spawn(shape, &mut self.board) {
            Ok(piece) => {
                self.active = Some(piece);
                self.phase = Phase::Falling;
                self.events.push_back(GameEvent::PieceSpawned {
                    shape,
                    next: self.generator.peek(),
                });
            }
            Err(SpawnBlocked) => self.finish(GameOverReason::TopOut),
        }
    }

    fn finish(&mut self, reason: GameOverReason) {
        self.active = None;
        self.phase = Phase::GameOver;
        self.waited = Duration::ZERO;
        self.events.push_back(GameEvent::GameOver { reason });
    }
}

#[cfg(test)]
mod tests {
    use crate::core::{Cell, Position};

    use super::*;

    const SEED: PieceSeed = PieceSeed::from_bytes([7; 16]);

    fn small_config() -> GameConfig {
        GameConfig {
            width: 7,
            height: 8,
            ..GameConfig::DEFAULT
        }
    }

    fn started(config: GameConfig) -> GameSession {
        let mut session = GameSession::with_seed(config, SEED).unwrap();
        assert!(session.start_session());
        session.drain_events().for_each(drop);
        session
    }

    /// Swaps the falling piece for `id` at the spawn position.
    fn replace_active(session: &mut GameSession, id: u8) {
        session.board.clear_falling();
        let piece = ActivePiece::spawn(ShapeId::new(id).unwrap(), &mut session.board).unwrap();
        session.active = Some(piece);
    }

    fn settle(session: &mut GameSession, cells: &[(i32, i32)]) {
        for &(x, y) in cells {
            session.board.set_cell(x, y, CellKind::Settled, 1).unwrap();
        }
    }

    fn tick(session: &mut GameSession) {
        assert!(session.resume().unwrap(), "no step pending");
    }

    #[test]
    fn test_configure_rejects_bad_setup() {
        let err = GameSession::configure(GameConfig {
            height: 2,
            ..GameConfig::DEFAULT
        })
        .unwrap_err();
        assert_eq!(
            err,
            ConfigError::Board(BoardError::InvalidDimensions {
                width: 12,
                height: 2
            })
        );

        let err = GameSession::configure(GameConfig {
            drop_interval: Duration::ZERO,
            ..GameConfig::DEFAULT
        })
        .unwrap_err();
        assert_eq!(err, ConfigError::InvalidDropInterval);
    }

    #[test]
    fn test_waiting_session_is_inert() {
        let mut session = GameSession::with_seed(GameConfig::DEFAULT, SEED).unwrap();
        let empty = Board::new(12, 22).unwrap();

        assert_eq!(session.progress(), GameProgress::Waiting);
        assert_eq!(session.pending_interval(), None);
        assert_eq!(session.advance(Duration::from_secs(5)).unwrap(), 0);
        assert!(!session.resume().unwrap());
        for command in Command::ALL {
            assert!(!session.apply(command), "{command:?} accepted while waiting");
        }
        assert!(session.active_piece().is_none());
        assert_eq!(session.board(), &empty);
        assert_eq!(session.drain_events().count(), 0);
    }

    #[test]
    fn test_start_spawns_lookahead() {
        let mut session = GameSession::with_seed(GameConfig::DEFAULT, SEED).unwrap();
        let first = session.next_shape();
        assert!(session.start_session());
        assert!(!session.start_session());

        let piece = session.active_piece().copied().unwrap();
        assert_eq!(piece.shape(), first);
        assert_eq!(piece.center(), Position::new(6, 19));
        assert_eq!(session.progress(), GameProgress::Playing);
        assert_eq!(
            session.pending_interval(),
            Some(GameConfig::DEFAULT.drop_interval)
        );
        assert_eq!(session.next_shape_preview(), session.next_shape().offsets());

        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(
            events,
            [GameEvent::PieceSpawned {
                shape: first,
                next: session.next_shape(),
            }]
        );
        assert_eq!(session.board().count(CellKind::Falling), piece.occupied_cells().len());
    }

    #[test]
    fn test_same_seed_same_game() {
        let mut a = started(GameConfig::DEFAULT);
        let mut b = started(GameConfig::DEFAULT);
        for _ in 0..200 {
            a.advance(Duration::from_millis(250)).unwrap();
            b.advance(Duration::from_millis(250)).unwrap();
        }
        assert_eq!(a.board(), b.board());
        assert_eq!(a.stats(), b.stats());
        assert_eq!(
            a.drain_events().collect::<Vec<_>>(),
            b.drain_events().collect::<Vec<_>>()
        );
    }

    #[test]
    fn test_gravity_follows_drop_interval() {
        let mut session = started(GameConfig::DEFAULT);
        let y = |session: &GameSession| session.active_piece().unwrap().center().y();

        assert_eq!(session.advance(Duration::from_millis(399)).unwrap(), 0);
        assert_eq!(y(&session), 19);
        assert_eq!(session.advance(Duration::from_millis(1)).unwrap(), 1);
        assert_eq!(y(&session), 18);

        // 1000ms covers two ticks and leaves 200ms toward the third.
        assert_eq!(session.advance(Duration::from_millis(1000)).unwrap(), 2);
        assert_eq!(y(&session), 16);
        assert_eq!(session.advance(Duration::from_millis(200)).unwrap(), 1);
        assert_eq!(y(&session), 15);
    }

    #[test]
    fn test_advance_saturates() {
        let mut session = started(GameConfig::DEFAULT);
        assert_eq!(session.advance(Duration::from_millis(100)).unwrap(), 0);

        // Without commands the pieces pile up in the middle until one cannot spawn.
        let steps = session.advance(Duration::MAX).unwrap();
        assert!(steps > 0);
        assert_eq!(session.progress(), GameProgress::GameOver);
        assert_eq!(session.pending_interval(), None);
        assert_eq!(session.advance(Duration::MAX).unwrap(), 0);
    }

    #[test]
    fn test_leftover_time_carries_into_clear_pause() {
        let mut session = started(small_config());
        replace_active(&mut session, 0);
        settle(&mut session, &[(1, 1), (2, 1), (4, 1), (5, 1)]);

        // Four falls and the lock take 2000ms; 100ms is left toward the 500ms pause.
        assert_eq!(session.advance(Duration::from_millis(2100)).unwrap(), 5);
        assert_eq!(session.progress(), GameProgress::Clearing);
        assert_eq!(session.stats().total_cleared_lines(), 1);

        assert_eq!(session.advance(Duration::from_millis(399)).unwrap(), 0);
        assert_eq!(session.advance(Duration::from_millis(1)).unwrap(), 1);
        assert!(
            session
                .drain_events()
                .any(|event| event.is_rows_compacted())
        );

        assert_eq!(session.advance(Duration::from_millis(499)).unwrap(), 0);
        assert_eq!(session.advance(Duration::from_millis(1)).unwrap(), 1);
        assert_eq!(session.progress(), GameProgress::Playing);
    }

    #[test]
    fn test_resume_discards_partial_wait() {
        let mut session = started(GameConfig::DEFAULT);
        session.advance(Duration::from_millis(300)).unwrap();
        tick(&mut session);
        assert_eq!(session.active_piece().unwrap().center().y(), 18);
        assert_eq!(session.advance(Duration::from_millis(300)).unwrap(), 0);
        assert_eq!(session.active_piece().unwrap().center().y(), 18);
    }

    #[test]
    fn test_commands_while_playing() {
        let mut session = started(GameConfig::DEFAULT);
        replace_active(&mut session, 6);

        assert!(session.move_left());
        assert!(session.apply(Command::MoveRight));
        assert!(session.move_right());
        assert_eq!(session.active_piece().unwrap().center(), Position::new(7, 19));

        assert!(session.soft_drop_step());
        assert_eq!(session.active_piece().unwrap().center(), Position::new(7, 18));

        assert!(session.rotate_ccw());
        assert_eq!(session.active_piece().unwrap().rotation().index(), 1);
        assert!(session.apply(Command::RotateCw));
        assert!(session.rotate_cw());
        assert_eq!(session.active_piece().unwrap().rotation().index(), 3);

        let piece = *session.active_piece().unwrap();
        for pos in piece.occupied_cells() {
            assert_eq!(session.board().get(pos), Some(Cell::new(CellKind::Falling, 6)));
        }
        assert_eq!(session.board().count(CellKind::Falling), 4);
    }

    #[test]
    fn test_lock_without_clear_spawns_immediately() {
        let mut session = started(GameConfig::DEFAULT);
        replace_active(&mut session, 0);

        // From row 19 down to row 1 takes 18 ticks; the next one locks.
        for _ in 0..18 {
            tick(&mut session);
        }
        assert_eq!(session.active_piece().unwrap().center(), Position::new(6, 1));
        assert!(!session.soft_drop_step());
        assert_eq!(session.drain_events().count(), 0);

        tick(&mut session);
        assert_eq!(
            session.board().get(Position::new(6, 1)),
            Some(Cell::new(CellKind::Settled, 0))
        );
        assert_eq!(session.progress(), GameProgress::Playing);
        assert_eq!(session.stats().completed_pieces(), 1);
        assert_eq!(session.stats().score(), 0);

        let events: Vec<_> = session.drain_events().collect();
        assert_eq!(events.len(), 2);
        assert_eq!(
            events[0],
            GameEvent::PieceLocked {
                shape: ShapeId::PROBE
            }
        );
        assert!(events[1].is_piece_spawned());
    }

    #[test]
    fn test_clear_sequence() {
        let mut session = started(small_config());
        replace_active(&mut session, 0);
        // Row 1 misses only the column the probe falls down; (1, 2) rests above.
        settle(&mut session, &[(1, 1), (2, 1), (4, 1), (5, 1), (1, 2)]);

        for _ in 0..4 {
            tick(&mut session);
        }
        assert_eq!(session.active_piece().unwrap().center(), Position::new(3, 1));
        tick(&mut session);

        let delete_interval = small_config().delete_interval();
        assert_eq!(session.progress(), GameProgress::Clearing);
        assert!(session.active_piece().is_none());
        assert_eq!(session.pending_interval(), Some(delete_interval));
        assert_eq!(
            session.drain_events().collect::<Vec<_>>(),
            [
                GameEvent::PieceLocked {
                    shape: ShapeId::PROBE
                },
                GameEvent::LinesCleared { rows: vec![1] },
                GameEvent::ScoreDelta {
                    lines: 1,
                    amount: 10
                },
            ]
        );
        assert_eq!(
            session.board().to_string(),
            "WWWWWWW\n\
             W.....W\n\
             W.....W\n\
             W.....W\n\
             W.....W\n\
             W1....W\n\
             W.....W\n\
             WWWWWWW\n"
        );

        // Input is ignored for the whole clear.
        for command in Command::ALL {
            assert!(!session.apply(command));
        }

        assert_eq!(session.advance(delete_interval - Duration::from_millis(1)).unwrap(), 0);
        assert_eq!(session.advance(Duration::from_millis(1)).unwrap(), 1);
        assert_eq!(session.progress(), GameProgress::Clearing);
        assert_eq!(
            session.drain_events().collect::<Vec<_>>(),
            [GameEvent::RowsCompacted { rows: vec![1] }]
        );
        assert_eq!(session.board().count(CellKind::Settled), 1);
        assert_eq!(
            session.board().get(Position::new(1, 1)),
            Some(Cell::new(CellKind::Settled, 1))
        );
        assert!(!session.move_left());

        assert_eq!(session.advance(delete_interval).unwrap(), 1);
        assert_eq!(session.progress(), GameProgress::Playing);
        assert!(session.drain_events().next().unwrap().is_piece_spawned());
        assert_eq!(session.stats().score(), 10);
        assert_eq!(session.stats().line_cleared_counter(), &[0, 1, 0, 0, 0]);
    }

    #[test]
    fn test_four_row_clear_scores_100() {
        let mut session = started(GameConfig {
            height: 10,
            ..small_config()
        });
        replace_active(&mut session, 7);
        // Rows 1-4 are full except column 3.
        for y in 1..=4 {
            settle(&mut session, &[(1, y), (2, y), (4, y), (5, y)]);
        }

        // Upright at spawn height the bar would reach the ceiling.
        assert!(!session.rotate_ccw());
        assert!(session.soft_drop_step());
        assert!(session.rotate_ccw());
        for _ in 0..4 {
            tick(&mut session);
        }
        assert_eq!(session.active_piece().unwrap().center(), Position::new(3, 2));
        tick(&mut session);

        let events: Vec<_> = session.drain_events().collect();
        assert!(events.contains(&GameEvent::LinesCleared {
            rows: vec![1, 2, 3, 4]
        }));
        assert!(events.contains(&GameEvent::ScoreDelta {
            lines: 4,
            amount: 100
        }));
        assert_eq!(session.stats().score(), 100);
        assert_eq!(session.stats().line_cleared_counter()[4], 1);

        tick(&mut session);
        tick(&mut session);
        assert_eq!(session.progress(), GameProgress::Playing);
        assert_eq!(session.board().count(CellKind::Settled), 0);
    }

    #[test]
    fn test_blocked_start_is_game_over() {
        let mut session = GameSession::with_seed(GameConfig::DEFAULT, SEED).unwrap();
        settle(&mut session, &[(6, 19)]);
        let before = session.snapshot();

        assert!(session.start_session());
        assert_eq!(session.progress(), GameProgress::GameOver);
        assert_eq!(
            session.drain_events().collect::<Vec<_>>(),
            [GameEvent::GameOver {
                reason: GameOverReason::TopOut
            }]
        );
        assert_eq!(session.board(), &before);
    }

    #[test]
    fn test_top_out_after_lock_stops_everything() {
        let mut session = started(small_config());
        replace_active(&mut session, 0);
        // Blocks the probe right at the spawn center.
        settle(&mut session, &[(3, 4)]);

        tick(&mut session);
        assert_eq!(session.progress(), GameProgress::GameOver);
        assert_eq!(
            session.drain_events().collect::<Vec<_>>(),
            [
                GameEvent::PieceLocked {
                    shape: ShapeId::PROBE
                },
                GameEvent::GameOver {
                    reason: GameOverReason::TopOut
                },
            ]
        );
        assert_eq!(session.stats().completed_pieces(), 1);
        assert_eq!(session.board().count(CellKind::Falling), 0);

        let after = session.snapshot();
        assert_eq!(session.pending_interval(), None);
        assert_eq!(session.advance(Duration::from_secs(60)).unwrap(), 0);
        assert!(!session.resume().unwrap());
        for command in Command::ALL {
            assert!(!session.apply(command));
        }
        assert!(!session.quit());
        assert_eq!(session.board(), &after);
        assert_eq!(session.drain_events().count(), 0);
    }

    #[test]
    fn test_quit_removes_falling_piece() {
        let mut session = started(GameConfig::DEFAULT);
        assert!(session.quit());
        assert_eq!(session.progress(), GameProgress::GameOver);
        assert!(session.active_piece().is_none());
        assert_eq!(session.board().count(CellKind::Falling), 0);
        assert_eq!(
            session.drain_events().collect::<Vec<_>>(),
            [GameEvent::GameOver {
                reason: GameOverReason::Quit
            }]
        );
        assert!(!session.quit());
        assert!(!session.start_session());
    }

    #[test]
    fn test_snapshot_is_detached() {
        let mut session = started(GameConfig::DEFAULT);
        let snapshot = session.snapshot();
        tick(&mut session);
        assert_ne!(&snapshot, session.board());
        assert_eq!(
            snapshot.count(CellKind::Falling),
            session.board().count(CellKind::Falling)
        );
    }

    #[test]
    fn test_falling_cells_track_piece_through_a_game() {
        let mut session = started(GameConfig::DEFAULT);
        let mut turn = 0;
        while !session.progress().is_game_over() && turn < 2000 {
            session.apply(Command::ALL[turn % Command::ALL.len()]);
            session.advance(Duration::from_millis(200)).unwrap();
            match session.active_piece() {
                Some(piece) => {
                    assert_eq!(
                        session.board().count(CellKind::Falling),
                        piece.occupied_cells().len()
                    );
                    for pos in piece.occupied_cells() {
                        assert!(session.board().get(pos).unwrap().kind().is_falling());
                    }
                }
                None => assert_eq!(session.board().count(CellKind::Falling), 0),
            }
            turn += 1;
        }
    }
}
