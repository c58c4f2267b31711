//! Falling-block game state machine
//!
//! Phases: Running, Paused, QuizGated, GameOver (see [`GamePhase`]).
//! Gravity ticks and player intents only act while Running.

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::board::{Board, Row, calculate_score};
use super::piece::{Piece, Position, TetrominoKind};
use crate::consts::BOARD_WIDTH;
use crate::driver::Simulation;
use crate::error::QuizError;
use crate::events::{EventQueue, GameEvent};
use crate::quiz::{GamePhase, InterruptionController, SubmitOutcome};
use crate::settings::{BlockSettings, Settings};

/// Horizontal offsets tried, in order, when a rotation does not fit in place
pub const WALL_KICKS: [i32; 4] = [-1, 1, -2, 2];

/// Where new pieces appear: top row, horizontally centered
pub const SPAWN_POSITION: Position = Position {
    row: 0,
    col: BOARD_WIDTH as i32 / 2 - 1,
};

/// Render-ready view of the block game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockSnapshot {
    pub cells: Vec<Row>,
    /// Absolute `(row, col)` cells of the falling piece
    pub piece: Vec<(i32, i32)>,
    pub piece_color: u32,
    /// Landing preview; empty when the piece already rests on something
    pub ghost: Vec<(i32, i32)>,
    pub next: TetrominoKind,
    pub score: u64,
    pub level: u32,
    pub rows_cleared: u32,
    pub attempts_remaining: u8,
    pub phase: GamePhase,
    pub question: Option<String>,
}

#[derive(Debug, Clone)]
pub struct BlockGame {
    settings: BlockSettings,
    rng: Pcg32,
    board: Board,
    current: Piece,
    position: Position,
    next: Piece,
    score: u64,
    rows_cleared: u32,
    rows_since_last_question: u32,
    level: u32,
    game_over: bool,
    time_ticks: u64,
    interruption: InterruptionController,
    events: EventQueue,
}

impl BlockGame {
    pub fn new(seed: u64, settings: &Settings) -> Self {
        if let Err(e) = settings.validate() {
            log::warn!("Block game running with unvalidated settings: {}", e);
        }
        let mut rng = Pcg32::seed_from_u64(seed);
        let current = random_piece(&mut rng);
        let next = random_piece(&mut rng);
        Self {
            settings: settings.blocks.clone(),
            rng,
            board: Board::new(),
            current,
            position: SPAWN_POSITION,
            next,
            score: 0,
            rows_cleared: 0,
            rows_since_last_question: 0,
            level: 1,
            game_over: false,
            time_ticks: 0,
            interruption: InterruptionController::new(settings.quiz.max_attempts),
            events: EventQueue::new(),
        }
    }

    // === Read-only state ===

    pub fn board(&self) -> &Board {
        &self.board
    }

    pub fn current_piece(&self) -> &Piece {
        &self.current
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn next_piece(&self) -> &Piece {
        &self.next
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn rows_cleared(&self) -> u32 {
        self.rows_cleared
    }

    pub fn rows_since_last_question(&self) -> u32 {
        self.rows_since_last_question
    }

    pub fn time_ticks(&self) -> u64 {
        self.time_ticks
    }

    pub fn interruption(&self) -> &InterruptionController {
        &self.interruption
    }

    pub fn phase(&self) -> GamePhase {
        self.interruption.phase(self.game_over)
    }

    /// Row the current piece would land on if hard-dropped
    pub fn ghost_row(&self) -> i32 {
        self.board.drop_row(&self.current, self.position)
    }

    /// Take events produced since the last call (at most
    /// [`MAX_PENDING_EVENTS`](crate::events::MAX_PENDING_EVENTS), newest kept)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    pub fn snapshot(&self) -> BlockSnapshot {
        let ghost_row = self.ghost_row();
        let ghost = if ghost_row != self.position.row && !self.game_over {
            self.current
                .cells_at(Position::new(ghost_row, self.position.col))
                .collect()
        } else {
            Vec::new()
        };
        BlockSnapshot {
            cells: self.board.rows().to_vec(),
            piece: if self.game_over {
                Vec::new()
            } else {
                self.current.cells_at(self.position).collect()
            },
            piece_color: self.current.color,
            ghost,
            next: self.next.kind,
            score: self.score,
            level: self.level,
            rows_cleared: self.rows_cleared,
            attempts_remaining: self.interruption.attempts_remaining(),
            phase: self.phase(),
            question: self.interruption.question_text(),
        }
    }

    // === Player intents ===

    fn accepts_input(&self) -> bool {
        self.phase() == GamePhase::Running
    }

    fn try_shift(&mut self, d_col: i32) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let candidate = self.position.offset(0, d_col);
        if self.board.can_place(&self.current, candidate) {
            self.position = candidate;
            true
        } else {
            false
        }
    }

    pub fn move_left(&mut self) -> bool {
        self.try_shift(-1)
    }

    pub fn move_right(&mut self) -> bool {
        self.try_shift(1)
    }

    /// Soft drop one row; locks the piece when it cannot move.
    /// Returns true if the piece moved.
    pub fn move_down(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        self.step_down()
    }

    /// Drop to the landing row and lock. Returns rows travelled.
    pub fn hard_drop(&mut self) -> u32 {
        if !self.accepts_input() {
            return 0;
        }
        let landing = self.ghost_row();
        let distance = (landing - self.position.row).max(0) as u32;
        self.position.row = landing;
        self.lock_piece();
        distance
    }

    /// Rotate clockwise with horizontal wall kicks. Returns true if applied.
    pub fn rotate(&mut self) -> bool {
        if !self.accepts_input() {
            return false;
        }
        let rotated = self.current.rotated();
        if self.board.can_place(&rotated, self.position) {
            self.current = rotated;
            return true;
        }
        for kick in WALL_KICKS {
            let candidate = self.position.offset(0, kick);
            if self.board.can_place(&rotated, candidate) {
                self.current = rotated;
                self.position = candidate;
                return true;
            }
        }
        false
    }

    /// Returns the new paused flag. No effect during a quiz or after game over.
    pub fn toggle_pause(&mut self) -> bool {
        if !self.game_over {
            self.interruption.toggle_pause();
        }
        self.interruption.is_suspended()
    }

    /// Answer the open quiz; exhausting attempts restarts the game
    pub fn submit_answer(
        &mut self,
        numerator: i64,
        denominator: i64,
    ) -> Result<SubmitOutcome, QuizError> {
        let outcome = self.interruption.submit(numerator, denominator)?;
        self.after_submit(outcome);
        Ok(outcome)
    }

    pub fn submit_answer_text(
        &mut self,
        numerator: &str,
        denominator: &str,
    ) -> Result<SubmitOutcome, QuizError> {
        let outcome = self.interruption.submit_text(numerator, denominator)?;
        self.after_submit(outcome);
        Ok(outcome)
    }

    fn after_submit(&mut self, outcome: SubmitOutcome) {
        self.events.push(GameEvent::QuizAnswered {
            correct: outcome.accepted,
        });
        if outcome.game_over {
            self.restart();
        }
    }

    // === Lifecycle ===

    /// Fresh board, score and interruption state; the RNG stream continues
    pub fn restart(&mut self) {
        self.board = Board::new();
        self.current = random_piece(&mut self.rng);
        self.next = random_piece(&mut self.rng);
        self.position = SPAWN_POSITION;
        self.score = 0;
        self.rows_cleared = 0;
        self.rows_since_last_question = 0;
        self.level = 1;
        self.game_over = false;
        self.time_ticks = 0;
        self.interruption.reset();
        self.events.push(GameEvent::Restarted);
        log::info!("Block game restarted");
    }

    /// Restart on a new RNG stream
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Pcg32::seed_from_u64(seed);
        self.restart();
    }

    // === Simulation ===

    fn step_down(&mut self) -> bool {
        let candidate = self.position.offset(1, 0);
        if self.board.can_place(&self.current, candidate) {
            self.position = candidate;
            true
        } else {
            self.lock_piece();
            false
        }
    }

    fn lock_piece(&mut self) {
        self.board.stamp(&self.current, self.position);
        self.events.push(GameEvent::PieceLocked);

        let cleared = self.board.clear_rows();
        if cleared > 0 {
            self.rows_cleared += cleared;
            self.rows_since_last_question += cleared;
            self.events.push(GameEvent::RowsCleared(cleared));
        }
        self.score += calculate_score(cleared, self.level);

        let level = 1 + self.rows_cleared / self.settings.rows_per_level.max(1);
        if level != self.level {
            log::info!("Block game level {} -> {}", self.level, level);
            self.events.push(GameEvent::LevelUp(level));
        }
        self.level = level;
        log::debug!(
            "Locked {:?}: cleared={} score={} level={}",
            self.current.kind,
            cleared,
            self.score,
            self.level
        );

        if self.rows_since_last_question >= self.settings.rows_per_quiz.max(1) {
            self.rows_since_last_question = 0;
            self.interruption.trigger(self.level, &mut self.rng);
            self.events.push(GameEvent::QuizTriggered);
        }

        self.spawn_piece();
    }

    fn spawn_piece(&mut self) {
        let fresh = random_piece(&mut self.rng);
        self.current = std::mem::replace(&mut self.next, fresh);
        self.position = SPAWN_POSITION;

        if !self.board.can_place(&self.current, self.position) {
            self.game_over = true;
            self.interruption.dismiss();
            self.events.push(GameEvent::GameOver);
            log::info!("Block game over: score={} rows={}", self.score, self.rows_cleared);
        }
    }
}

impl Simulation for BlockGame {
    fn start(&mut self) {
        self.restart();
    }

    fn tick(&mut self) -> bool {
        if self.phase() != GamePhase::Running {
            return false;
        }
        self.time_ticks += 1;
        self.step_down();
        true
    }

    fn tick_delay_ms(&self) -> u64 {
        self.settings.tick_delay_ms(self.level)
    }

    fn phase(&self) -> GamePhase {
        BlockGame::phase(self)
    }
}

fn random_piece(rng: &mut Pcg32) -> Piece {
    Piece::new(TetrominoKind::ALL[rng.random_range(0..TetrominoKind::ALL.len())])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blocks::board::Cell;
    use crate::consts::BOARD_HEIGHT;

    fn game() -> BlockGame {
        BlockGame::new(12345, &Settings::default())
    }

    fn with_piece(game: &mut BlockGame, kind: TetrominoKind, pos: Position) {
        game.current = Piece::new(kind);
        game.position = pos;
    }

    /// Fill a bottom row except the given columns
    fn fill_row_except(game: &mut BlockGame, row: usize, gaps: &[usize]) {
        for col in 0..BOARD_WIDTH {
            if !gaps.contains(&col) {
                game.board.set(row, col, Cell::filled(0x808080));
            }
        }
    }

    fn answer(game: &BlockGame) -> (i64, i64) {
        let s = game
            .interruption()
            .question()
            .map(|q| q.correct_answer.simplify())
            .unwrap();
        (s.numerator(), s.denominator())
    }

    #[test]
    fn test_new_game() {
        let game = game();
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.position(), Position::new(0, 4));
        assert_eq!(game.level(), 1);
        assert_eq!(game.score(), 0);
        assert_eq!(game.interruption().attempts_remaining(), 3);
    }

    #[test]
    fn test_tick_moves_piece_down() {
        let mut game = game();
        assert!(game.tick());
        assert_eq!(game.position().row, 1);
        assert_eq!(game.time_ticks(), 1);
    }

    #[test]
    fn test_tick_delay_tracks_level() {
        let mut game = game();
        assert_eq!(game.tick_delay_ms(), 800);
        game.level = 5;
        assert_eq!(game.tick_delay_ms(), 600);
        game.level = 20;
        assert_eq!(game.tick_delay_ms(), 200);
    }

    #[test]
    fn test_moves_blocked_by_walls() {
        let mut game = game();
        with_piece(&mut game, TetrominoKind::O, Position::new(0, 0));
        assert!(!game.move_left());
        assert_eq!(game.position(), Position::new(0, 0));
        assert!(game.move_right());
        assert_eq!(game.position(), Position::new(0, 1));
    }

    #[test]
    fn test_hard_drop_locks_on_floor() {
        let mut game = game();
        with_piece(&mut game, TetrominoKind::O, Position::new(0, 4));
        let distance = game.hard_drop();
        assert_eq!(distance, 18);
        assert!(game.board().cell(19, 4).is_some_and(|c| c.filled));
        assert!(game.board().cell(18, 5).is_some_and(|c| c.filled));
        assert_eq!(game.position(), SPAWN_POSITION);
        assert!(game.drain_events().contains(&GameEvent::PieceLocked));
    }

    #[test]
    fn test_move_down_locks_when_blocked() {
        let mut game = game();
        with_piece(&mut game, TetrominoKind::O, Position::new(18, 0));
        assert!(!game.move_down());
        assert!(game.board().cell(19, 0).is_some_and(|c| c.filled));
    }

    #[test]
    fn test_single_row_clear_scores() {
        let mut game = game();
        fill_row_except(&mut game, 19, &[4, 5, 6, 7]);
        with_piece(&mut game, TetrominoKind::I, Position::new(0, 4));
        game.hard_drop();

        assert_eq!(game.rows_cleared(), 1);
        assert_eq!(game.score(), 100);
        assert_eq!(game.rows_since_last_question(), 1);
        assert_eq!(game.phase(), GamePhase::Running);
        assert!(game.board().rows()[19].iter().all(|c| !c.filled));
    }

    #[test]
    fn test_two_rows_trigger_quiz() {
        let mut game = game();
        fill_row_except(&mut game, 19, &[0, 1]);
        fill_row_except(&mut game, 18, &[0, 1]);
        with_piece(&mut game, TetrominoKind::O, Position::new(0, 0));
        game.hard_drop();

        assert_eq!(game.rows_cleared(), 2);
        assert_eq!(game.score(), 300);
        assert_eq!(game.rows_since_last_question(), 0);
        assert_eq!(game.phase(), GamePhase::QuizGated);
        assert!(game.interruption().question().is_some());
        assert!(game.drain_events().contains(&GameEvent::QuizTriggered));

        // Frozen while gated
        let pos = game.position();
        assert!(!game.tick());
        assert!(!game.move_left());
        assert!(!game.rotate());
        assert_eq!(game.hard_drop(), 0);
        assert_eq!(game.position(), pos);
    }

    #[test]
    fn test_correct_answer_resumes() {
        let mut game = game();
        game.interruption.trigger(1, &mut game.rng);
        let (n, d) = answer(&game);

        let outcome = game.submit_answer(n, d).unwrap();
        assert!(outcome.accepted);
        assert_eq!(game.phase(), GamePhase::Running);
        assert!(game.tick());
    }

    #[test]
    fn test_exhausted_attempts_restart() {
        let mut game = game();
        game.score = 5000;
        game.rows_cleared = 12;
        game.level = 2;
        game.board.set(19, 0, Cell::filled(1));
        game.interruption.trigger(2, &mut game.rng);
        let (n, d) = answer(&game);

        for expected in [2u8, 1] {
            let outcome = game.submit_answer(n + d, d).unwrap();
            assert_eq!(outcome.attempts_remaining, expected);
            assert_eq!(game.phase(), GamePhase::QuizGated);
            assert_eq!(game.score(), 5000);
        }
        let outcome = game.submit_answer(n + d, d).unwrap();
        assert!(outcome.game_over);
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(game.score(), 0);
        assert_eq!(game.level(), 1);
        assert_eq!(game.rows_cleared(), 0);
        assert_eq!(game.interruption().attempts_remaining(), 3);
        assert!(game.board().rows().iter().flatten().all(|c| !c.filled));
    }

    #[test]
    fn test_invalid_submission_keeps_quiz() {
        let mut game = game();
        game.interruption.trigger(1, &mut game.rng);
        assert_eq!(game.submit_answer(1, 0), Err(QuizError::ZeroDenominator));
        assert!(matches!(
            game.submit_answer_text("x", "3"),
            Err(QuizError::InvalidInput(_))
        ));
        assert_eq!(game.phase(), GamePhase::QuizGated);
        assert_eq!(game.interruption().attempts_remaining(), 3);
    }

    #[test]
    fn test_rotation_in_place() {
        let mut game = game();
        with_piece(&mut game, TetrominoKind::T, Position::new(5, 4));
        assert!(game.rotate());
        assert_eq!(game.current_piece().shape, TetrominoKind::T.shape().rotated_clockwise());
        assert_eq!(game.position(), Position::new(5, 4));
    }

    #[test]
    fn test_rotation_wall_kick() {
        let mut game = game();
        // Vertical I against the right wall; horizontal needs 4 columns
        let vertical = Piece::new(TetrominoKind::I).rotated();
        game.current = vertical;
        game.position = Position::new(5, 8);
        assert!(game.rotate());
        // In place, -1 and +1 overflow; -2 spans cols 6..=9
        assert_eq!(game.position(), Position::new(5, 6));
        assert_eq!(game.current_piece().shape, TetrominoKind::I.shape());
    }

    #[test]
    fn test_rotation_kick_order_prefers_left() {
        let mut game = game();
        // T rotated (3 wide -> 2 wide -> 3 wide) at right edge
        let mut piece = Piece::new(TetrominoKind::T).rotated();
        assert_eq!(piece.shape.width(), 2);
        game.current = piece.clone();
        game.position = Position::new(5, 8);
        assert!(game.rotate());
        assert_eq!(game.position(), Position::new(5, 7));
        piece = piece.rotated();
        assert_eq!(game.current_piece(), &piece);
    }

    #[test]
    fn test_rotation_rejected_when_boxed_in() {
        let mut game = game();
        // Vertical I in a one-wide well
        for row in 0..BOARD_HEIGHT {
            for col in 0..BOARD_WIDTH {
                if col != 4 {
                    game.board.set(row, col, Cell::filled(1));
                }
            }
        }
        let vertical = Piece::new(TetrominoKind::I).rotated();
        game.current = vertical.clone();
        game.position = Position::new(10, 4);
        assert!(!game.rotate());
        assert_eq!(game.current_piece(), &vertical);
        assert_eq!(game.position(), Position::new(10, 4));
    }

    #[test]
    fn test_spawn_overlap_is_game_over() {
        let mut game = game();
        for col in 0..BOARD_WIDTH {
            game.board.set(0, col, Cell::filled(1));
            game.board.set(1, col, Cell::filled(1));
        }
        // Keep the top rows from clearing
        game.board.set(0, 0, Cell::EMPTY);
        game.board.set(1, 0, Cell::EMPTY);
        game.spawn_piece();

        assert_eq!(game.phase(), GamePhase::GameOver);
        assert!(!game.tick());
        assert!(!game.move_left());
        assert!(game.drain_events().contains(&GameEvent::GameOver));
        // Pause toggle ignored
        assert!(!game.toggle_pause());

        game.restart();
        assert_eq!(game.phase(), GamePhase::Running);
    }

    #[test]
    fn test_pause_freezes_ticks() {
        let mut game = game();
        assert!(game.toggle_pause());
        assert_eq!(game.phase(), GamePhase::Paused);
        assert!(!game.tick());
        assert!(!game.move_right());
        assert_eq!(game.position().row, 0);
        assert!(!game.toggle_pause());
        assert!(game.tick());
    }

    #[test]
    fn test_level_from_rows() {
        let mut game = game();
        game.rows_cleared = 9;
        fill_row_except(&mut game, 19, &[4, 5, 6, 7]);
        with_piece(&mut game, TetrominoKind::I, Position::new(0, 4));
        game.hard_drop();
        assert_eq!(game.rows_cleared(), 10);
        assert_eq!(game.level(), 2);
        // Scored at the level in effect before the clear
        assert_eq!(game.score(), 100);
        assert!(game.drain_events().contains(&GameEvent::LevelUp(2)));
    }

    #[test]
    fn test_zero_row_thresholds_act_as_one() {
        let mut settings = Settings::default();
        settings.blocks.rows_per_level = 0;
        settings.blocks.rows_per_quiz = 0;
        let mut game = BlockGame::new(12345, &settings);

        fill_row_except(&mut game, 19, &[4, 5, 6, 7]);
        with_piece(&mut game, TetrominoKind::I, Position::new(0, 4));
        game.hard_drop();
        assert_eq!(game.rows_cleared(), 1);
        assert_eq!(game.level(), 2);
        assert_eq!(game.phase(), GamePhase::QuizGated);
    }

    #[test]
    fn test_snapshot_ghost() {
        let mut game = game();
        with_piece(&mut game, TetrominoKind::O, Position::new(0, 4));
        let snap = game.snapshot();
        assert_eq!(snap.piece, vec![(0, 4), (0, 5), (1, 4), (1, 5)]);
        assert_eq!(snap.ghost, vec![(18, 4), (18, 5), (19, 4), (19, 5)]);
        assert_eq!(snap.cells.len(), BOARD_HEIGHT);
        assert_eq!(snap.phase, GamePhase::Running);
        assert!(snap.question.is_none());
    }

    #[test]
    fn test_undrained_events_stay_bounded() {
        use crate::events::MAX_PENDING_EVENTS;

        let mut game = game();
        game.hard_drop();
        for _ in 0..MAX_PENDING_EVENTS + 10 {
            game.restart();
        }
        let events = game.drain_events();
        assert_eq!(events.len(), MAX_PENDING_EVENTS);
        assert!(!events.contains(&GameEvent::PieceLocked));
        assert!(game.drain_events().is_empty());
    }

    #[test]
    fn test_determinism() {
        let mut a = BlockGame::new(777, &Settings::default());
        let mut b = BlockGame::new(777, &Settings::default());
        for i in 0..400 {
            match i % 5 {
                0 => {
                    a.move_left();
                    b.move_left();
                }
                1 => {
                    a.rotate();
                    b.rotate();
                }
                _ => {
                    a.tick();
                    b.tick();
                }
            }
        }
        assert_eq!(a.snapshot(), b.snapshot());
    }
}
