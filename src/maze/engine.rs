//! Maze-chase game state machine
//!
//! One tick: actor move and consumption (which may raise a quiz break or
//! complete the level), then the power timer, then each pursuer in turn
//! (target, steer, move, collide, mode timer). Losing a life ends the
//! pursuer pass for that tick.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use super::layout::{CellKind, Maze};
use super::movement::{Direction, can_turn, grid_cell, step};
use super::pursuer::{ACTOR_SPAWN, Actor, PURSUER_RESPAWN, Pursuer, PursuerMode};
use crate::driver::Simulation;
use crate::error::QuizError;
use crate::events::{EventQueue, GameEvent};
use crate::quiz::{GamePhase, InterruptionController, SubmitOutcome};
use crate::settings::{MazeSettings, Settings};

/// Quiz breaks per maze, at 1/3, 2/3 and all dots eaten
pub const QUIZ_BREAKS: u8 = 3;

/// Render-ready view of the maze game
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MazeSnapshot {
    /// Row-major, `MAZE_COLS` per row
    pub cells: Vec<CellKind>,
    pub actor: Actor,
    pub pursuers: Vec<Pursuer>,
    pub score: u64,
    pub level: u32,
    pub lives: u8,
    pub dots_eaten: u32,
    pub total_dots: u32,
    pub frightened_ticks: u32,
    pub attempts_remaining: u8,
    pub phase: GamePhase,
    pub question: Option<String>,
}

#[derive(Debug, Clone)]
pub struct MazeGame {
    settings: MazeSettings,
    rng: Pcg32,
    maze: Maze,
    actor: Actor,
    pursuers: Vec<Pursuer>,
    score: u64,
    level: u32,
    lives: u8,
    dots_eaten: u32,
    last_break: u8,
    /// Engine-wide power countdown; zero when no pellet is active
    frightened_ticks: u32,
    game_over: bool,
    time_ticks: u64,
    interruption: InterruptionController,
    events: EventQueue,
}

impl MazeGame {
    pub fn new(seed: u64, settings: &Settings) -> Self {
        if let Err(e) = settings.validate() {
            log::warn!("Maze game running with unvalidated settings: {}", e);
        }
        let game = Self {
            settings: settings.maze.clone(),
            rng: Pcg32::seed_from_u64(seed),
            maze: Maze::classic(),
            actor: Actor::default(),
            pursuers: Pursuer::squad(),
            score: 0,
            level: 1,
            lives: settings.maze.starting_lives,
            dots_eaten: 0,
            last_break: 0,
            frightened_ticks: 0,
            game_over: false,
            time_ticks: 0,
            interruption: InterruptionController::new(settings.quiz.max_attempts),
            events: EventQueue::new(),
        };
        game.check_spawn_points();
        game
    }

    // === Read-only state ===

    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    pub fn actor(&self) -> &Actor {
        &self.actor
    }

    pub fn pursuers(&self) -> &[Pursuer] {
        &self.pursuers
    }

    pub fn score(&self) -> u64 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lives(&self) -> u8 {
        self.lives
    }

    pub fn dots_eaten(&self) -> u32 {
        self.dots_eaten
    }

    /// Quiz breaks already fired on this maze (0..=3)
    pub fn last_break(&self) -> u8 {
        self.last_break
    }

    pub fn frightened_ticks(&self) -> u32 {
        self.frightened_ticks
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

    /// Take events produced since the last call (at most
    /// [`MAX_PENDING_EVENTS`](crate::events::MAX_PENDING_EVENTS), newest kept)
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        self.events.drain()
    }

    /// Whether a token centred on tile `pos` clears the walls by the wall margin
    pub fn fits(&self, pos: Vec2) -> bool {
        // Token coordinates are tile-centred; occupancy is tested on tile-cornered ones
        self.maze
            .can_occupy(pos + Vec2::splat(0.5), self.settings.wall_margin)
    }

    pub fn snapshot(&self) -> MazeSnapshot {
        MazeSnapshot {
            cells: self.maze.cells().to_vec(),
            actor: self.actor.clone(),
            pursuers: self.pursuers.clone(),
            score: self.score,
            level: self.level,
            lives: self.lives,
            dots_eaten: self.dots_eaten,
            total_dots: self.maze.total_dots(),
            frightened_ticks: self.frightened_ticks,
            attempts_remaining: self.interruption.attempts_remaining(),
            phase: self.phase(),
            question: self.interruption.question_text(),
        }
    }

    // === Player intents ===

    /// Buffer a turn; it is taken as soon as the neighbouring tile is open.
    /// Returns false (and buffers nothing) unless Running.
    pub fn set_direction(&mut self, dir: Direction) -> bool {
        if self.phase() != GamePhase::Running {
            return false;
        }
        self.actor.pending_dir = dir;
        true
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

    /// Fresh maze, score, lives and interruption state; the RNG stream continues
    pub fn restart(&mut self) {
        self.maze = Maze::classic();
        self.actor = Actor::default();
        self.pursuers = Pursuer::squad();
        self.score = 0;
        self.level = 1;
        self.lives = self.settings.starting_lives;
        self.dots_eaten = 0;
        self.last_break = 0;
        self.frightened_ticks = 0;
        self.game_over = false;
        self.time_ticks = 0;
        self.interruption.reset();
        self.events.push(GameEvent::Restarted);
        log::info!("Maze game restarted");
    }

    /// Restart on a new RNG stream
    pub fn reseed(&mut self, seed: u64) {
        self.rng = Pcg32::seed_from_u64(seed);
        self.restart();
    }

    fn check_spawn_points(&self) {
        let homes = self.pursuers.iter().map(|p| p.home);
        for pos in [ACTOR_SPAWN, PURSUER_RESPAWN].into_iter().chain(homes) {
            if !self.fits(pos) {
                log::warn!("Spawn point ({}, {}) overlaps a wall", pos.x, pos.y);
            }
        }
    }

    // === Simulation ===

    fn move_actor(&mut self) {
        let actor = &mut self.actor;
        if actor.pending_dir != actor.dir && can_turn(&self.maze, actor.pos, actor.pending_dir) {
            actor.dir = actor.pending_dir;
        }
        if let Some(next) = step(&self.maze, actor.pos, actor.dir, self.settings.actor_speed) {
            actor.pos = next;
        }

        let (col, row) = grid_cell(self.actor.pos);
        match self.maze.consume(col, row) {
            Some(CellKind::Dot) => {
                self.score += self.settings.dot_points;
                self.dots_eaten += 1;
                self.events.push(GameEvent::DotEaten);
                self.check_quiz_break();
            }
            Some(CellKind::PowerPellet) => {
                self.score += self.settings.pellet_points;
                self.dots_eaten += 1;
                self.frightened_ticks = self.settings.frightened_ticks;
                for pursuer in &mut self.pursuers {
                    pursuer.mode = PursuerMode::Frightened;
                }
                self.events.push(GameEvent::PowerPelletEaten);
                self.check_quiz_break();
            }
            _ => {}
        }

        if self.dots_eaten >= self.maze.total_dots() {
            self.next_level();
        }
    }

    /// Fire the next pending break once its threshold is reached; at most one per call
    fn check_quiz_break(&mut self) {
        if self.last_break >= QUIZ_BREAKS {
            return;
        }
        let total = self.maze.total_dots();
        let threshold = total * u32::from(self.last_break + 1) / u32::from(QUIZ_BREAKS);
        if self.dots_eaten >= threshold {
            self.last_break += 1;
            log::debug!(
                "Quiz break {}/{} at {} of {} dots",
                self.last_break,
                QUIZ_BREAKS,
                self.dots_eaten,
                total
            );
            self.interruption.trigger(self.level, &mut self.rng);
            self.events.push(GameEvent::QuizTriggered);
        }
    }

    fn next_level(&mut self) {
        self.level += 1;
        self.maze = Maze::classic();
        self.dots_eaten = 0;
        self.last_break = 0;
        self.frightened_ticks = 0;
        self.actor = Actor::default();
        self.pursuers = Pursuer::squad();
        self.events.push(GameEvent::MazeCleared);
        self.events.push(GameEvent::LevelUp(self.level));
        log::info!("Maze cleared, level {}", self.level);
    }

    fn update_frightened(&mut self) {
        if self.frightened_ticks == 0 {
            return;
        }
        self.frightened_ticks -= 1;
        if self.frightened_ticks == 0 {
            for pursuer in &mut self.pursuers {
                pursuer.mode = PursuerMode::Scatter;
            }
        }
    }

    fn move_pursuers(&mut self) {
        for i in 0..self.pursuers.len() {
            let target = self.pursuers[i].target(&self.actor, &mut self.rng);
            let dir = self.pursuers[i].choose_direction(&self.maze, target);

            let pursuer = &mut self.pursuers[i];
            pursuer.dir = dir;
            let speed = if pursuer.mode == PursuerMode::Frightened {
                self.settings.frightened_speed
            } else {
                self.settings.pursuer_speed
            };
            if let Some(next) = step(&self.maze, pursuer.pos, dir, speed) {
                pursuer.pos = next;
            }

            if pursuer.pos.distance(self.actor.pos) < self.settings.collision_radius {
                if pursuer.mode == PursuerMode::Frightened {
                    pursuer.send_home();
                    self.score += self.settings.pursuer_points;
                    self.events.push(GameEvent::PursuerEaten(i));
                } else {
                    self.lose_life();
                    return;
                }
            }

            self.pursuers[i].advance_mode_timer(self.settings.mode_period_ticks);
        }
    }

    fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.events.push(GameEvent::LifeLost {
            lives_left: self.lives,
        });
        log::debug!("Life lost, {} left", self.lives);

        if self.lives == 0 {
            self.game_over = true;
            self.interruption.dismiss();
            self.events.push(GameEvent::GameOver);
            log::info!("Maze game over: score={} level={}", self.score, self.level);
            return;
        }

        self.actor = Actor::default();
        self.pursuers = Pursuer::squad();
        self.frightened_ticks = 0;
    }
}

impl Simulation for MazeGame {
    fn start(&mut self) {
        self.restart();
    }

    fn tick(&mut self) -> bool {
        if self.phase() != GamePhase::Running {
            return false;
        }
        self.time_ticks += 1;
        self.move_actor();
        self.update_frightened();
        self.move_pursuers();
        true
    }

    fn tick_delay_ms(&self) -> u64 {
        self.settings.tick_delay_ms()
    }

    fn phase(&self) -> GamePhase {
        MazeGame::phase(self)
    }
}
