//! Fraction Arcade headless runner
//!
//! Drives both engines through the arcade shell with scripted intents,
//! answers every quiz, and prints the final snapshots as JSON.
//!
//! Usage: `fraction-arcade [settings.json] [seed]`

use fraction_arcade::{
    Arcade, Direction, GameEvent, GameKind, GamePhase, InterruptionController, Settings,
};

/// Host frame length fed to the clock (ms)
const FRAME_MS: u64 = 16;
const DEMO_FRAMES: u32 = 6000;
const DEFAULT_SEED: u64 = 0x5EED;

/// Per-run event counts, drained every frame like a HUD would
#[derive(Debug, Default)]
struct Tally {
    quizzes: u32,
    level_ups: u32,
    restarts: u32,
}

impl Tally {
    fn record(&mut self, events: &[GameEvent]) {
        for event in events {
            match event {
                GameEvent::LevelUp(_) => self.level_ups += 1,
                GameEvent::Restarted => self.restarts += 1,
                _ => {}
            }
        }
    }
}

fn main() {
    env_logger::init();
    log::info!("Fraction Arcade (headless) starting...");

    let args: Vec<String> = std::env::args().collect();
    let settings = match args.get(1) {
        Some(path) => match Settings::load(path) {
            Ok(settings) => settings,
            Err(e) => {
                log::error!("Could not load settings from {}: {}", path, e);
                std::process::exit(1);
            }
        },
        None => Settings::default(),
    };
    let seed = args
        .get(2)
        .and_then(|s| s.parse().ok())
        .unwrap_or(DEFAULT_SEED);
    log::info!("Seed: {}", seed);

    let mut arcade = Arcade::new(seed, &settings);
    run_blocks(&mut arcade);
    run_maze(&mut arcade);
    arcade.stop();
}

/// Correct answer to the open quiz, if any
fn solve(interruption: &InterruptionController) -> Option<(i64, i64)> {
    interruption.question().map(|q| {
        let answer = q.correct_answer.simplify();
        (answer.numerator(), answer.denominator())
    })
}

fn run_blocks(arcade: &mut Arcade) {
    arcade.select(GameKind::Blocks);
    let mut tally = Tally::default();

    for frame in 0..DEMO_FRAMES {
        arcade.advance(FRAME_MS);
        tally.record(&arcade.drain_events());

        match arcade.blocks().phase() {
            GamePhase::GameOver => break,
            GamePhase::QuizGated => {
                if let Some((n, d)) = solve(arcade.blocks().interruption()) {
                    match arcade.blocks_mut().submit_answer(n, d) {
                        Ok(_) => tally.quizzes += 1,
                        Err(e) => log::warn!("Quiz submission rejected: {}", e),
                    }
                }
                continue;
            }
            _ => {}
        }

        // Spread pieces across the board: shift, rotate, then drop
        let game = arcade.blocks_mut();
        match frame % 12 {
            0 => {
                game.rotate();
            }
            3 if frame % 48 < 24 => {
                game.move_left();
            }
            3 => {
                game.move_right();
            }
            9 => {
                game.hard_drop();
            }
            _ => {}
        }
    }

    tally.record(&arcade.drain_events());
    report(arcade, "Blocks", &tally);
}

fn run_maze(arcade: &mut Arcade) {
    arcade.select(GameKind::Maze);
    let mut tally = Tally::default();

    for frame in 0..DEMO_FRAMES {
        arcade.advance(FRAME_MS);
        tally.record(&arcade.drain_events());

        match arcade.maze().phase() {
            GamePhase::GameOver => break,
            GamePhase::QuizGated => {
                if let Some((n, d)) = solve(arcade.maze().interruption()) {
                    match arcade.maze_mut().submit_answer(n, d) {
                        Ok(_) => tally.quizzes += 1,
                        Err(e) => log::warn!("Quiz submission rejected: {}", e),
                    }
                }
                continue;
            }
            _ => {}
        }

        if frame % 45 == 0 {
            let dir = Direction::ALL[(frame / 45) as usize % Direction::ALL.len()];
            arcade.maze_mut().set_direction(dir);
        }
    }

    tally.record(&arcade.drain_events());
    report(arcade, "Maze", &tally);
}

fn report(arcade: &Arcade, name: &str, tally: &Tally) {
    println!(
        "{}: {} quizzes answered, {} level-ups, {} restarts, phase {:?}",
        name,
        tally.quizzes,
        tally.level_ups,
        tally.restarts,
        arcade.phase()
    );

    match serde_json::to_string_pretty(&arcade.snapshot()) {
        Ok(json) => println!("{}", json),
        Err(e) => log::error!("Snapshot serialization failed: {}", e),
    }
}
