//! Fixed-delay tick scheduling
//!
//! The host feeds wall-clock time into [`SimulationLoop::advance`]; the loop
//! runs whole ticks of the engine's current delay. Each tick runs to completion
//! before the next is considered, and the engine checks its own pause state at
//! the top of every tick.

use crate::consts::MAX_CATCHUP_TICKS;
use crate::quiz::GamePhase;

/// A tickable engine
pub trait Simulation {
    /// Seed fresh state; called when the engine becomes the active one
    fn start(&mut self);

    /// Advance one tick. Returns false (and changes nothing) unless Running.
    fn tick(&mut self) -> bool;

    /// Delay until the next tick, re-read after every tick
    fn tick_delay_ms(&self) -> u64;

    fn phase(&self) -> GamePhase;
}

/// Re-arming fixed-delay clock for one engine
#[derive(Debug, Clone, Default)]
pub struct SimulationLoop {
    armed: bool,
    accumulator_ms: u64,
    ticks_run: u64,
}

impl SimulationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm the clock. Returns false if it was already armed (nothing is rescheduled).
    pub fn start(&mut self) -> bool {
        if self.armed {
            return false;
        }
        self.armed = true;
        self.accumulator_ms = 0;
        true
    }

    /// Disarm and drop any partial delay. Returns false if already stopped.
    pub fn stop(&mut self) -> bool {
        let was_armed = self.armed;
        self.armed = false;
        self.accumulator_ms = 0;
        was_armed
    }

    pub fn is_armed(&self) -> bool {
        self.armed
    }

    /// Ticks that advanced state since construction
    pub fn ticks_run(&self) -> u64 {
        self.ticks_run
    }

    /// Feed elapsed time and run every tick that became due.
    /// Returns how many ticks advanced the simulation.
    pub fn advance<S: Simulation + ?Sized>(&mut self, sim: &mut S, elapsed_ms: u64) -> u32 {
        if !self.armed {
            return 0;
        }
        self.accumulator_ms += elapsed_ms;

        let mut substeps = 0;
        let mut advanced = 0;
        loop {
            let delay = sim.tick_delay_ms().max(1);
            if self.accumulator_ms < delay {
                break;
            }
            if substeps == MAX_CATCHUP_TICKS {
                // Too far behind; drop the backlog instead of spiralling
                log::debug!("Dropping {}ms of tick backlog", self.accumulator_ms);
                self.accumulator_ms = 0;
                break;
            }
            if sim.tick() {
                advanced += 1;
            }
            self.accumulator_ms -= delay;
            substeps += 1;
        }

        self.ticks_run += u64::from(advanced);
        advanced
    }
}
