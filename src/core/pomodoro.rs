//! # Pomodoro Timer
//!
//! Countdown state only. The one-second ticker lives in the TUI layer and
//! feeds `Action::PomodoroTick` back into the reducer.

pub const WORK_SECONDS: u32 = 25 * 60;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Timer not running; tick ignored.
    Idle,
    Counting,
    Finished,
}

#[derive(Debug, Clone)]
pub struct Pomodoro {
    pub time_left: u32,
    pub running: bool,
    pub completed: u32,
}

impl Pomodoro {
    pub fn new() -> Self {
        Self {
            time_left: WORK_SECONDS,
            running: false,
            completed: 0,
        }
    }

    /// Returns true if the timer transitioned from stopped to running.
    pub fn start(&mut self) -> bool {
        if self.running || self.time_left == 0 {
            return false;
        }
        self.running = true;
        true
    }

    pub fn stop(&mut self) {
        self.running = false;
    }

    pub fn reset(&mut self) {
        self.running = false;
        self.time_left = WORK_SECONDS;
    }

    pub fn tick(&mut self) -> TickOutcome {
        if !self.running || self.time_left == 0 {
            return TickOutcome::Idle;
        }
        self.time_left -= 1;
        if self.time_left == 0 {
            self.running = false;
            self.completed += 1;
            TickOutcome::Finished
        } else {
            TickOutcome::Counting
        }
    }

    pub fn display(&self) -> String {
        let (mins, secs) = (self.time_left / 60, self.time_left % 60);
        format!("Pomodoro Timer: {mins:02}:{secs:02}")
    }
}

impl Default for Pomodoro {
    fn default() -> Self {
        Self::new()
    }
}
