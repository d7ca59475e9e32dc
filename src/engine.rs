//! Work/rest interval engine.
//!
//! The engine is a plain state machine with no clock of its own. The caller
//! invokes [`IntervalEngine::advance`] once per elapsed second while the timer
//! runs, and maps the returned [`Tick`] to sounds and notifications.
//!
//! ```text
//! work -> rest -> work -> ... -> work -> long break -> work -> ... -> work -> (reset)
//! ```

use crate::settings::Settings;

/// Audible cue the shell should play for the second that just elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cue {
    /// Countdown beep at 5 and 3 seconds left.
    TickWarning,
    /// Last second of a work phase.
    PhaseEndPositive,
    /// Last second of a rest phase.
    PhaseEndWarning,
    /// One step of the Ready/Set/Go pre-roll.
    Step,
}

/// Phase entered when the countdown crossed zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Work,
    Rest,
    LongBreak,
    /// All rounds finished; the engine is back at its initial state.
    Complete,
}

/// Result of one [`IntervalEngine::advance`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tick {
    pub cue: Option<Cue>,
    pub transition: Option<Transition>,
}

/// Number of full work+rest rounds behind a given phase count.
pub fn rounds_completed(phase_count: u32) -> u32 {
    (phase_count + 1) / 2
}

#[derive(Debug, Clone)]
pub struct IntervalEngine {
    settings: Settings,
    time_left: u32,
    is_working: bool,
    long_break: bool,
    phase_count: u32,
    running: bool,
}

impl IntervalEngine {
    pub fn new(settings: Settings) -> Self {
        let mut engine = Self {
            settings,
            time_left: 0,
            is_working: true,
            long_break: false,
            phase_count: 0,
            running: false,
        };
        engine.reset(settings);
        engine
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Back to the first work phase, stopped, using `settings` from now on.
    pub fn reset(&mut self, settings: Settings) {
        let settings = settings.clamped();
        self.settings = settings;
        self.time_left = settings.work_seconds;
        self.is_working = true;
        self.long_break = false;
        self.phase_count = 0;
        self.running = false;
    }

    pub fn start(&mut self) {
        self.running = true;
    }

    pub fn pause(&mut self) {
        self.running = false;
    }

    pub fn toggle(&mut self) {
        self.running = !self.running;
    }

    /// Consume one second. Does nothing while paused.
    pub fn advance(&mut self) -> Tick {
        if !self.running {
            return Tick::default();
        }

        self.time_left = self.time_left.saturating_sub(1);

        if self.time_left > 0 {
            return Tick {
                cue: self.cue(),
                transition: None,
            };
        }

        Tick {
            cue: None,
            transition: Some(self.next_phase()),
        }
    }

    fn cue(&self) -> Option<Cue> {
        match self.time_left {
            1 if self.is_working => Some(Cue::PhaseEndPositive),
            1 => Some(Cue::PhaseEndWarning),
            3 | 5 => Some(Cue::TickWarning),
            _ => None,
        }
    }

    fn next_phase(&mut self) -> Transition {
        let rounds = rounds_completed(self.phase_count);
        let every = self.settings.long_break_every;

        // The phase that just ended is counted before the check, so the
        // sequence stops after the last work phase instead of a trailing rest.
        if rounds_completed(self.phase_count + 1) >= self.settings.total_rounds {
            log::info!("Sequence complete after {} rounds", self.settings.total_rounds);
            self.reset(self.settings);
            return Transition::Complete;
        }

        let transition = if self.is_working && rounds > 0 && rounds % every == every - 1 {
            self.is_working = false;
            self.long_break = true;
            self.time_left = self.settings.long_break_seconds;
            Transition::LongBreak
        } else {
            self.is_working = !self.is_working;
            self.long_break = false;
            if self.is_working {
                self.time_left = self.settings.work_seconds;
                Transition::Work
            } else {
                self.time_left = self.settings.rest_seconds;
                Transition::Rest
            }
        };

        self.phase_count += 1;
        transition
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn time_left(&self) -> u32 {
        self.time_left
    }

    pub fn is_working(&self) -> bool {
        self.is_working
    }

    pub fn is_long_break(&self) -> bool {
        self.long_break
    }

    pub fn phase_count(&self) -> u32 {
        self.phase_count
    }

    pub fn rounds_completed(&self) -> u32 {
        rounds_completed(self.phase_count)
    }

    pub fn running(&self) -> bool {
        self.running
    }

    /// True when nothing has happened since the last reset.
    pub fn is_fresh(&self) -> bool {
        !self.running
            && self.phase_count == 0
            && self.is_working
            && self.time_left == self.settings.work_seconds
    }

    /// Full length of the current phase in seconds.
    pub fn phase_total(&self) -> u32 {
        if self.is_working {
            self.settings.work_seconds
        } else if self.long_break {
            self.settings.long_break_seconds
        } else {
            self.settings.rest_seconds
        }
    }

    /// 0.0 .. 1.0 progress within the current phase.
    pub fn progress(&self) -> f64 {
        let total = self.phase_total();
        if total == 0 {
            return 0.0;
        }
        (1.0 - self.time_left as f64 / total as f64).clamp(0.0, 1.0)
    }
}
