use crate::engine::{Cue, IntervalEngine, Tick};
use crate::settings::{Settings, SettingsField, SettingsStore};

pub const PRE_ROLL_STEPS: [&str; 3] = ["READY", "SET", "GO"];

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Timer,
    /// Ready/Set/Go countdown; `step` indexes [`PRE_ROLL_STEPS`].
    PreRoll { step: usize },
    /// Editing a copy of the settings; nothing is applied until confirmed.
    Settings {
        selected: SettingsField,
        draft: Settings,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    ToggleRun,
    Reset,
    OpenSettings,
    Adjust { increase: bool },
    NextField,
    PrevField,
    SelectField(SettingsField),
    Confirm,
    Cancel,
    Quit,
}

/// Owns the settings, the engine and the screen mode. All input and timer
/// ticks go through here.
pub struct App {
    settings: Settings,
    engine: IntervalEngine,
    mode: Mode,
    store: SettingsStore,
    pre_roll: bool,
    quit: bool,
}

impl App {
    pub fn new(store: SettingsStore, pre_roll: bool) -> Self {
        let settings = store.load();
        Self {
            settings,
            engine: IntervalEngine::new(settings),
            mode: Mode::Timer,
            store,
            pre_roll,
            quit: false,
        }
    }

    pub fn engine(&self) -> &IntervalEngine {
        &self.engine
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    /// Apply one user command. The returned cue, if any, should be played.
    pub fn handle(&mut self, command: Command) -> Tick {
        if command == Command::Quit {
            self.quit = true;
            return Tick::default();
        }

        let mut out = Tick::default();

        match (&mut self.mode, command) {
            (Mode::Timer, Command::ToggleRun) => {
                if self.pre_roll && self.engine.is_fresh() {
                    log::debug!("Starting pre-roll");
                    self.mode = Mode::PreRoll { step: 0 };
                    out.cue = Some(Cue::Step);
                } else {
                    self.engine.toggle();
                    log::debug!("Running: {}", self.engine.running());
                }
            }
            (Mode::Timer, Command::Reset) => self.engine.reset(self.settings),
            (Mode::Timer, Command::OpenSettings) => {
                self.engine.pause();
                self.mode = Mode::Settings {
                    selected: SettingsField::WorkSeconds,
                    draft: self.settings,
                };
            }

            (Mode::PreRoll { .. }, Command::Reset) => {
                self.engine.reset(self.settings);
                self.mode = Mode::Timer;
            }

            (Mode::Settings { selected, draft }, Command::Adjust { increase }) => {
                draft.adjust(*selected, increase);
            }
            (Mode::Settings { selected, .. }, Command::NextField) => *selected = selected.next(),
            (Mode::Settings { selected, .. }, Command::PrevField) => *selected = selected.prev(),
            (Mode::Settings { selected, .. }, Command::SelectField(field)) => *selected = field,
            (Mode::Settings { draft, .. }, Command::Confirm) => {
                let settings = draft.clamped();
                if let Err(e) = self.store.save(&settings) {
                    log::error!("Keeping unsaved settings: {}", e);
                }
                self.settings = settings;
                self.engine.reset(settings);
                self.mode = Mode::Timer;
            }
            (Mode::Settings { .. }, Command::Cancel) => self.mode = Mode::Timer,

            _ => {}
        }

        out
    }

    /// One wall-clock second elapsed.
    pub fn tick(&mut self) -> Tick {
        match &mut self.mode {
            Mode::PreRoll { step } => {
                *step += 1;
                if *step < PRE_ROLL_STEPS.len() {
                    return Tick {
                        cue: Some(Cue::Step),
                        transition: None,
                    };
                }
                self.mode = Mode::Timer;
                self.engine.start();
                log::info!("Workout started");
                Tick::default()
            }
            Mode::Timer => {
                let tick = self.engine.advance();
                if let Some(transition) = tick.transition {
                    log::debug!(
                        "Phase {} -> {:?} ({}s)",
                        self.engine.phase_count(),
                        transition,
                        self.engine.time_left()
                    );
                }
                tick
            }
            Mode::Settings { .. } => Tick::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Transition;
    use tempfile::TempDir;

    fn app(dir: &TempDir, pre_roll: bool) -> App {
        App::new(SettingsStore::new(dir.path().join("settings.json")), pre_roll)
    }

    #[test]
    fn starts_in_timer_mode_with_loaded_settings() {
        let dir = TempDir::new().unwrap();
        let app = app(&dir, true);
        assert_eq!(app.mode(), &Mode::Timer);
        assert_eq!(app.settings(), &Settings::default());
        assert_eq!(app.engine().time_left(), Settings::default().work_seconds);
    }

    #[test]
    fn pre_roll_defers_start_for_three_ticks() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, true);

        let out = app.handle(Command::ToggleRun);
        assert_eq!(out.cue, Some(Cue::Step));
        assert_eq!(app.mode(), &Mode::PreRoll { step: 0 });
        assert!(!app.engine().running());

        assert_eq!(app.tick().cue, Some(Cue::Step));
        assert_eq!(app.tick().cue, Some(Cue::Step));
        assert!(!app.engine().running());

        assert_eq!(app.tick(), Tick::default());
        assert_eq!(app.mode(), &Mode::Timer);
        assert!(app.engine().running());
        assert_eq!(app.engine().time_left(), Settings::default().work_seconds);
    }

    #[test]
    fn toggle_is_ignored_during_pre_roll() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, true);
        app.handle(Command::ToggleRun);
        app.handle(Command::ToggleRun);
        app.handle(Command::OpenSettings);

        assert_eq!(app.mode(), &Mode::PreRoll { step: 0 });
        assert!(!app.engine().running());
    }

    #[test]
    fn reset_cancels_pre_roll() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, true);
        app.handle(Command::ToggleRun);
        app.tick();
        app.handle(Command::Reset);

        assert_eq!(app.mode(), &Mode::Timer);
        assert!(app.engine().is_fresh());
    }

    #[test]
    fn pause_and_resume_skip_pre_roll() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, true);
        app.handle(Command::ToggleRun);
        for _ in 0..4 {
            app.tick();
        }
        assert!(app.engine().running());

        app.handle(Command::ToggleRun);
        assert!(!app.engine().running());
        app.handle(Command::ToggleRun);
        assert_eq!(app.mode(), &Mode::Timer);
        assert!(app.engine().running());
    }

    #[test]
    fn without_pre_roll_toggle_starts_immediately() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, false);
        app.handle(Command::ToggleRun);
        assert!(app.engine().running());

        app.tick();
        assert_eq!(app.engine().time_left(), Settings::default().work_seconds - 1);
    }

    #[test]
    fn ticks_reach_the_engine_only_in_timer_mode() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, false);
        app.handle(Command::ToggleRun);
        app.handle(Command::OpenSettings);
        assert!(!app.engine().running());

        app.tick();
        assert_eq!(app.engine().time_left(), Settings::default().work_seconds);
    }

    #[test]
    fn confirm_saves_and_resets() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, false);
        app.handle(Command::ToggleRun);
        app.tick();

        app.handle(Command::OpenSettings);
        app.handle(Command::Adjust { increase: true });
        app.handle(Command::NextField);
        app.handle(Command::Adjust { increase: false });
        app.handle(Command::Confirm);

        assert_eq!(app.mode(), &Mode::Timer);
        assert_eq!(app.settings().work_seconds, 45);
        assert_eq!(app.settings().rest_seconds, 15);
        assert!(app.engine().is_fresh());
        assert_eq!(app.engine().time_left(), 45);

        let reloaded = SettingsStore::new(dir.path().join("settings.json")).load();
        assert_eq!(&reloaded, app.settings());
    }

    #[test]
    fn cancel_discards_the_draft() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, false);
        app.handle(Command::OpenSettings);
        app.handle(Command::SelectField(SettingsField::TotalRounds));
        app.handle(Command::Adjust { increase: true });
        app.handle(Command::Cancel);

        assert_eq!(app.mode(), &Mode::Timer);
        assert_eq!(app.settings(), &Settings::default());
        assert!(!dir.path().join("settings.json").exists());
    }

    #[test]
    fn field_selection_cycles_both_ways() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, false);
        app.handle(Command::OpenSettings);
        app.handle(Command::PrevField);

        match app.mode() {
            Mode::Settings { selected, .. } => assert_eq!(*selected, SettingsField::LongBreakEvery),
            other => panic!("unexpected mode {other:?}"),
        }
    }

    #[test]
    fn full_sequence_reports_completion() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, false);
        app.handle(Command::OpenSettings);
        app.handle(Command::SelectField(SettingsField::TotalRounds));
        for _ in 0..8 {
            app.handle(Command::Adjust { increase: false });
        }
        app.handle(Command::Confirm);
        assert_eq!(app.settings().total_rounds, 2);

        app.handle(Command::ToggleRun);
        let mut transitions = Vec::new();
        for _ in 0..1000 {
            if let Some(t) = app.tick().transition {
                transitions.push(t);
                if t == Transition::Complete {
                    break;
                }
            }
        }
        assert_eq!(
            transitions,
            vec![Transition::Rest, Transition::Work, Transition::Complete]
        );
        assert!(!app.engine().running());
    }

    #[test]
    fn quit_sets_flag_from_any_mode() {
        let dir = TempDir::new().unwrap();
        let mut app = app(&dir, false);
        app.handle(Command::OpenSettings);
        app.handle(Command::Quit);
        assert!(app.should_quit());
    }
}
