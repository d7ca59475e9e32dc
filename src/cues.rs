//! Maps engine cues and transitions to sounds and desktop notifications.

use notify_rust::{Notification, Urgency};
use std::io;
use std::path::Path;
use std::process::{Command, ExitStatus, Stdio};

use crate::engine::{Cue, Tick, Transition};

const SOUND_DIR: &str = "/usr/share/sounds/freedesktop/stereo";

/// Player/file candidates for a cue, tried in order.
fn sound_candidates(cue: Cue) -> [(&'static str, String); 2] {
    let name = match cue {
        Cue::TickWarning => "bell.oga",
        Cue::PhaseEndPositive => "complete.oga",
        Cue::PhaseEndWarning => "dialog-warning.oga",
        Cue::Step => "message.oga",
    };
    [
        ("paplay", format!("{SOUND_DIR}/{name}")),
        ("aplay", "/usr/share/sounds/generic.wav".to_string()),
    ]
}

fn transition_message(transition: Transition) -> (&'static str, &'static str) {
    match transition {
        Transition::Work => ("Work!", "Rest is over. Go!"),
        Transition::Rest => ("Rest", "Catch your breath."),
        Transition::LongBreak => ("Long Break", "Nice set. Take a longer break."),
        Transition::Complete => ("Workout Complete", "All rounds done."),
    }
}

pub struct CuePlayer {
    sound: bool,
}

impl CuePlayer {
    pub fn new(sound: bool) -> Self {
        Self { sound }
    }

    pub fn announce(&self, tick: Tick) {
        if let Some(cue) = tick.cue {
            self.play(cue);
        }
        if let Some(transition) = tick.transition {
            notify(transition);
        }
    }

    pub fn play(&self, cue: Cue) {
        if !self.sound {
            return;
        }

        std::thread::spawn(move || {
            if play_first(&sound_candidates(cue)).is_none() {
                log::debug!("No sound file found for {:?}", cue);
            }
        });
    }
}

/// Play the first candidate whose file exists and wait for the player to exit,
/// so finished players are reaped. Returns `None` when no file exists.
fn play_first(candidates: &[(&str, String)]) -> Option<io::Result<ExitStatus>> {
    let (cmd, file) = candidates
        .iter()
        .find(|(_, file)| Path::new(file).exists())?;

    let status = Command::new(cmd)
        .arg(file)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status();
    if let Err(e) = &status {
        log::debug!("{} {} failed: {}", cmd, file, e);
    }
    Some(status)
}

fn notify(transition: Transition) {
    let (title, body) = transition_message(transition);
    let urgency = if transition == Transition::Complete {
        Urgency::Critical
    } else {
        Urgency::Normal
    };

    if let Err(e) = Notification::new()
        .summary(title)
        .body(body)
        .appname("hiit-timer")
        .icon("alarm-clock")
        .urgency(urgency)
        .show()
    {
        log::debug!("Notification failed: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_cue_has_a_distinct_primary_sound() {
        let cues = [Cue::TickWarning, Cue::PhaseEndPositive, Cue::PhaseEndWarning, Cue::Step];
        let mut files: Vec<String> = cues
            .iter()
            .map(|&c| sound_candidates(c)[0].1.clone())
            .collect();
        files.sort();
        files.dedup();
        assert_eq!(files.len(), cues.len());
    }

    #[test]
    fn missing_sound_files_are_skipped() {
        let candidates = [("paplay", "/nonexistent/hiit-timer/beep.oga".to_string())];
        assert!(play_first(&candidates).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn player_is_waited_on() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().into_owned();
        let candidates = [
            ("false", "/nonexistent/hiit-timer/beep.oga".to_string()),
            ("true", path),
        ];

        let status = play_first(&candidates).unwrap().unwrap();
        assert!(status.success());
    }

    #[test]
    fn unknown_player_reports_error() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.path().to_string_lossy().into_owned();
        let candidates = [("hiit-timer-no-such-player", path)];
        assert!(play_first(&candidates).unwrap().is_err());
    }

    #[test]
    fn silent_player_does_nothing() {
        CuePlayer::new(false).play(Cue::Step);
    }
}
