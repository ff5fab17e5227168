//! Collaborator-side audio and rendering stand-ins.
//!
//! The engine only ever says "play cue X"; which clip that resolves to,
//! and at what volume, is this side's business. `ClipBank` holds the
//! cue-to-clips table and picks among registered clips at random;
//! `ConsoleSurface` realizes commands as log lines.

use std::collections::HashMap;

use arcoach_core::error::ScenarioError;
use arcoach_core::rng::DeterministicRng;
use arcoach_scenario::application::surface::OrchestrationSurface;
use arcoach_scenario::domain::command::Command;
use arcoach_scenario::domain::narration::AudioCue;

/// One registered audio clip.
#[derive(Debug, Clone, PartialEq)]
pub struct ClipEntry {
    /// Asset name of the clip.
    pub clip: String,
    /// Playback volume in `[0.0, 1.0]`.
    pub volume: f32,
}

/// Cue-to-clips registry with random selection.
#[derive(Debug, Default)]
pub struct ClipBank {
    clips: HashMap<AudioCue, Vec<ClipEntry>>,
}

impl ClipBank {
    /// Creates an empty bank.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a clip for a cue.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::InvalidConfig`] if `volume` is outside
    /// `[0.0, 1.0]`.
    pub fn register(
        &mut self,
        cue: AudioCue,
        clip: &str,
        volume: f32,
    ) -> Result<(), ScenarioError> {
        if !(0.0..=1.0).contains(&volume) {
            return Err(ScenarioError::InvalidConfig(format!(
                "clip volume {volume} for {cue:?} is outside [0.0, 1.0]"
            )));
        }
        self.clips.entry(cue).or_default().push(ClipEntry {
            clip: clip.to_owned(),
            volume,
        });
        Ok(())
    }

    /// Picks a clip for `cue`, or `None` (with a warning) if the cue has
    /// no registered clips.
    #[allow(clippy::cast_possible_truncation)]
    pub fn select(&self, cue: AudioCue, rng: &mut dyn DeterministicRng) -> Option<&ClipEntry> {
        let clips = self.clips.get(&cue).filter(|clips| !clips.is_empty())?;
        let upper = (clips.len() - 1) as u32;
        let index = rng.next_u32_range(0, upper) as usize;
        clips.get(index)
    }
}

/// A surface that renders every command as a log line and "plays" audio
/// by resolving cues through a [`ClipBank`].
pub struct ConsoleSurface<R: DeterministicRng> {
    bank: ClipBank,
    rng: R,
}

impl<R: DeterministicRng> ConsoleSurface<R> {
    /// Creates a console surface over a clip bank.
    pub fn new(bank: ClipBank, rng: R) -> Self {
        Self { bank, rng }
    }
}

impl<R: DeterministicRng> OrchestrationSurface for ConsoleSurface<R> {
    fn apply(&mut self, command: &Command) {
        if let Command::PlayAudio(cue) = command {
            match self.bank.select(*cue, &mut self.rng) {
                Some(entry) => {
                    tracing::info!(?cue, clip = %entry.clip, volume = entry.volume, "playing");
                }
                None => tracing::warn!(?cue, "no clips registered for cue"),
            }
            return;
        }
        let rendered =
            serde_json::to_string(command).expect("command serialization is infallible");
        tracing::info!(command = %rendered, "apply");
    }
}
