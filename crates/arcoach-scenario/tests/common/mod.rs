//! Shared fixtures for the scenario integration tests.

use std::collections::HashMap;

use arcoach_core::geometry::{Point3, Pose};
use arcoach_scenario::application::surface::OrchestrationSurface;
use arcoach_scenario::domain::command::{Command, OverlayId, PropId};
use arcoach_scenario::domain::marker::RawDetection;
use arcoach_scenario::domain::narration::AudioCue;

/// A surface that records every applied command and folds visibility,
/// detection, placement, and instruction state for assertions.
#[derive(Debug, Default)]
pub struct RecordingSurface {
    commands: Vec<Command>,
    visible: HashMap<OverlayId, bool>,
    placed: HashMap<PropId, Pose>,
    played: Vec<AudioCue>,
    instruction: String,
    detection_enabled: bool,
}

impl RecordingSurface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every command applied so far, in order.
    pub fn commands(&self) -> &[Command] {
        &self.commands
    }

    /// Whether an overlay is currently visible (hidden by default).
    pub fn is_visible(&self, id: OverlayId) -> bool {
        self.visible.get(&id).copied().unwrap_or(false)
    }

    /// Where a prop was last placed, if it exists.
    pub fn prop_pose(&self, id: PropId) -> Option<Pose> {
        self.placed.get(&id).copied()
    }

    /// Cues played so far, in order.
    pub fn played(&self) -> &[AudioCue] {
        &self.played
    }

    /// Current instructional panel text.
    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    /// Current detection state as commanded.
    pub fn detection_enabled(&self) -> bool {
        self.detection_enabled
    }
}

impl OrchestrationSurface for RecordingSurface {
    fn apply(&mut self, command: &Command) {
        match command {
            Command::SetOverlayVisible(id, visible) => {
                self.visible.insert(*id, *visible);
            }
            Command::SetDetectionEnabled(enabled) => {
                self.detection_enabled = *enabled;
            }
            Command::PlayAudio(cue) => self.played.push(*cue),
            Command::SetInstructionText(text) => {
                self.instruction.clone_from(text);
            }
            Command::PlaceProp(id, pose) => {
                self.placed.insert(*id, *pose);
            }
            Command::DestroyProp(id) => {
                self.placed.remove(id);
            }
        }
        self.commands.push(command.clone());
    }
}

/// A well-formed detection for `text` with a unit quad.
pub fn detection(text: &str) -> RawDetection {
    RawDetection {
        text: text.to_owned(),
        corners: vec![
            Point3::new(0.0, 1.0, 0.0),
            Point3::new(1.0, 1.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(0.0, 0.0, 0.0),
        ],
    }
}
