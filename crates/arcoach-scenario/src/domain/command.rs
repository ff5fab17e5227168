//! Presentation commands.
//!
//! The state machine's only output channel: a short ordered list of
//! commands per input event, consumed by the orchestration surface. Every
//! command is idempotent-safe to reapply (setting visibility to its
//! current value is a no-op on the surface side).

use arcoach_core::geometry::Pose;
use serde::{Deserialize, Serialize};

use super::narration::AudioCue;

/// A toggleable presentation element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OverlayId {
    /// Scene prop shown over the reference object.
    ReferenceProp,
    /// Scene prop shown at the reassembly anchor.
    ReassemblyProp,
    /// Instructional panel.
    Panel,
    /// Camera viewfinder frame.
    Viewfinder,
    /// Splash logo shown while a session (re)starts.
    Logo,
    /// Button: restart the whole scenario.
    RestartButton,
    /// Button: retry after a wrong answer.
    TryAgainButton,
    /// Button: acknowledge and continue.
    OkButton,
}

/// A placeable/destroyable scene prop.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropId {
    /// Prop shown over the reference object.
    ReferenceProp,
    /// Prop instantiated at the reassembly anchor.
    ReassemblyProp,
}

/// One instruction to the orchestration surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Command {
    /// Show or hide a presentation element.
    SetOverlayVisible(OverlayId, bool),
    /// Switch marker detection on or off.
    SetDetectionEnabled(bool),
    /// Play the audio registered for a cue.
    PlayAudio(AudioCue),
    /// Replace the instructional panel text.
    SetInstructionText(String),
    /// Place a prop at a world pose.
    PlaceProp(PropId, Pose),
    /// Tear down an instantiated prop.
    DestroyProp(PropId),
}

/// Instructional panel texts, one per scenario beat.
pub mod instructions {
    /// Start-of-session prompt.
    pub const WELCOME: &str = "Scan the marker on the brake mock-up to begin training";

    /// Shown after the reference object is detected.
    pub const TOOL_SELECT: &str = "Three tools are in front of you: a standard wrench, \
         a torque wrench, and a brake-fan gauge. Only one of them removes the caliper \
         bolt from the rear brake mock-up. Pick up the correct tool and scan it.";

    /// Shown when the correct tool is scanned.
    pub const CORRECT: &str = "Correct tool. Press OK to continue.";

    /// Shown when the brake-fan gauge is scanned.
    pub const WRONG_A: &str = "You selected the brake-fan gauge. That tool measures \
         pad thickness; it does not remove the caliper bolt. Try again.";

    /// Shown when the torque wrench is scanned.
    pub const WRONG_B: &str = "You selected the torque wrench. That tool is for \
         reassembly, not for removing the caliper bolt. Try again.";

    /// Shown when the reference is scanned a second time, after the tool
    /// task is solved.
    pub const REASSEMBLY: &str = "Reassembly view placed. Follow the overlay to \
         refit the caliper.";

    /// End-of-scenario text.
    pub const COMPLETE: &str = "Congratulations! You have completed this mixed \
         reality training scenario.";
}
