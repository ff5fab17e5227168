//! Audio cue vocabulary and the play-once narration policy.
//!
//! Asset storage, clip choice, and playback belong to the presentation
//! side; the domain only decides *whether* a cue should sound. Most
//! narration plays once per session so the trainee is not re-lectured on
//! every duplicate scan; the wrong-answer sting is the exception and
//! replays on every wrong attempt.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Category of audio the surface can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AudioCue {
    /// Opening narration.
    Intro,
    /// Background music bed.
    BgMusic,
    /// Tool-selection instructions.
    ToolSelect,
    /// Narration for the reassembly stage.
    Reassembly,
    /// Narration for wrong tool, first variant.
    WrongAnswerA,
    /// Narration for wrong tool, second variant.
    WrongAnswerB,
    /// Narration for the correct tool.
    CorrectAnswer,
    /// Short sting for any wrong answer. Replays every time.
    WrongAnswerFx,
    /// Short sting for the correct answer.
    CorrectAnswerFx,
    /// Closing narration.
    Completion,
}

impl AudioCue {
    /// Whether the cue may sound again after it has already played this
    /// session.
    #[must_use]
    pub fn replays(self) -> bool {
        matches!(self, Self::WrongAnswerFx)
    }
}

/// Tracks which cues have sounded this session.
#[derive(Debug, Default)]
pub struct NarrationPolicy {
    played: HashSet<AudioCue>,
}

impl NarrationPolicy {
    /// Creates a policy with no cues played.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decides whether `cue` should sound now, recording it as played.
    /// Returns `false` for a repeat of a non-replayable cue.
    pub fn admit(&mut self, cue: AudioCue) -> bool {
        if cue.replays() {
            return true;
        }
        if self.played.contains(&cue) {
            tracing::debug!(?cue, "narration already played this session, skipping");
            return false;
        }
        self.played.insert(cue);
        true
    }

    /// Forgets all played cues. Part of session reset.
    pub fn reset(&mut self) {
        self.played.clear();
    }
}
