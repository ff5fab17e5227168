//! Marker vocabulary and the recognizer boundary.
//!
//! The external recognizer delivers `(text, corners)` pairs, one per
//! recognized marker per frame, with duplicates across consecutive frames
//! while a marker stays in view. Label strings are resolved to the closed
//! [`MarkerLabel`] vocabulary exactly once, here at the boundary; the
//! state machine then matches exhaustively and never compares strings.

use arcoach_core::error::ScenarioError;
use arcoach_core::geometry::{CornerQuad, Point3};
use serde::{Deserialize, Serialize};

/// Semantic identity of a recognized marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MarkerLabel {
    /// The reference object the trainee must locate first.
    Reference,
    /// The tool that solves the task.
    CorrectTool,
    /// Wrong tool, first variant.
    WrongToolA,
    /// Wrong tool, second variant.
    WrongToolB,
}

impl MarkerLabel {
    /// Whether this label's effect fires at most once per session
    /// (subject to the reference re-arming exception).
    #[must_use]
    pub fn is_single_shot(self) -> bool {
        matches!(self, Self::Reference | Self::CorrectTool)
    }
}

/// Mapping from recognizer label strings to the marker vocabulary.
///
/// The defaults match the printed markers shipped with the training kit;
/// deployments with different prints override the strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelVocabulary {
    /// String printed on the reference-object marker.
    pub reference: String,
    /// String printed on the correct-tool marker.
    pub correct_tool: String,
    /// String printed on the first wrong-tool marker.
    pub wrong_tool_a: String,
    /// String printed on the second wrong-tool marker.
    pub wrong_tool_b: String,
}

impl Default for LabelVocabulary {
    fn default() -> Self {
        Self {
            reference: "Mocap".to_owned(),
            correct_tool: "Standard Wrench".to_owned(),
            wrong_tool_a: "Brake-fan gauge".to_owned(),
            wrong_tool_b: "Torque Wrench".to_owned(),
        }
    }
}

impl LabelVocabulary {
    /// Resolves a recognizer string to a marker label. Unknown strings
    /// resolve to `None`: the marker still gets an outline, but no
    /// scenario effect.
    #[must_use]
    pub fn resolve(&self, text: &str) -> Option<MarkerLabel> {
        if text == self.reference {
            Some(MarkerLabel::Reference)
        } else if text == self.correct_tool {
            Some(MarkerLabel::CorrectTool)
        } else if text == self.wrong_tool_a {
            Some(MarkerLabel::WrongToolA)
        } else if text == self.wrong_tool_b {
            Some(MarkerLabel::WrongToolB)
        } else {
            None
        }
    }
}

/// A detection exactly as the recognizer delivered it, before validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawDetection {
    /// Decoded marker text.
    pub text: String,
    /// Corner points; a well-formed detection has exactly four, ordered
    /// top-left, top-right, bottom-right, bottom-left.
    pub corners: Vec<Point3>,
}

/// A validated, resolved marker event — one recognized marker, one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerEvent {
    /// Resolved label, or `None` for an unrecognized marker.
    pub label: Option<MarkerLabel>,
    /// Raw recognizer text, kept for diagnostics.
    pub text: String,
    /// Ordered corner quad.
    pub corners: CornerQuad,
}

impl MarkerEvent {
    /// Validates and resolves a raw detection.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MalformedDetection`] when the corner
    /// count is not exactly four.
    pub fn from_raw(
        raw: RawDetection,
        vocabulary: &LabelVocabulary,
    ) -> Result<Self, ScenarioError> {
        let corners: [Point3; 4] = raw
            .corners
            .as_slice()
            .try_into()
            .map_err(|_| ScenarioError::MalformedDetection {
                got: raw.corners.len(),
            })?;
        Ok(Self {
            label: vocabulary.resolve(&raw.text),
            text: raw.text,
            corners: CornerQuad::new(corners),
        })
    }
}
