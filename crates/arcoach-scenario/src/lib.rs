//! Arcoach — marker-driven training scenario context.
//!
//! Consumes recognized-marker events from an external vision pipeline and
//! drives a linear tool-selection training sequence: detect the reference
//! object, detect a tool, judge correctness, branch into success or retry
//! paths. Emits ordered presentation commands; owns no rendering, audio
//! playback, or capture concerns.

pub mod application;
pub mod domain;
