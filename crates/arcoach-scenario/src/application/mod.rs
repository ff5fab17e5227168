//! Application layer: the presentation seam and the session controller.

pub mod controller;
pub mod surface;
