//! Arcoach Core — shared abstractions.
//!
//! This crate defines the primitives the scenario context depends on:
//! time, randomness, spatial math, delayed-effect scheduling, and the
//! error taxonomy. It contains no scenario logic.

pub mod clock;
pub mod error;
pub mod geometry;
pub mod rng;
pub mod scheduler;
