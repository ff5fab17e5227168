//! Session controller: couples the state machine to a surface.
//!
//! The controller is deliberately thin. It owns the session, a clock,
//! and the surface, marshals raw detections through the boundary, and
//! pushes every produced command at the surface in order. All scenario
//! policy lives in the session.

use arcoach_core::clock::Clock;
use arcoach_core::error::ScenarioError;

use crate::domain::marker::{MarkerEvent, RawDetection};
use crate::domain::session::ScenarioSession;

use super::surface::OrchestrationSurface;

/// Owns one scenario session and the surface realizing its commands.
pub struct SessionController<S: OrchestrationSurface> {
    session: ScenarioSession,
    surface: S,
    clock: Box<dyn Clock>,
}

impl<S: OrchestrationSurface> SessionController<S> {
    /// Wires a session to a surface. Call [`Self::restart`] to run the
    /// start sequence before feeding detections.
    pub fn new(session: ScenarioSession, surface: S, clock: Box<dyn Clock>) -> Self {
        Self {
            session,
            surface,
            clock,
        }
    }

    /// Restarts the scenario from the beginning: full state reset, scene
    /// teardown, logo splash. Used at startup and on the restart button.
    pub fn restart(&mut self) {
        let commands = self.session.reset(self.clock.now());
        self.surface.apply_all(&commands);
    }

    /// Validates one raw detection and runs it through the state
    /// machine.
    ///
    /// # Errors
    ///
    /// Returns [`ScenarioError::MalformedDetection`] for a detection
    /// without exactly four corners; no commands are produced for it.
    pub fn handle_detection(&mut self, raw: RawDetection) -> Result<(), ScenarioError> {
        let event = match MarkerEvent::from_raw(raw, self.session.vocabulary()) {
            Ok(event) => event,
            Err(error) => {
                tracing::warn!(%error, "dropping malformed detection");
                return Err(error);
            }
        };
        let commands = self.session.process(self.clock.now(), &event);
        self.surface.apply_all(&commands);
        Ok(())
    }

    /// Drains due delayed effects. Call once per frame.
    pub fn pump(&mut self) {
        let commands = self.session.tick(self.clock.now());
        self.surface.apply_all(&commands);
    }

    /// Acknowledgment that the surface toggled detection out of band.
    pub fn acknowledge_detection(&mut self, enabled: bool) {
        self.session.acknowledge_detection(enabled);
    }

    /// Try-again button: close the panel and resume scanning.
    pub fn try_again(&mut self) {
        let commands = self.session.try_again();
        self.surface.apply_all(&commands);
    }

    /// Ends the scenario with the completion sequence.
    pub fn complete_training(&mut self) {
        let commands = self.session.complete_training(self.clock.now());
        self.surface.apply_all(&commands);
    }

    /// Read access to the session (stage, display text, outline pose).
    #[must_use]
    pub fn session(&self) -> &ScenarioSession {
        &self.session
    }

    /// Read access to the surface.
    #[must_use]
    pub fn surface(&self) -> &S {
        &self.surface
    }

    /// Mutable access to the surface (test assertions, frame rendering).
    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }
}
