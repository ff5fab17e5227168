//! The orchestration surface port.

use crate::domain::command::Command;

/// The presentation layer as the engine sees it: something that applies
/// commands, in order, one at a time.
///
/// Implementations must be idempotent-safe — reapplying a command that
/// matches current state (e.g. showing an already-visible overlay) is a
/// no-op, never an error. The surface never mutates scenario state; it
/// only realizes what it is told.
pub trait OrchestrationSurface {
    /// Applies one command.
    fn apply(&mut self, command: &Command);

    /// Applies a batch in order.
    fn apply_all(&mut self, commands: &[Command]) {
        for command in commands {
            self.apply(command);
        }
    }
}
