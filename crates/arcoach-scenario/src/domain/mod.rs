//! Domain model: markers, commands, narration policy, and the session
//! state machine.

pub mod command;
pub mod marker;
pub mod narration;
pub mod session;
