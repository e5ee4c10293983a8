//! Dialogue controller
//!
//! Owns the conversation state and turns utterances into prompts. Plain text
//! in, plain text and events out; speech capture and synthesis live in
//! [`crate::voice`].

mod controller;
mod intent;
pub mod prompts;
mod scheduler;

pub use controller::{DialogueController, DialogueSnapshot, DialogueState, TurnOutcome};
pub use intent::Intent;
pub use scheduler::TaskScope;
