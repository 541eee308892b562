//! Core vocabulary shared by every machine.
//!
//! - State labels via the `State` trait
//! - Bounded transition history with the cause of each change

mod history;
mod state;

pub use history::{History, TransitionCause, TransitionRecord};
pub use state::State;
