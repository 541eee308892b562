//! Statecoord: a coordinator for reactive UI/runtime state
//!
//! Statecoord keeps a registry of independently named finite state machines.
//! Event producers (pointer movement, playback callbacks, clicks) only ever ask
//! for a named machine to move to a state; the coordinator validates the
//! request against the machine's transition table, runs side-effect handlers,
//! debounces delayed transitions and honours override locks.
//!
//! # Core Concepts
//!
//! - **Transition table**: the immutable allowed moves of one machine
//! - **Delayed rule**: a move followed by an automatic move back once the
//!   machine has been quiet for a while; renewed activity pushes it back
//! - **Lock**: pins a machine to one state and absorbs transition requests
//! - **Raw assignment**: `set_state` reconciles state without running handlers
//! - **Scheduler**: where delayed moves run (Tokio, or a virtual clock)
//!
//! # Example
//!
//! ```rust
//! use statecoord::timer::ManualScheduler;
//! use statecoord::{Coordinator, TransitionRule};
//! use std::sync::Arc;
//!
//! let coordinator = Coordinator::new(Arc::new(ManualScheduler::new()));
//! coordinator
//!     .register(
//!         "player-muted",
//!         vec![
//!             TransitionRule::new("unmuted", "muted"),
//!             TransitionRule::new("muted", "unmuted"),
//!         ],
//!         "unmuted",
//!     )
//!     .unwrap();
//!
//! coordinator.lock("player-muted", "muted").unwrap();
//! assert!(coordinator.transition("player-muted", "unmuted").unwrap().is_absorbed());
//! assert_eq!(coordinator.get_state("player-muted").unwrap(), "muted");
//!
//! coordinator.unlock("player-muted").unwrap();
//! coordinator.transition("player-muted", "unmuted").unwrap();
//! assert_eq!(coordinator.get_state("player-muted").unwrap(), "unmuted");
//! ```

pub mod builder;
pub mod coordinator;
pub mod core;
pub mod table;
pub mod timer;

mod sync;

// Re-export commonly used types
pub use builder::{BuildError, MachineBuilder};
pub use coordinator::{
    Coordinator, CoordinatorConfig, CoordinatorError, MachineSnapshot, TransitionOutcome,
};
pub use crate::core::{State, TransitionCause, TransitionRecord};
pub use table::{Handler, HandlerError, TransitionRule, TransitionTable};
pub use timer::{ManualScheduler, Scheduler, TokioScheduler};
