//! State labels.
//!
//! Machines are heterogeneous, so the coordinator tracks states as string
//! labels. The `State` trait lets call sites pass either plain strings or
//! typed enums generated by [`state_enum!`](crate::state_enum).

/// Anything that names a machine state.
///
/// Implemented for `str`, `String` and references to any `State`, so
/// `coordinator.transition("controls", "visible")` and
/// `coordinator.transition("controls", Visibility::Visible)` both work.
///
/// # Example
///
/// ```rust
/// use statecoord::core::State;
///
/// struct Phase(&'static str);
///
/// impl State for Phase {
///     fn name(&self) -> &str {
///         self.0
///     }
/// }
///
/// assert_eq!(Phase("loading").name(), "loading");
/// assert_eq!("loading".name(), "loading");
/// ```
pub trait State {
    /// The label this state is registered and compared under.
    fn name(&self) -> &str;
}

impl State for str {
    fn name(&self) -> &str {
        self
    }
}

impl State for String {
    fn name(&self) -> &str {
        self.as_str()
    }
}

impl<T: State + ?Sized> State for &T {
    fn name(&self) -> &str {
        (**self).name()
    }
}
