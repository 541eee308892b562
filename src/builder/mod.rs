//! Builder API for ergonomic machine registration.
//!
//! This module provides a fluent builder and a macro for typed state labels,
//! so hosts rarely have to spell labels as raw strings.

pub mod error;
pub mod machine;
pub mod macros;

pub use error::BuildError;
pub use machine::MachineBuilder;

use crate::core::State;
use crate::table::TransitionRule;
use std::time::Duration;

/// Rules `a -> b` and `b -> a`, both without handlers or delays.
///
/// # Example
///
/// ```
/// use statecoord::builder::toggle;
///
/// let rules = toggle("unmuted", "muted");
/// assert_eq!(rules[0].from(), "unmuted");
/// assert_eq!(rules[1].from(), "muted");
/// ```
pub fn toggle(a: impl State, b: impl State) -> Vec<TransitionRule> {
    vec![
        TransitionRule::new(&a, &b),
        TransitionRule::new(&b, &a),
    ]
}

/// Rules for an affordance that appears on demand and hides itself again
/// after `linger` without activity.
///
/// # Example
///
/// ```
/// use statecoord::builder::auto_hide;
/// use std::time::Duration;
///
/// let rules = auto_hide("collapsed", "visible", Duration::from_millis(2500));
/// assert_eq!(rules[1].delay_duration(), Some(Duration::from_millis(2500)));
/// ```
pub fn auto_hide(hidden: impl State, shown: impl State, linger: Duration) -> Vec<TransitionRule> {
    vec![
        TransitionRule::new(&hidden, &shown),
        TransitionRule::new(&shown, &hidden).delay(linger),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn toggle_builds_both_directions() {
        let rules = toggle("collapsed", "visible");
        assert_eq!(rules.len(), 2);
        assert!(rules[0].matches("collapsed", "visible"));
        assert!(rules[1].matches("visible", "collapsed"));
        assert!(rules.iter().all(|r| r.delay_duration().is_none()));
    }

    #[test]
    fn auto_hide_delays_only_the_hide() {
        let rules = auto_hide("collapsed", "visible", Duration::from_secs(3));
        assert_eq!(rules[0].delay_duration(), None);
        assert_eq!(rules[1].delay_duration(), Some(Duration::from_secs(3)));
    }
}
