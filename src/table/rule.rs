//! Transition rules and their side-effect handlers.

use crate::core::State;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Error a handler may return. Propagated unchanged to the caller of the
/// outermost `transition`.
pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

type HandlerFn = dyn Fn() -> Result<(), HandlerError> + Send + Sync;

/// Side effect run after a rule has been applied.
///
/// Handlers are plain closures; whatever they act on is captured, including
/// clones of the [`Coordinator`](crate::Coordinator) for re-entrant calls.
#[derive(Clone)]
pub struct Handler(Arc<HandlerFn>);

impl Handler {
    /// Wrap a fallible closure.
    pub fn new<F>(f: F) -> Self
    where
        F: Fn() -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    /// Wrap a closure that cannot fail.
    pub fn infallible<F>(f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self(Arc::new(move || {
            f();
            Ok(())
        }))
    }

    pub(crate) fn call(&self) -> Result<(), HandlerError> {
        (self.0)()
    }
}

impl fmt::Debug for Handler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Handler(..)")
    }
}

/// One allowed move of a machine: `from -> to`, with an optional handler and
/// an optional delay.
///
/// A rule with a delay is a two-step transition. Taking it moves the machine
/// to `to` immediately and arms a follow-up that leaves `to` again once the
/// delay has passed without further activity. A delayed rule is also the
/// "dwell" exit of its source state: entering `from` through an undelayed
/// rule arms this rule to fire after the delay.
///
/// # Example
///
/// ```rust
/// use statecoord::TransitionRule;
/// use std::time::Duration;
///
/// let show = TransitionRule::new("collapsed", "visible");
/// let hide = TransitionRule::new("visible", "collapsed")
///     .delay(Duration::from_millis(2500))
///     .handle(|| println!("hiding cursor"));
///
/// assert_eq!(show.from(), "collapsed");
/// assert_eq!(hide.delay_duration(), Some(Duration::from_millis(2500)));
/// assert!(hide.has_handler());
/// ```
#[derive(Clone, Debug)]
pub struct TransitionRule {
    pub(crate) from: String,
    pub(crate) to: String,
    pub(crate) handler: Option<Handler>,
    pub(crate) delay: Option<Duration>,
}

impl TransitionRule {
    pub fn new(from: impl State, to: impl State) -> Self {
        Self {
            from: from.name().to_string(),
            to: to.name().to_string(),
            handler: None,
            delay: None,
        }
    }

    /// Run `f` whenever this rule is applied.
    pub fn handle<F>(mut self, f: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.handler = Some(Handler::infallible(f));
        self
    }

    /// Run a fallible `f` whenever this rule is applied.
    pub fn try_handle<F>(mut self, f: F) -> Self
    where
        F: Fn() -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.handler = Some(Handler::new(f));
        self
    }

    /// Attach a pre-built handler.
    pub fn handler(mut self, handler: Handler) -> Self {
        self.handler = Some(handler);
        self
    }

    /// Make this a delayed rule. A zero delay is the same as none.
    pub fn delay(mut self, delay: Duration) -> Self {
        self.delay = (!delay.is_zero()).then_some(delay);
        self
    }

    pub fn from(&self) -> &str {
        &self.from
    }

    pub fn to(&self) -> &str {
        &self.to
    }

    pub fn delay_duration(&self) -> Option<Duration> {
        self.delay
    }

    pub fn has_handler(&self) -> bool {
        self.handler.is_some()
    }

    /// Whether this rule moves `current` to `target`.
    pub fn matches(&self, current: &str, target: &str) -> bool {
        self.from == current && self.to == target
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn new_rule_has_no_handler_or_delay() {
        let rule = TransitionRule::new("unmuted", "muted");
        assert_eq!(rule.from(), "unmuted");
        assert_eq!(rule.to(), "muted");
        assert!(!rule.has_handler());
        assert_eq!(rule.delay_duration(), None);
    }

    #[test]
    fn zero_delay_is_no_delay() {
        let rule = TransitionRule::new("a", "b").delay(Duration::ZERO);
        assert_eq!(rule.delay_duration(), None);
    }

    #[test]
    fn matches_checks_both_ends() {
        let rule = TransitionRule::new("collapsed", "visible");
        assert!(rule.matches("collapsed", "visible"));
        assert!(!rule.matches("visible", "visible"));
        assert!(!rule.matches("collapsed", "collapsed"));
    }

    #[test]
    fn infallible_handler_runs_and_succeeds() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let rule = TransitionRule::new("a", "b").handle(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        });

        let handler = rule.handler.expect("handler set");
        assert!(handler.call().is_ok());
        assert!(handler.call().is_ok());
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn fallible_handler_reports_its_error() {
        let rule = TransitionRule::new("a", "b").try_handle(|| Err("volume unavailable".into()));

        let err = rule.handler.expect("handler set").call().unwrap_err();
        assert_eq!(err.to_string(), "volume unavailable");
    }
}
