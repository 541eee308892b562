//! Property-based tests for the coordinator.
//!
//! These tests use proptest to drive a machine through random sequences of
//! requests, raw assignments, locks and clock movement, and check the
//! invariants that must hold after every step.

use proptest::prelude::*;
use statecoord::core::History;
use statecoord::timer::ManualScheduler;
use statecoord::{Coordinator, TransitionCause, TransitionRecord, TransitionRule};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

const LABELS: [&str; 3] = ["collapsed", "visible", "error"];

#[derive(Clone, Debug)]
enum Op {
    Transition(&'static str),
    SetState(&'static str),
    Lock(&'static str),
    Unlock,
    Advance(u64),
}

prop_compose! {
    fn arbitrary_label()(index in 0..LABELS.len()) -> &'static str {
        LABELS[index]
    }
}

fn arbitrary_target() -> impl Strategy<Value = &'static str> {
    prop_oneof![
        4 => arbitrary_label(),
        1 => Just("fullscreen"),
    ]
}

fn arbitrary_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        6 => arbitrary_target().prop_map(Op::Transition),
        1 => arbitrary_label().prop_map(Op::SetState),
        1 => arbitrary_label().prop_map(Op::Lock),
        1 => Just(Op::Unlock),
        3 => (0..400u64).prop_map(Op::Advance),
    ]
}

/// A loader-like machine where every rule counts its handler runs.
fn loader(calls: &Arc<AtomicUsize>) -> (Coordinator, Arc<ManualScheduler>) {
    let clock = Arc::new(ManualScheduler::new());
    let coordinator = Coordinator::new(clock.clone());

    let counted = |from: &str, to: &str| {
        let calls = Arc::clone(calls);
        TransitionRule::new(from, to).handle(move || {
            calls.fetch_add(1, Ordering::SeqCst);
        })
    };

    coordinator
        .register(
            "loader",
            vec![
                counted("collapsed", "visible"),
                counted("visible", "collapsed").delay(Duration::from_millis(250)),
                counted("visible", "error"),
                counted("error", "collapsed").delay(Duration::from_millis(100)),
            ],
            "collapsed",
        )
        .unwrap();

    (coordinator, clock)
}

fn apply(coordinator: &Coordinator, clock: &ManualScheduler, op: &Op) {
    match op {
        Op::Transition(target) => {
            coordinator.transition("loader", *target).unwrap();
        }
        Op::SetState(state) => coordinator.set_state("loader", *state).unwrap(),
        Op::Lock(state) => coordinator.lock("loader", *state).unwrap(),
        Op::Unlock => coordinator.unlock("loader").unwrap(),
        Op::Advance(ms) => {
            clock.advance(Duration::from_millis(*ms));
        }
    }
}

proptest! {
    #[test]
    fn state_is_always_a_known_label(ops in prop::collection::vec(arbitrary_op(), 1..40)) {
        let calls = Arc::new(AtomicUsize::new(0));
        let (coordinator, clock) = loader(&calls);
        let states = coordinator.states("loader").unwrap();

        for op in &ops {
            apply(&coordinator, &clock, op);
            let state = coordinator.get_state("loader").unwrap();
            prop_assert!(states.contains(&state), "{} after {:?}", state, op);
        }
    }

    #[test]
    fn unknown_targets_change_nothing(
        ops in prop::collection::vec(arbitrary_op(), 0..20)
    ) {
        let calls = Arc::new(AtomicUsize::new(0));
        let (coordinator, clock) = loader(&calls);
        for op in &ops {
            apply(&coordinator, &clock, op);
        }

        let before = coordinator.get_state("loader").unwrap();
        let handled = calls.load(Ordering::SeqCst);
        let pending = coordinator.pending_target("loader").unwrap();

        let outcome = coordinator.transition("loader", "fullscreen").unwrap();

        prop_assert!(outcome.is_absorbed());
        prop_assert_eq!(coordinator.get_state("loader").unwrap(), before);
        prop_assert_eq!(calls.load(Ordering::SeqCst), handled);
        prop_assert_eq!(coordinator.pending_target("loader").unwrap(), pending);
    }

    #[test]
    fn lock_pins_the_state(
        pinned in arbitrary_label(),
        requests in prop::collection::vec(arbitrary_target(), 0..20),
        waits in prop::collection::vec(0..1000u64, 0..5),
    ) {
        let calls = Arc::new(AtomicUsize::new(0));
        let (coordinator, clock) = loader(&calls);
        coordinator.transition("loader", "visible").unwrap();
        coordinator.lock("loader", pinned).unwrap();

        for target in requests {
            coordinator.transition("loader", target).unwrap();
            prop_assert_eq!(coordinator.get_state("loader").unwrap(), pinned);
        }
        for wait in waits {
            clock.advance(Duration::from_millis(wait));
            prop_assert_eq!(coordinator.get_state("loader").unwrap(), pinned);
        }
        prop_assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn history_chains_and_counts_handlers(ops in prop::collection::vec(arbitrary_op(), 1..40)) {
        let calls = Arc::new(AtomicUsize::new(0));
        let (coordinator, clock) = loader(&calls);
        for op in &ops {
            apply(&coordinator, &clock, op);
        }

        let records: Vec<TransitionRecord> = coordinator.history("loader").unwrap();
        for pair in records.windows(2) {
            prop_assert_eq!(&pair[0].to, &pair[1].from);
        }
        for record in &records {
            prop_assert_ne!(&record.from, &record.to);
        }
        if let Some(last) = records.last() {
            prop_assert_eq!(&last.to, &coordinator.get_state("loader").unwrap());
        }

        let handled = records
            .iter()
            .filter(|r| matches!(r.cause, TransitionCause::Requested | TransitionCause::Delayed))
            .count();
        prop_assert_eq!(calls.load(Ordering::SeqCst), handled);
    }

    #[test]
    fn at_most_one_timer_per_machine(ops in prop::collection::vec(arbitrary_op(), 1..40)) {
        let calls = Arc::new(AtomicUsize::new(0));
        let (coordinator, clock) = loader(&calls);
        for op in &ops {
            apply(&coordinator, &clock, op);
            prop_assert!(clock.pending() <= 1);
            prop_assert_eq!(
                clock.pending() == 1,
                coordinator.pending_target("loader").unwrap().is_some()
            );
        }
    }

    #[test]
    fn activity_always_restarts_the_dwell_exit(
        ops in prop::collection::vec(arbitrary_op(), 0..40)
    ) {
        let calls = Arc::new(AtomicUsize::new(0));
        let (coordinator, clock) = loader(&calls);
        for op in &ops {
            apply(&coordinator, &clock, op);
        }
        coordinator.unlock("loader").unwrap();

        // "visible" and "error" both have a delayed exit to "collapsed".
        let state = coordinator.get_state("loader").unwrap();
        prop_assume!(state != "collapsed");

        let outcome = coordinator.transition("loader", state.as_str()).unwrap();
        prop_assert!(!outcome.is_absorbed(), "{} stuck after {:?}", state, ops);
        clock.advance(Duration::from_millis(250));
        prop_assert_eq!(coordinator.get_state("loader").unwrap(), "collapsed");
    }

    #[test]
    fn history_respects_its_limit(limit in 0..8usize, count in 0..30usize) {
        let mut history = History::with_limit(limit);
        for i in 0..count {
            history.record(TransitionRecord {
                from: format!("s{}", i),
                to: format!("s{}", i + 1),
                cause: TransitionCause::Requested,
                at: chrono::Utc::now(),
            });
        }

        prop_assert_eq!(history.len(), count.min(limit));
        if let Some(last) = history.last() {
            prop_assert_eq!(last.to.clone(), format!("s{}", count));
        }
    }
}
