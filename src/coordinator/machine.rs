//! The mutable record behind one registered machine.

use super::snapshot::{MachineSnapshot, PendingSnapshot};
use crate::core::{History, TransitionCause, TransitionRecord};
use crate::table::{Arm, TransitionTable};
use crate::timer::TimerSlot;
use chrono::Utc;
use std::collections::BTreeSet;

pub(crate) struct Machine {
    pub name: String,
    pub table: TransitionTable,
    pub initial: String,
    pub current: String,
    pub locked: bool,
    /// Follow-up armed by the last validated entry; re-armed on refresh.
    pub armed: Option<Arm>,
    pub timer: TimerSlot,
    pub history: History,
}

impl Machine {
    pub fn new(name: String, table: TransitionTable, initial: &str, history_limit: usize) -> Self {
        Self {
            name,
            table,
            initial: initial.to_string(),
            current: initial.to_string(),
            locked: false,
            armed: None,
            timer: TimerSlot::default(),
            history: History::with_limit(history_limit),
        }
    }

    /// Whether `label` is a table label or the initial state.
    pub fn is_valid_state(&self, label: &str) -> bool {
        label == self.initial || self.table.contains_state(label)
    }

    /// Follow-up a request for the current state pushes back: the one armed
    /// by the last validated entry, else the state's own delayed exit. The
    /// latter covers states reached by assignment, lock or a fired timer.
    pub fn refresh_arm(&self) -> Option<Arm> {
        self.armed.or_else(|| self.table.dwell(&self.current))
    }

    pub fn states(&self) -> Vec<String> {
        let mut states = self.table.states();
        states.insert(self.initial.as_str());
        states.into_iter().map(str::to_string).collect()
    }

    /// Record a change of state. Assignments to the state already held are
    /// not changes and are skipped.
    pub fn record(&mut self, from: &str, to: &str, cause: TransitionCause) {
        if from == to {
            return;
        }
        self.history.record(TransitionRecord {
            from: from.to_string(),
            to: to.to_string(),
            cause,
            at: Utc::now(),
        });
    }

    pub fn snapshot(&self) -> MachineSnapshot {
        MachineSnapshot {
            name: self.name.clone(),
            state: self.current.clone(),
            initial: self.initial.clone(),
            locked: self.locked,
            states: self.states(),
            pending: self.timer.pending().map(|p| PendingSnapshot {
                target: p.target.clone(),
                delay_ms: u64::try_from(p.delay.as_millis()).unwrap_or(u64::MAX),
            }),
            taken_at: Utc::now(),
        }
    }
}
