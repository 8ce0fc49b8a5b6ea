//! The phase plan: a fully-unrolled trace of the sequencer.
//!
//! The plan is built once at session start and never regenerated. Only
//! the cursor and the per-entry completion flags mutate afterwards;
//! entries are never reordered or removed.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, CoreError, PlanError};
use crate::phase::{Phase, PhaseKind};
use crate::settings::TimerSettings;

/// Ceiling on plan unrolling. Generous for any sane configuration; hit
/// only when the sequencer fails to terminate, which is a logic defect.
const MAX_PLAN_ENTRIES: usize = 100_000;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlanEntry {
    pub phase: Phase,
    pub completed: bool,
}

/// The ordered sequence of all phases for a session, plus a cursor.
///
/// An entry's `completed` flag is true exactly when the cursor has moved
/// past it. The last entry is always the single `Completed` sentinel.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PhasePlan {
    entries: Vec<PlanEntry>,
    cursor: usize,
}

impl PhasePlan {
    /// Unroll the sequencer from the initial phase until the terminal
    /// entry is produced (inclusive).
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` when `phases_per_cycle` or
    /// `total_cycles` is below 1, and `PlanError::InvariantViolation`
    /// when construction exceeds its iteration ceiling.
    pub fn build(settings: &impl TimerSettings) -> Result<Self, CoreError> {
        let phases_per_cycle = settings.phases_per_cycle();
        if phases_per_cycle < 1 {
            return Err(ConfigError::InvalidValue {
                key: "phases_per_cycle".into(),
                message: format!("must be at least 1, got {phases_per_cycle}"),
            }
            .into());
        }
        let total_cycles = settings.total_cycles();
        if total_cycles < 1 {
            return Err(ConfigError::InvalidValue {
                key: "total_cycles".into(),
                message: format!("must be at least 1, got {total_cycles}"),
            }
            .into());
        }

        let mut entries = vec![PlanEntry {
            phase: Phase::initial(),
            completed: false,
        }];

        loop {
            let previous = entries[entries.len() - 1].phase;
            let next = previous.successor(settings)?;
            entries.push(PlanEntry {
                phase: next,
                completed: false,
            });

            if next.kind == PhaseKind::Completed {
                break;
            }
            if entries.len() > MAX_PLAN_ENTRIES {
                return Err(PlanError::InvariantViolation(format!(
                    "plan construction exceeded {MAX_PLAN_ENTRIES} entries without terminating"
                ))
                .into());
            }
        }

        Ok(Self { entries, cursor: 0 })
    }

    /// The phase at the cursor. Never fails: the cursor is always in
    /// bounds.
    pub fn current(&self) -> Phase {
        self.entries[self.cursor].phase
    }

    /// Mark the current entry completed and move the cursor forward.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::OutOfRange`, without mutating anything, when
    /// the cursor already sits on the terminal entry. Callers must check
    /// `current().kind` before advancing again.
    pub fn advance(&mut self) -> Result<Phase, PlanError> {
        if self.cursor + 1 >= self.entries.len() {
            return Err(PlanError::OutOfRange {
                cursor: self.cursor,
                len: self.entries.len(),
            });
        }
        self.entries[self.cursor].completed = true;
        self.cursor += 1;
        Ok(self.current())
    }

    /// Whether the entry matching `phase` by position lies strictly
    /// before the cursor. Display-only helper for progress rendering.
    pub fn is_completed(&self, phase: Phase) -> bool {
        self.entries
            .iter()
            .position(|entry| {
                entry.phase.phase_index == phase.phase_index
                    && entry.phase.cycle_index == phase.cycle_index
            })
            .is_some_and(|i| i < self.cursor)
    }

    pub fn entries(&self) -> &[PlanEntry] {
        &self.entries
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
