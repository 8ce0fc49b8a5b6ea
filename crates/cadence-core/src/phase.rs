//! Phases and the successor algorithm.
//!
//! A session is a fixed interleaving of work and break phases. Within a
//! cycle, work and break phases strictly alternate; the break adjacent to
//! the cycle boundary is the long one, every earlier break is short.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::PlanError;
use crate::settings::TimerSettings;

/// The kind of a phase. `Completed` is a terminal sentinel, not a timed
/// phase -- it marks the end of a plan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PhaseKind {
    Work,
    ShortBreak,
    LongBreak,
    Completed,
}

impl PhaseKind {
    pub fn emoji(&self) -> &'static str {
        match self {
            PhaseKind::Work => "💻",
            PhaseKind::ShortBreak => "☕",
            PhaseKind::LongBreak => "🍔",
            PhaseKind::Completed => "🎉",
        }
    }

    pub fn is_break(&self) -> bool {
        matches!(self, PhaseKind::ShortBreak | PhaseKind::LongBreak)
    }
}

impl fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            PhaseKind::Work => "Work",
            PhaseKind::ShortBreak => "Short break",
            PhaseKind::LongBreak => "Long break",
            PhaseKind::Completed => "Complete",
        };
        f.write_str(label)
    }
}

/// One timed interval of a session.
///
/// `phase_index` is the position within the current cycle (reset to 0
/// when a new cycle starts); `cycle_index` counts cycles from 0. The
/// duration is not stored here -- it is derived from the kind and the
/// settings on demand.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Phase {
    pub kind: PhaseKind,
    pub phase_index: usize,
    pub cycle_index: usize,
}

impl Phase {
    /// Every session starts with a work phase at (0, 0).
    pub fn initial() -> Self {
        Self {
            kind: PhaseKind::Work,
            phase_index: 0,
            cycle_index: 0,
        }
    }

    pub fn duration(&self, settings: &impl TimerSettings) -> Duration {
        match self.kind {
            PhaseKind::Work => settings.work_duration(),
            PhaseKind::ShortBreak => settings.short_break_duration(),
            PhaseKind::LongBreak => settings.long_break_duration(),
            PhaseKind::Completed => Duration::ZERO,
        }
    }

    /// Compute the unique phase that follows this one.
    ///
    /// # Errors
    ///
    /// Returns `PlanError::InvariantViolation` when called on a
    /// `Completed` phase; the sequencer must never be asked for a
    /// successor of the terminal marker.
    pub fn successor(&self, settings: &impl TimerSettings) -> Result<Phase, PlanError> {
        let next_index = self.phase_index + 1;

        if next_index >= settings.phases_per_cycle() {
            // Cycle exhausted: either the whole session is done, or a
            // fresh cycle begins with work.
            if self.cycle_index + 1 >= settings.total_cycles() {
                return Ok(Phase {
                    kind: PhaseKind::Completed,
                    phase_index: next_index,
                    cycle_index: self.cycle_index,
                });
            }
            return Ok(Phase {
                kind: PhaseKind::Work,
                phase_index: 0,
                cycle_index: self.cycle_index + 1,
            });
        }

        match self.kind {
            // After work comes a break; the one filling the last slot of
            // the cycle is long, all earlier ones are short.
            PhaseKind::Work => {
                let kind = if next_index >= settings.phases_per_cycle() - 1 {
                    PhaseKind::LongBreak
                } else {
                    PhaseKind::ShortBreak
                };
                Ok(Phase {
                    kind,
                    phase_index: next_index,
                    cycle_index: self.cycle_index,
                })
            }

            // After any break comes work.
            PhaseKind::ShortBreak | PhaseKind::LongBreak => Ok(Phase {
                kind: PhaseKind::Work,
                phase_index: next_index,
                cycle_index: self.cycle_index,
            }),

            PhaseKind::Completed => Err(PlanError::InvariantViolation(
                "successor requested for the terminal phase".into(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::StubSettings;

    fn settings(phases: usize, cycles: usize) -> StubSettings {
        StubSettings {
            phases_per_cycle: phases,
            total_cycles: cycles,
            ..StubSettings::default()
        }
    }

    #[test]
    fn initial_phase_is_work_at_origin() {
        let phase = Phase::initial();
        assert_eq!(phase.kind, PhaseKind::Work);
        assert_eq!(phase.phase_index, 0);
        assert_eq!(phase.cycle_index, 0);
    }

    #[test]
    fn work_is_followed_by_short_break_mid_cycle() {
        let next = Phase::initial().successor(&settings(4, 1)).unwrap();
        assert_eq!(next.kind, PhaseKind::ShortBreak);
        assert_eq!(next.phase_index, 1);
        assert_eq!(next.cycle_index, 0);
    }

    #[test]
    fn last_break_of_cycle_is_long() {
        // With two slots per cycle the sole break fills the last slot.
        let next = Phase::initial().successor(&settings(2, 1)).unwrap();
        assert_eq!(next.kind, PhaseKind::LongBreak);
    }

    #[test]
    fn break_is_followed_by_work() {
        let brk = Phase {
            kind: PhaseKind::ShortBreak,
            phase_index: 1,
            cycle_index: 0,
        };
        let next = brk.successor(&settings(4, 1)).unwrap();
        assert_eq!(next.kind, PhaseKind::Work);
        assert_eq!(next.phase_index, 2);
    }

    #[test]
    fn new_cycle_starts_with_work_at_index_zero() {
        let last = Phase {
            kind: PhaseKind::LongBreak,
            phase_index: 1,
            cycle_index: 0,
        };
        let next = last.successor(&settings(2, 2)).unwrap();
        assert_eq!(next.kind, PhaseKind::Work);
        assert_eq!(next.phase_index, 0);
        assert_eq!(next.cycle_index, 1);
    }

    #[test]
    fn final_cycle_ends_with_completed() {
        let last = Phase {
            kind: PhaseKind::LongBreak,
            phase_index: 1,
            cycle_index: 0,
        };
        let next = last.successor(&settings(2, 1)).unwrap();
        assert_eq!(next.kind, PhaseKind::Completed);
        assert_eq!(next.cycle_index, 0);
    }

    #[test]
    fn successor_of_completed_is_an_error() {
        let terminal = Phase {
            kind: PhaseKind::Completed,
            phase_index: 2,
            cycle_index: 0,
        };
        assert!(terminal.successor(&settings(4, 1)).is_err());
    }

    #[test]
    fn duration_is_derived_from_kind() {
        let cfg = StubSettings::default();
        assert_eq!(Phase::initial().duration(&cfg), cfg.work);
        let terminal = Phase {
            kind: PhaseKind::Completed,
            phase_index: 8,
            cycle_index: 0,
        };
        assert_eq!(terminal.duration(&cfg), Duration::ZERO);
    }
}
