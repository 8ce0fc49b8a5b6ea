//! Session events.
//!
//! Every observable state change produces an [`Event`]; the CLI watches
//! them to know when the session is over, and tests assert on them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::phase::Phase;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A new phase's countdown began.
    PhaseStarted {
        phase: Phase,
        duration_secs: u64,
        at: DateTime<Utc>,
    },
    /// A phase change is waiting for user acknowledgment.
    AckRequested {
        phase: Phase,
        window_secs: u64,
        at: DateTime<Utc>,
    },
    /// The acknowledgment window was cleared, explicitly or by expiry.
    AckCleared { at: DateTime<Utc> },
    Paused {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    Resumed {
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    /// Remaining time was reset to the current phase's full duration.
    TimerReset { at: DateTime<Utc> },
    PhaseSkipped {
        from: Phase,
        to: Phase,
        at: DateTime<Utc>,
    },
    /// The session is over: the plan ran out or the user quit.
    SessionCompleted { at: DateTime<Utc> },
}
