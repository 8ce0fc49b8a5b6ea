//! # Cadence Core Library
//!
//! Core logic for Cadence, a pomodoro-style interval timer. The library
//! is UI-free: the CLI crate renders state and feeds discrete events in.
//!
//! ## Architecture
//!
//! - **Phase sequencer**: pure successor function over work/break phases
//! - **Phase plan**: the fully-unrolled, append-only trace of the
//!   sequencer, with a cursor and per-entry completion flags
//! - **Session**: the event-driven state machine coordinating the phase
//!   countdown and the optional acknowledgment countdown
//! - **Settings**: the read-only configuration contract plus its
//!   TOML-backed implementation
//!
//! ## Key Components
//!
//! - [`Phase`] / [`PhaseKind`]: one timed interval and its kind
//! - [`PhasePlan`]: the pre-computed session plan
//! - [`Session`]: the interactive controller
//! - [`Config`]: file-backed settings

pub mod error;
pub mod events;
pub mod phase;
pub mod plan;
pub mod session;
pub mod settings;

pub use error::{ConfigError, CoreError, PlanError, Result};
pub use events::Event;
pub use phase::{Phase, PhaseKind};
pub use plan::{PhasePlan, PlanEntry};
pub use session::{KeyAction, Session, SessionEvent, SessionState, TimerId};
pub use settings::{Config, StubSettings, TimerSettings};
