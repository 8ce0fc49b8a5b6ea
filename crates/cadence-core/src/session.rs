//! The interactive session controller.
//!
//! A single-writer state machine: the driving loop delivers one discrete
//! event at a time (countdown tick, countdown timeout, key press) and
//! every transition happens inside that delivery. The controller owns
//! the phase plan, the primary phase countdown and, while a phase change
//! awaits acknowledgment, a second independent countdown. The two
//! countdowns carry distinct [`TimerId`]s so their events can never be
//! routed to the wrong one.

use std::time::Duration;

use chrono::Utc;

use crate::error::CoreError;
use crate::events::Event;
use crate::phase::{Phase, PhaseKind};
use crate::plan::PhasePlan;
use crate::settings::TimerSettings;

/// Tick interval of the primary phase countdown.
pub const PHASE_TICK: Duration = Duration::from_secs(1);
/// Tick interval of the acknowledgment countdown; doubles as the blink
/// cadence of the attention cue.
pub const ACK_TICK: Duration = Duration::from_millis(500);

/// Identity tags for the two concurrent countdowns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerId {
    Phase,
    Ack,
}

/// Named key actions, mapped 1:1 to transitions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    TogglePause,
    Acknowledge,
    Reset,
    Skip,
    Quit,
}

/// One discrete input to the state machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    Tick(TimerId),
    Timeout(TimerId),
    Key(KeyAction),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Running,
    Paused,
    AwaitingAcknowledgment,
    Completed,
}

/// A countdown with an identity tag. Decremented one interval per tick
/// by the driving loop; drained means the owning timer timed out.
#[derive(Debug, Clone)]
struct Countdown {
    id: TimerId,
    remaining: Duration,
    interval: Duration,
}

impl Countdown {
    fn new(id: TimerId, remaining: Duration, interval: Duration) -> Self {
        Self {
            id,
            remaining,
            interval,
        }
    }

    /// Decrement by one interval; true when drained.
    fn tick(&mut self) -> bool {
        self.remaining = self.remaining.saturating_sub(self.interval);
        self.remaining.is_zero()
    }

    fn reset_to(&mut self, remaining: Duration) {
        self.remaining = remaining;
    }
}

#[derive(Debug, Clone)]
struct AckWindow {
    timer: Countdown,
    blink: bool,
}

/// The live session: plan, primary countdown, optional acknowledgment
/// window and the quitting flag.
#[derive(Debug)]
pub struct Session<S: TimerSettings> {
    settings: S,
    plan: PhasePlan,
    phase_timer: Countdown,
    paused: bool,
    ack: Option<AckWindow>,
    quitting: bool,
}

impl<S: TimerSettings> Session<S> {
    /// Build the plan and bind the primary countdown to its first phase.
    ///
    /// # Errors
    ///
    /// Fails when the settings cannot produce a valid plan.
    pub fn new(settings: S) -> Result<Self, CoreError> {
        let plan = PhasePlan::build(&settings)?;
        let first = plan.current();
        let phase_timer = Countdown::new(TimerId::Phase, first.duration(&settings), PHASE_TICK);
        Ok(Self {
            settings,
            plan,
            phase_timer,
            paused: false,
            ack: None,
            quitting: false,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> SessionState {
        if self.quitting {
            SessionState::Completed
        } else if self.ack.is_some() {
            SessionState::AwaitingAcknowledgment
        } else if self.paused {
            SessionState::Paused
        } else {
            SessionState::Running
        }
    }

    pub fn current_phase(&self) -> Phase {
        self.plan.current()
    }

    /// Remaining time on the primary countdown.
    pub fn remaining(&self) -> Duration {
        self.phase_timer.remaining
    }

    pub fn paused(&self) -> bool {
        self.paused
    }

    pub fn quitting(&self) -> bool {
        self.quitting
    }

    /// Whether the session finished its whole plan (as opposed to being
    /// quit early).
    pub fn finished(&self) -> bool {
        self.plan.current().kind == PhaseKind::Completed
    }

    pub fn ack_required(&self) -> bool {
        self.ack.is_some()
    }

    /// Remaining time on the acknowledgment countdown, while one is open.
    pub fn ack_remaining(&self) -> Option<Duration> {
        self.ack.as_ref().map(|a| a.timer.remaining)
    }

    /// Visual attention cue, toggled on every acknowledgment tick.
    pub fn blink(&self) -> bool {
        self.ack.as_ref().is_some_and(|a| a.blink)
    }

    pub fn plan(&self) -> &PhasePlan {
        &self.plan
    }

    pub fn settings(&self) -> &S {
        &self.settings
    }

    // ── Action predicates ────────────────────────────────────────────
    // Stateless views of which keys are meaningful right now; the help
    // line is derived from these on every render.

    pub fn can_toggle_pause(&self) -> bool {
        self.ack.is_none() && !self.quitting
    }

    pub fn can_acknowledge(&self) -> bool {
        self.ack.is_some()
    }

    pub fn can_reset(&self) -> bool {
        !self.quitting
    }

    pub fn can_skip(&self) -> bool {
        !self.quitting
    }

    // ── Transitions ──────────────────────────────────────────────────

    /// Apply one event. Returns the observable event produced by the
    /// transition, if any. Once the quitting flag is set, all further
    /// events are ignored.
    ///
    /// # Errors
    ///
    /// Surfaces plan contract violations; in correct usage these are
    /// unreachable.
    pub fn apply(&mut self, event: SessionEvent) -> Result<Option<Event>, CoreError> {
        if self.quitting {
            return Ok(None);
        }

        match event {
            SessionEvent::Tick(TimerId::Phase) => {
                if self.paused {
                    return Ok(None);
                }
                if self.phase_timer.tick() {
                    let id = self.phase_timer.id;
                    return self.apply(SessionEvent::Timeout(id));
                }
                Ok(None)
            }

            SessionEvent::Tick(TimerId::Ack) => {
                let Some(ack) = self.ack.as_mut() else {
                    return Ok(None);
                };
                ack.blink = !ack.blink;
                let drained = ack.timer.tick();
                let id = ack.timer.id;
                if drained {
                    return self.apply(SessionEvent::Timeout(id));
                }
                Ok(None)
            }

            SessionEvent::Timeout(TimerId::Phase) => self.on_phase_timeout(),

            // Expiry counts as implicit acknowledgment.
            SessionEvent::Timeout(TimerId::Ack) => Ok(self.clear_ack()),

            SessionEvent::Key(action) => self.on_key(action),
        }
    }

    fn on_phase_timeout(&mut self) -> Result<Option<Event>, CoreError> {
        // A timeout landing with the plan already on its terminal entry
        // must end the session without another advance.
        if self.plan.current().kind == PhaseKind::Completed {
            return Ok(Some(self.end_session()));
        }

        let next = self.plan.advance()?;
        if next.kind == PhaseKind::Completed {
            return Ok(Some(self.end_session()));
        }

        self.phase_timer = Countdown::new(TimerId::Phase, next.duration(&self.settings), PHASE_TICK);

        if let Some(window) = self.settings.acknowledgment_window() {
            self.ack = Some(AckWindow {
                timer: Countdown::new(TimerId::Ack, window, ACK_TICK),
                blink: true,
            });
            return Ok(Some(Event::AckRequested {
                phase: next,
                window_secs: window.as_secs(),
                at: Utc::now(),
            }));
        }

        Ok(Some(Event::PhaseStarted {
            phase: next,
            duration_secs: next.duration(&self.settings).as_secs(),
            at: Utc::now(),
        }))
    }

    fn on_key(&mut self, action: KeyAction) -> Result<Option<Event>, CoreError> {
        match action {
            KeyAction::Quit => Ok(Some(self.end_session())),

            KeyAction::TogglePause => {
                if !self.can_toggle_pause() {
                    return Ok(None);
                }
                self.paused = !self.paused;
                let remaining_secs = self.phase_timer.remaining.as_secs();
                let at = Utc::now();
                Ok(Some(if self.paused {
                    Event::Paused { remaining_secs, at }
                } else {
                    Event::Resumed { remaining_secs, at }
                }))
            }

            KeyAction::Reset => {
                // Only the displayed remaining time; the cursor stays.
                self.phase_timer
                    .reset_to(self.plan.current().duration(&self.settings));
                Ok(Some(Event::TimerReset { at: Utc::now() }))
            }

            // An explicit skip needs no confirmation, so it never opens
            // an acknowledgment window.
            KeyAction::Skip => {
                let from = self.plan.current();
                if from.kind == PhaseKind::Completed {
                    return Ok(Some(self.end_session()));
                }
                let to = self.plan.advance()?;
                self.ack = None;
                self.paused = false;
                if to.kind == PhaseKind::Completed {
                    return Ok(Some(self.end_session()));
                }
                self.phase_timer =
                    Countdown::new(TimerId::Phase, to.duration(&self.settings), PHASE_TICK);
                Ok(Some(Event::PhaseSkipped {
                    from,
                    to,
                    at: Utc::now(),
                }))
            }

            KeyAction::Acknowledge => Ok(self.clear_ack()),
        }
    }

    fn clear_ack(&mut self) -> Option<Event> {
        self.ack.take().map(|_| Event::AckCleared { at: Utc::now() })
    }

    fn end_session(&mut self) -> Event {
        self.quitting = true;
        Event::SessionCompleted { at: Utc::now() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::StubSettings;

    /// Two-second phases so that two ticks exhaust each one.
    fn quick_settings(ack: Option<Duration>) -> StubSettings {
        StubSettings {
            work: Duration::from_secs(2),
            short_break: Duration::from_secs(2),
            long_break: Duration::from_secs(2),
            phases_per_cycle: 4,
            total_cycles: 1,
            acknowledgment: ack,
        }
    }

    fn session(ack: Option<Duration>) -> Session<StubSettings> {
        Session::new(quick_settings(ack)).unwrap()
    }

    fn tick_phase(s: &mut Session<StubSettings>) -> Option<Event> {
        s.apply(SessionEvent::Tick(TimerId::Phase)).unwrap()
    }

    fn tick_ack(s: &mut Session<StubSettings>) -> Option<Event> {
        s.apply(SessionEvent::Tick(TimerId::Ack)).unwrap()
    }

    fn key(s: &mut Session<StubSettings>, action: KeyAction) -> Option<Event> {
        s.apply(SessionEvent::Key(action)).unwrap()
    }

    #[test]
    fn starts_running_on_the_first_work_phase() {
        let s = session(None);
        assert_eq!(s.state(), SessionState::Running);
        assert_eq!(s.current_phase().kind, PhaseKind::Work);
        assert_eq!(s.remaining(), Duration::from_secs(2));
    }

    #[test]
    fn phase_tick_decrements_remaining_time() {
        let mut s = session(None);
        tick_phase(&mut s);
        assert_eq!(s.remaining(), Duration::from_secs(1));
        assert_eq!(s.state(), SessionState::Running);
    }

    #[test]
    fn timeout_without_acknowledgment_starts_the_next_phase() {
        let mut s = session(None);
        tick_phase(&mut s);
        let event = tick_phase(&mut s);
        assert!(matches!(event, Some(Event::PhaseStarted { .. })));
        assert_eq!(s.state(), SessionState::Running);
        assert_eq!(s.current_phase().kind, PhaseKind::ShortBreak);
        assert_eq!(s.remaining(), Duration::from_secs(2));
    }

    #[test]
    fn timeout_with_acknowledgment_awaits_the_user() {
        let mut s = session(Some(Duration::from_secs(1)));
        tick_phase(&mut s);
        let event = tick_phase(&mut s);
        assert!(matches!(event, Some(Event::AckRequested { .. })));
        assert_eq!(s.state(), SessionState::AwaitingAcknowledgment);
        // The new phase's countdown is already bound.
        assert_eq!(s.current_phase().kind, PhaseKind::ShortBreak);
    }

    #[test]
    fn acknowledge_key_returns_to_running() {
        let mut s = session(Some(Duration::from_secs(1)));
        tick_phase(&mut s);
        tick_phase(&mut s);
        let event = key(&mut s, KeyAction::Acknowledge);
        assert!(matches!(event, Some(Event::AckCleared { .. })));
        assert_eq!(s.state(), SessionState::Running);
        assert!(!s.ack_required());
    }

    #[test]
    fn acknowledgment_expiry_is_an_implicit_acknowledge() {
        let mut s = session(Some(Duration::from_secs(1)));
        tick_phase(&mut s);
        tick_phase(&mut s);
        // 1 s window at a 500 ms tick: drained on the second tick.
        assert!(tick_ack(&mut s).is_none());
        let event = tick_ack(&mut s);
        assert!(matches!(event, Some(Event::AckCleared { .. })));
        assert_eq!(s.state(), SessionState::Running);
    }

    #[test]
    fn acknowledgment_ticks_toggle_the_blink_cue() {
        let mut s = session(Some(Duration::from_secs(5)));
        tick_phase(&mut s);
        tick_phase(&mut s);
        assert!(s.blink());
        tick_ack(&mut s);
        assert!(!s.blink());
        tick_ack(&mut s);
        assert!(s.blink());
    }

    #[test]
    fn ack_tick_is_a_noop_without_an_open_window() {
        let mut s = session(None);
        assert!(tick_ack(&mut s).is_none());
        assert_eq!(s.remaining(), Duration::from_secs(2));
        assert_eq!(s.state(), SessionState::Running);
    }

    #[test]
    fn ack_tick_never_touches_the_phase_countdown() {
        let mut s = session(Some(Duration::from_secs(5)));
        tick_phase(&mut s);
        tick_phase(&mut s);
        let before = s.remaining();
        tick_ack(&mut s);
        assert_eq!(s.remaining(), before);
    }

    #[test]
    fn skip_bypasses_acknowledgment() {
        let mut s = session(Some(Duration::from_secs(5)));
        let event = key(&mut s, KeyAction::Skip);
        assert!(matches!(event, Some(Event::PhaseSkipped { .. })));
        assert_eq!(s.state(), SessionState::Running);
        assert!(!s.ack_required());
        assert_eq!(s.current_phase().kind, PhaseKind::ShortBreak);
    }

    #[test]
    fn skip_clears_a_pending_acknowledgment() {
        let mut s = session(Some(Duration::from_secs(5)));
        tick_phase(&mut s);
        tick_phase(&mut s);
        assert_eq!(s.state(), SessionState::AwaitingAcknowledgment);
        key(&mut s, KeyAction::Skip);
        assert_eq!(s.state(), SessionState::Running);
        assert!(!s.ack_required());
    }

    #[test]
    fn skipping_into_the_terminal_entry_ends_the_session() {
        let mut s = session(None);
        // Work, ShortBreak, Work, LongBreak, then Completed.
        for _ in 0..3 {
            key(&mut s, KeyAction::Skip);
            assert_eq!(s.state(), SessionState::Running);
        }
        let event = key(&mut s, KeyAction::Skip);
        assert!(matches!(event, Some(Event::SessionCompleted { .. })));
        assert_eq!(s.state(), SessionState::Completed);
        assert!(s.finished());
    }

    #[test]
    fn final_timeout_ends_the_session() {
        let mut s = session(None);
        for _ in 0..3 {
            key(&mut s, KeyAction::Skip);
        }
        assert_eq!(s.current_phase().kind, PhaseKind::LongBreak);
        tick_phase(&mut s);
        let event = tick_phase(&mut s);
        assert!(matches!(event, Some(Event::SessionCompleted { .. })));
        assert!(s.quitting());
        assert!(s.finished());
    }

    #[test]
    fn events_after_completion_are_ignored() {
        let mut s = session(None);
        key(&mut s, KeyAction::Quit);
        assert_eq!(s.state(), SessionState::Completed);
        // No OutOfRange, no state change; the quit flag gates everything.
        assert!(s
            .apply(SessionEvent::Timeout(TimerId::Phase))
            .unwrap()
            .is_none());
        assert!(key(&mut s, KeyAction::Skip).is_none());
        assert_eq!(s.state(), SessionState::Completed);
    }

    #[test]
    fn pause_and_resume_toggle() {
        let mut s = session(None);
        let event = key(&mut s, KeyAction::TogglePause);
        assert!(matches!(event, Some(Event::Paused { .. })));
        assert_eq!(s.state(), SessionState::Paused);

        // Ticks do not drain a paused countdown.
        tick_phase(&mut s);
        assert_eq!(s.remaining(), Duration::from_secs(2));

        let event = key(&mut s, KeyAction::TogglePause);
        assert!(matches!(event, Some(Event::Resumed { .. })));
        assert_eq!(s.state(), SessionState::Running);
    }

    #[test]
    fn pause_is_unavailable_while_awaiting_acknowledgment() {
        let mut s = session(Some(Duration::from_secs(5)));
        tick_phase(&mut s);
        tick_phase(&mut s);
        assert!(!s.can_toggle_pause());
        assert!(key(&mut s, KeyAction::TogglePause).is_none());
        assert_eq!(s.state(), SessionState::AwaitingAcknowledgment);
    }

    #[test]
    fn reset_restores_the_full_duration_without_moving_the_cursor() {
        let mut s = session(None);
        tick_phase(&mut s);
        assert_eq!(s.remaining(), Duration::from_secs(1));

        let cursor = s.plan().cursor();
        let event = key(&mut s, KeyAction::Reset);
        assert!(matches!(event, Some(Event::TimerReset { .. })));
        assert_eq!(s.remaining(), Duration::from_secs(2));
        assert_eq!(s.plan().cursor(), cursor);
    }

    #[test]
    fn quit_works_from_any_state() {
        let mut s = session(None);
        key(&mut s, KeyAction::TogglePause);
        let event = key(&mut s, KeyAction::Quit);
        assert!(matches!(event, Some(Event::SessionCompleted { .. })));
        assert_eq!(s.state(), SessionState::Completed);
        assert!(!s.finished());

        let mut s = session(Some(Duration::from_secs(5)));
        tick_phase(&mut s);
        tick_phase(&mut s);
        key(&mut s, KeyAction::Quit);
        assert_eq!(s.state(), SessionState::Completed);
    }

    #[test]
    fn invalid_settings_fail_session_construction() {
        let cfg = StubSettings {
            total_cycles: 0,
            ..quick_settings(None)
        };
        assert!(Session::new(cfg).is_err());
    }
}
