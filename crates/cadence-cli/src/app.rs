//! The interactive session loop.
//!
//! Owns the terminal and the two tick deadlines, translating crossterm
//! key events and elapsed wall time into discrete session events. The
//! session itself stays UI-free; this loop is its only writer.

use std::io::{self, Stdout};
use std::time::{Duration, Instant};

use crossterm::event::{self, Event as TermEvent, KeyCode, KeyEvent, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::backend::CrosstermBackend;
use ratatui::Terminal;

use cadence_core::session::{ACK_TICK, PHASE_TICK};
use cadence_core::{CoreError, KeyAction, Session, SessionEvent, TimerId, TimerSettings};

const POLL_INTERVAL: Duration = Duration::from_millis(50);

pub struct App<S: TimerSettings> {
    session: Session<S>,
    show_progress: bool,
}

/// Run the session to completion. Returns whether the whole plan
/// finished (as opposed to the user quitting early).
pub fn run<S: TimerSettings>(session: Session<S>) -> Result<bool, Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App {
        session,
        show_progress: false,
    };
    let result = app.event_loop(&mut terminal);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result?;
    Ok(app.session.finished())
}

impl<S: TimerSettings> App<S> {
    fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let mut last_phase_tick = Instant::now();
        let mut last_ack_tick = Instant::now();

        loop {
            terminal.draw(|frame| {
                crate::view::render(frame, &self.session, self.show_progress);
            })?;

            if event::poll(POLL_INTERVAL)? {
                if let TermEvent::Key(key) = event::read()? {
                    self.handle_key(key)?;
                }
            }

            if last_phase_tick.elapsed() >= PHASE_TICK {
                last_phase_tick = Instant::now();
                self.session.apply(SessionEvent::Tick(TimerId::Phase))?;
            }
            if self.session.ack_required() && last_ack_tick.elapsed() >= ACK_TICK {
                last_ack_tick = Instant::now();
                self.session.apply(SessionEvent::Tick(TimerId::Ack))?;
            }

            if self.session.quitting() {
                return Ok(());
            }
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<(), CoreError> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.session.apply(SessionEvent::Key(KeyAction::Quit))?;
            return Ok(());
        }

        let action = match key.code {
            KeyCode::Char('p') => Some(KeyAction::TogglePause),
            KeyCode::Char('r') => Some(KeyAction::Reset),
            KeyCode::Char('n') => Some(KeyAction::Skip),
            KeyCode::Char('q') => Some(KeyAction::Quit),
            KeyCode::Enter => Some(KeyAction::Acknowledge),
            KeyCode::Char('v') => {
                self.show_progress = !self.show_progress;
                None
            }
            _ => None,
        };

        if let Some(action) = action {
            self.session.apply(SessionEvent::Key(action))?;
        }
        Ok(())
    }
}
