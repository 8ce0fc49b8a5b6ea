//! Read-only rendering of session state.
//!
//! Everything here is derived from session queries on each draw; nothing
//! in this module mutates the session.

use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use ratatui::Frame;

use cadence_core::{Session, TimerSettings};

use crate::common::format_duration;

pub fn render<S: TimerSettings>(frame: &mut Frame, session: &Session<S>, show_progress: bool) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // Timer
            Constraint::Length(1), // Acknowledgment banner
            Constraint::Min(0),    // Progress list
            Constraint::Length(1), // Help
        ])
        .split(frame.area());

    render_timer(frame, chunks[0], session);
    render_ack(frame, chunks[1], session);
    if show_progress {
        render_progress(frame, chunks[2], session);
    }
    render_help(frame, chunks[3], session);
}

fn render_timer<S: TimerSettings>(frame: &mut Frame, area: Rect, session: &Session<S>) {
    let kind = session.current_phase().kind;
    let mut spans = vec![Span::raw(format!(
        "{} {}: {}",
        kind.emoji(),
        kind,
        format_duration(session.remaining())
    ))];
    if session.paused() {
        spans.push(Span::styled(
            " (paused)",
            Style::default().add_modifier(Modifier::DIM),
        ));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_ack<S: TimerSettings>(frame: &mut Frame, area: Rect, session: &Session<S>) {
    // The banner blinks: drawn on every other acknowledgment tick.
    if !session.ack_required() || !session.blink() {
        return;
    }
    let remaining = session.ack_remaining().unwrap_or_default();
    let banner = Span::styled(
        format!(
            "Press enter to start ({}s)",
            remaining.as_secs()
        ),
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(Paragraph::new(Line::from(banner)), area);
}

fn render_progress<S: TimerSettings>(frame: &mut Frame, area: Rect, session: &Session<S>) {
    let plan = session.plan();
    let mut lines = vec![Line::from(Span::styled(
        "Phases",
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    for (i, entry) in plan.entries().iter().enumerate() {
        let label = entry.phase.kind.to_string();
        let line = if plan.is_completed(entry.phase) {
            Line::from(vec![
                Span::styled("✓ ", Style::default().fg(Color::Green)),
                Span::styled(
                    label,
                    Style::default()
                        .fg(Color::DarkGray)
                        .add_modifier(Modifier::CROSSED_OUT),
                ),
            ])
        } else if i == plan.cursor() {
            Line::from(vec![Span::raw("· "), Span::raw(label)])
        } else {
            Line::from(Span::raw(format!("  {label}")))
        };
        lines.push(line);
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_help<S: TimerSettings>(frame: &mut Frame, area: Rect, session: &Session<S>) {
    let mut hints: Vec<&str> = Vec::new();
    if session.can_toggle_pause() {
        hints.push(if session.paused() {
            "p resume"
        } else {
            "p pause"
        });
    }
    if session.can_acknowledge() {
        hints.push("enter acknowledge");
    }
    if session.can_reset() {
        hints.push("r reset");
    }
    if session.can_skip() {
        hints.push("n skip");
    }
    hints.push("v progress");
    hints.push("q quit");

    let help = Span::styled(hints.join("  "), Style::default().fg(Color::DarkGray));
    frame.render_widget(Paragraph::new(Line::from(help)), area);
}
