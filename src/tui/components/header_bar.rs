//! # HeaderBar Component
//!
//! One-line bar above the transcript: the header label on the left and the
//! save "button" on the right.
//!
//! Purely presentational. The label and the enabled flag are computed by
//! `core::header`; this component only picks colors for them.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::core::header::HeaderStatus;
use crate::tui::component::Component;

const SAVE_BUTTON: &str = " ^S Save ";

/// # Props
///
/// - `label`: text from `Header::label`
/// - `status`: drives the label color
/// - `save_enabled`: whether Ctrl+S does anything right now
pub struct HeaderBar {
    pub label: String,
    pub status: HeaderStatus,
    pub save_enabled: bool,
}

impl HeaderBar {
    pub fn new(label: String, status: HeaderStatus, save_enabled: bool) -> Self {
        Self {
            label,
            status,
            save_enabled,
        }
    }

    fn label_style(&self) -> Style {
        let base = Style::default().add_modifier(Modifier::BOLD);
        match self.status {
            HeaderStatus::Pending => base.fg(Color::Yellow).add_modifier(Modifier::ITALIC),
            HeaderStatus::Saving => base.fg(Color::Yellow),
            HeaderStatus::Saved => base.fg(Color::Green),
            HeaderStatus::SaveFailed | HeaderStatus::ConnectionFailed => base.fg(Color::Red),
            HeaderStatus::Deleted => base.fg(Color::DarkGray),
            HeaderStatus::Active | HeaderStatus::Settled => base.fg(Color::White),
        }
    }
}

impl Component for HeaderBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let button_width = u16::try_from(SAVE_BUTTON.len()).unwrap_or(0);
        let [label_area, button_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(button_width)])
                .areas(area);

        let label = Line::from(Span::styled(format!(" {}", self.label), self.label_style()));
        frame.render_widget(Paragraph::new(label), label_area);

        let button_style = if self.save_enabled {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Green)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(SAVE_BUTTON, button_style))),
            button_area,
        );
    }
}
