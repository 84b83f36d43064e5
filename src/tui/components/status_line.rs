//! Bottom line: transient status text, last memory write, key hints.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::tui::component::Component;

pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

const HINTS: &str = "^N new · ^R refresh · Tab switch · ^C quit ";

pub struct StatusLine<'a> {
    pub status_message: &'a str,
    /// From `Session::memory_time_label`
    pub memory: Option<String>,
    /// Spinner frame while busy
    pub spinner: Option<usize>,
}

impl Component for StatusLine<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let mut right = String::new();
        if let Some(memory) = &self.memory {
            right.push_str(&format!("memory {memory} · "));
        }
        right.push_str(HINTS);
        let right_width = u16::try_from(unicode_width::UnicodeWidthStr::width(right.as_str()))
            .unwrap_or(u16::MAX);

        let [left_area, right_area] =
            Layout::horizontal([Constraint::Min(0), Constraint::Length(right_width)]).areas(area);

        let mut left = vec![Span::raw(" ")];
        if let Some(frame_index) = self.spinner {
            let glyph = SPINNER_FRAMES[frame_index % SPINNER_FRAMES.len()];
            left.push(Span::styled(format!("{glyph} "), Style::default().fg(Color::Cyan)));
        }
        left.push(Span::raw(self.status_message));

        frame.render_widget(Paragraph::new(Line::from(left)), left_area);
        frame.render_widget(
            Paragraph::new(Line::from(right).right_aligned())
                .style(Style::default().fg(Color::DarkGray)),
            right_area,
        );
    }
}
