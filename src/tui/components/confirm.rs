//! Modal yes/no prompt drawn over the whole screen (project deletion).

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Padding, Paragraph, Wrap};

use crate::tui::component::Component;

pub struct ConfirmPrompt {
    pub title: String,
    pub question: String,
}

impl ConfirmPrompt {
    pub fn delete_project(project_title: &str) -> Self {
        Self {
            title: " Delete project ".to_string(),
            question: format!("Delete \"{project_title}\" and all its phases?"),
        }
    }
}

impl Component for ConfirmPrompt {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(50, 7, area);
        frame.render_widget(Clear, overlay);

        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(Style::default().fg(Color::Red))
            .title(self.title.as_str())
            .padding(Padding::horizontal(1));

        let body = vec![
            Line::from(self.question.as_str()),
            Line::default(),
            Line::styled(
                "y confirm · n cancel",
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ];
        let paragraph = Paragraph::new(body)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(paragraph, overlay);
    }
}

/// A `width` x `height` rect centered in `outer`, shrunk to fit.
fn centered_rect(width: u16, height: u16, outer: Rect) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(outer.height))])
        .flex(Flex::Center)
        .areas(outer);
    let [center] = Layout::horizontal([Constraint::Length(width.min(outer.width))])
        .flex(Flex::Center)
        .areas(row);
    center
}
