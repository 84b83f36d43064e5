//! Notices stacked in the top-right corner, newest on top.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Clear, Paragraph};

use crate::core::notice::{NoticeKind, Notices};
use crate::tui::component::Component;

const MAX_WIDTH: u16 = 44;
/// Borders (2) + padding (2)
const HORIZONTAL_OVERHEAD: u16 = 4;

pub struct Toasts<'a> {
    pub notices: &'a Notices,
}

impl Toasts<'_> {
    fn wrap(text: &str, width: u16) -> Vec<String> {
        textwrap::wrap(text, usize::from(width.max(1)))
            .into_iter()
            .map(|line| line.into_owned())
            .collect()
    }
}

impl Component for Toasts<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let width = MAX_WIDTH.min(area.width);
        let inner = width.saturating_sub(HORIZONTAL_OVERHEAD);
        let x = area.x + area.width - width;
        let bottom = area.y + area.height;
        let mut y = area.y;

        for notice in self.notices.newest_first() {
            let lines = Self::wrap(&notice.text, inner);
            let height = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_add(2);
            if y.saturating_add(height) > bottom {
                break;
            }

            let (color, title) = match notice.kind {
                NoticeKind::Success => (Color::Green, " ✓ "),
                NoticeKind::Error => (Color::Red, " ✗ "),
            };
            let block = Block::bordered()
                .border_type(BorderType::Rounded)
                .border_style(Style::default().fg(color))
                .title(title)
                .padding(ratatui::widgets::Padding::horizontal(1));

            let rect = Rect::new(x, y, width, height);
            frame.render_widget(Clear, rect);
            frame.render_widget(Paragraph::new(lines.join("\n")).block(block), rect);
            y += height;
        }
    }
}
