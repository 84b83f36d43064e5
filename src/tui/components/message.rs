use ratatui::Frame;
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, BorderType, Padding, Paragraph, Widget, Wrap};

use crate::core::transcript::Block as TranscriptBlock;
use crate::gateway::Role;
use crate::tui::component::Component;
use crate::tui::components::status_line::SPINNER_FRAMES;
use crate::tui::markdown;

/// Horizontal padding (per side) between the border and text content.
const CONTENT_PAD_H: u16 = 1;
/// Total horizontal space consumed by borders (1 left + 1 right) and padding.
const HORIZONTAL_OVERHEAD: u16 = 2 + CONTENT_PAD_H * 2;
/// Total vertical space consumed by borders (1 top + 1 bottom).
const VERTICAL_OVERHEAD: u16 = 2;
/// Rows taken by the waiting indicator (border + one line).
const LOADER_HEIGHT: u16 = 1 + VERTICAL_OVERHEAD;

const HUD_SEPARATOR: &str = "  │  ";

/// A stateless component that renders one transcript block.
///
/// `MessageView` is a **transient component**: it's created fresh each frame
/// for every visible block. Three shapes:
/// - **Message**: rounded box titled by role; assistant text goes through
///   the markdown renderer, user text is drawn as typed
/// - **HUD**: one dim row of reply metrics under an assistant message
/// - **Placeholder**: the reserved reply slot; shows a spinner while the
///   loader is on and takes no room otherwise
///
/// # Height Calculation
///
/// [`calculate_height`](Self::calculate_height) measures the same `Text`
/// that `render` draws, wrapped by the same `Paragraph` settings, so the
/// parent `MessageList` can lay out the scroll canvas without drawing.
#[derive(Clone, Copy)]
pub struct MessageView<'a> {
    pub block: &'a TranscriptBlock,
    /// The typewriter is writing into this block
    pub revealing: bool,
    pub spinner_frame: usize,
}

fn role_label(role: Role) -> &'static str {
    match role {
        Role::User => "you",
        Role::Assistant => "r4r",
    }
}

fn role_style(role: Role) -> Style {
    match role {
        Role::User => Style::default().fg(Color::Green),
        Role::Assistant => Style::default().fg(Color::Blue),
    }
}

fn body(role: Role, content: &str) -> Text<'static> {
    match role {
        Role::Assistant => markdown::render(content.trim_end(), Color::Reset),
        Role::User => Text::raw(content.trim().to_string()),
    }
}

impl<'a> MessageView<'a> {
    pub fn new(block: &'a TranscriptBlock, revealing: bool, spinner_frame: usize) -> Self {
        Self {
            block,
            revealing,
            spinner_frame,
        }
    }

    /// Rows this block occupies at `width`.
    pub fn calculate_height(block: &TranscriptBlock, width: u16) -> u16 {
        match block {
            TranscriptBlock::Hud(_) => 1,
            TranscriptBlock::Placeholder { loader: true } => LOADER_HEIGHT,
            TranscriptBlock::Placeholder { loader: false } => 0,
            TranscriptBlock::Message { role, content } => {
                let content_width = width.saturating_sub(HORIZONTAL_OVERHEAD);
                if content_width == 0 {
                    // Degenerate case: terminal too narrow for borders + padding.
                    return 1;
                }
                let text = body(*role, content);
                markdown::line_count(&text, content_width)
                    .max(1)
                    .saturating_add(VERTICAL_OVERHEAD)
            }
        }
    }

    fn render_message(self, role: Role, content: &str, area: Rect, buf: &mut Buffer) {
        let style = role_style(role);
        // Dim borders for settled messages; the one being typed stays bright
        let border_style = if self.revealing {
            style.add_modifier(Modifier::BOLD)
        } else {
            style.add_modifier(Modifier::DIM)
        };

        let block = Block::bordered()
            .title(role_label(role))
            .border_type(BorderType::Rounded)
            .border_style(border_style)
            .title_style(border_style)
            .padding(Padding::horizontal(CONTENT_PAD_H));

        let inner_area = block.inner(area);
        block.render(area, buf);

        let text = body(role, content);
        let paragraph = match role {
            Role::User => Paragraph::new(text).style(style),
            Role::Assistant => Paragraph::new(text),
        };
        paragraph.wrap(Wrap { trim: false }).render(inner_area, buf);
    }

    fn render_loader(self, area: Rect, buf: &mut Buffer) {
        let style = role_style(Role::Assistant);
        let block = Block::bordered()
            .title(role_label(Role::Assistant))
            .border_type(BorderType::Rounded)
            .border_style(style.add_modifier(Modifier::DIM))
            .padding(Padding::horizontal(CONTENT_PAD_H));
        let glyph = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
        Paragraph::new(Line::from(vec![
            Span::styled(format!("{glyph} "), style),
            Span::styled(
                "thinking…",
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
        ]))
        .block(block)
        .render(area, buf);
    }
}

impl<'a> Widget for MessageView<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match self.block {
            TranscriptBlock::Message { role, content } => {
                self.render_message(*role, content, area, buf)
            }
            TranscriptBlock::Hud(hud) => {
                let line = hud.cells().join(HUD_SEPARATOR);
                Paragraph::new(format!("  {line}"))
                    .style(Style::default().fg(Color::DarkGray))
                    .render(area, buf);
            }
            TranscriptBlock::Placeholder { loader: true } => self.render_loader(area, buf),
            TranscriptBlock::Placeholder { loader: false } => {}
        }
    }
}

/// Component trait implementation.
///
/// `MessageView` is stateless; rendering is delegated to the [`Widget`] impl.
impl<'a> Component for MessageView<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(*self, area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::metrics::Hud;
    use crate::gateway::WireMetrics;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn message(role: Role, content: &str) -> TranscriptBlock {
        TranscriptBlock::Message {
            role,
            content: content.to_string(),
        }
    }

    fn draw(block: &TranscriptBlock, width: u16, height: u16) -> String {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal
            .draw(|f| {
                let area = f.area();
                Component::render(&mut MessageView::new(block, false, 0), f, area);
            })
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    // ==========================================================================
    // calculate_height tests
    // ==========================================================================

    #[test]
    fn empty_message_still_has_one_row() {
        let block = message(Role::Assistant, "");
        assert_eq!(MessageView::calculate_height(&block, 80), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn width_equal_to_overhead_returns_minimum() {
        let block = message(Role::User, "Hello world");
        assert_eq!(MessageView::calculate_height(&block, HORIZONTAL_OVERHEAD), 1);
    }

    #[test]
    fn single_line_fits() {
        let block = message(Role::User, "Hello");
        assert_eq!(MessageView::calculate_height(&block, 80), 1 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn user_text_wraps_at_width() {
        let block = message(Role::User, "Hello world");
        // content width 5: "Hello" | "world"
        assert_eq!(MessageView::calculate_height(&block, 9), 2 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn user_newlines_are_kept() {
        let block = message(Role::User, "one\ntwo\nthree");
        assert_eq!(MessageView::calculate_height(&block, 80), 3 + VERTICAL_OVERHEAD);
    }

    #[test]
    fn hud_and_placeholders_have_fixed_heights() {
        let hud = TranscriptBlock::Hud(Hud::new(None, None));
        assert_eq!(MessageView::calculate_height(&hud, 80), 1);
        assert_eq!(
            MessageView::calculate_height(&TranscriptBlock::Placeholder { loader: true }, 80),
            LOADER_HEIGHT
        );
        assert_eq!(
            MessageView::calculate_height(&TranscriptBlock::Placeholder { loader: false }, 80),
            0
        );
    }

    // ==========================================================================
    // render tests
    // ==========================================================================

    #[test]
    fn messages_are_titled_by_role() {
        let text = draw(&message(Role::User, "ping"), 30, 3);
        assert!(text.contains("you"));
        assert!(text.contains("ping"));

        let text = draw(&message(Role::Assistant, "**pong**"), 30, 3);
        assert!(text.contains("r4r"));
        assert!(text.contains("pong"));
        assert!(!text.contains("**"));
    }

    #[test]
    fn hud_row_lists_all_cells() {
        let hud = TranscriptBlock::Hud(Hud::new(
            Some("mistral"),
            Some(WireMetrics {
                tokens: Some(12),
                tok_per_s: Some(3.5),
                ttf: Some(0.25),
            }),
        ));
        let text = draw(&hud, 120, 1);
        assert!(text.contains("mistral"));
        assert!(text.contains("3.50 tok/s"));
        assert!(text.contains("12 tokens"));
        assert!(text.contains("TTF 0.25s"));
    }

    #[test]
    fn loader_shows_spinner() {
        let text = draw(&TranscriptBlock::Placeholder { loader: true }, 30, 3);
        assert!(text.contains(SPINNER_FRAMES[0]));
        assert!(text.contains("thinking"));
    }
}
