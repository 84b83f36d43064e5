//! # Composer Component
//!
//! The prompt editor at the bottom of the conversation pane.
//!
//! ## Responsibilities
//!
//! - Capture text input (typing, paste, newlines via Shift+Enter / Ctrl+J)
//! - Cursor movement by char, word, row and line
//! - Emit `Submit` on Enter unless the text is blank or a reply is in flight
//!
//! The buffer is internal state. `busy` is a prop from `App::is_loading()`;
//! while it is set, Enter keeps the text so nothing typed is lost.

mod rows;

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::Line;
use ratatui::widgets::{
    Block, BorderType, Padding, Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState,
};

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

use rows::{
    HORIZONTAL_OVERHEAD, MAX_VISIBLE_ROWS, Row, VERTICAL_OVERHEAD, layout_rows, locate,
    next_char, next_word_end, offset_at_column, prev_char, prev_word_start,
};

const PLACEHOLDER: &str = "Type a message";

/// High-level events emitted by the Composer
#[derive(Debug, Clone, PartialEq)]
pub enum ComposerEvent {
    /// Enter on non-blank text while idle; the buffer has been cleared
    Submit(String),
    /// Buffer or cursor changed
    Changed,
}

pub struct Composer {
    buffer: String,
    /// Byte offset, always on a char boundary
    cursor: usize,
    /// First visible row
    scroll: u16,
    /// Inner width from the last render, used for row movement
    width: u16,
    /// A send or reveal is in flight (Prop)
    pub busy: bool,
    /// Keyboard focus is here; only then is the terminal cursor placed (Prop)
    pub focused: bool,
}

impl Default for Composer {
    fn default() -> Self {
        Self::new()
    }
}

impl Composer {
    const DEFAULT_WIDTH: u16 = 76;

    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            scroll: 0,
            width: Self::DEFAULT_WIDTH,
            busy: false,
            focused: true,
        }
    }

    pub fn text(&self) -> &str {
        &self.buffer
    }

    /// Height needed for the current text at `area_width`, borders included.
    pub fn height(&self, area_width: u16) -> u16 {
        let inner = area_width.saturating_sub(HORIZONTAL_OVERHEAD);
        let rows = layout_rows(&self.buffer, inner).len();
        let rows = u16::try_from(rows).unwrap_or(u16::MAX);
        rows.clamp(1, MAX_VISIBLE_ROWS) + VERTICAL_OVERHEAD
    }

    fn insert(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    fn delete_range(&mut self, from: usize, to: usize) -> bool {
        if from == to {
            return false;
        }
        self.buffer.drain(from..to);
        self.cursor = from;
        true
    }

    fn move_to(&mut self, pos: usize) -> bool {
        let moved = pos != self.cursor;
        self.cursor = pos;
        moved
    }

    /// Move one visual row up or down, keeping the display column.
    fn move_row(&mut self, down: bool) -> bool {
        let rows = layout_rows(&self.buffer, self.width);
        let (row, col) = locate(&self.buffer, &rows, self.cursor);
        let target = if down {
            row + 1
        } else {
            match row.checked_sub(1) {
                Some(r) => r,
                None => return false,
            }
        };
        match rows.get(target) {
            Some(&r) => self.move_to(offset_at_column(&self.buffer, r, col)),
            None => false,
        }
    }

    fn render_scrollbar(&self, frame: &mut Frame, area: Rect, total: u16, visible: u16) {
        if total <= visible {
            return;
        }
        let mut state = ScrollbarState::default()
            .content_length(usize::from(total - visible))
            .position(usize::from(self.scroll));
        let bar = Rect {
            x: area.x + area.width.saturating_sub(1),
            y: area.y + 1,
            width: 1,
            height: area.height.saturating_sub(2),
        };
        frame.render_stateful_widget(
            Scrollbar::new(ScrollbarOrientation::VerticalRight),
            bar,
            &mut state,
        );
    }
}

impl Component for Composer {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        self.width = area.width.saturating_sub(HORIZONTAL_OVERHEAD).max(1);
        let rows: Vec<Row> = layout_rows(&self.buffer, self.width);
        let (row, col) = locate(&self.buffer, &rows, self.cursor);
        let row = u16::try_from(row).unwrap_or(u16::MAX);
        let total = u16::try_from(rows.len()).unwrap_or(u16::MAX);
        let visible = area.height.saturating_sub(VERTICAL_OVERHEAD).max(1);

        // Keep the cursor row in view
        if row < self.scroll {
            self.scroll = row;
        } else if row >= self.scroll + visible {
            self.scroll = row + 1 - visible;
        }
        self.scroll = self.scroll.min(total.saturating_sub(visible));

        let (title, style) = if self.busy {
            (" Message · waiting for reply… ", Style::default().fg(Color::DarkGray))
        } else {
            (" Message ", Style::default().fg(Color::Green))
        };
        let border = if self.focused {
            style
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(title)
            .title_bottom(Line::from(" Enter send · Shift+Enter newline ").right_aligned())
            .padding(Padding::horizontal(1));

        let lines: Vec<Line> = if self.buffer.is_empty() {
            vec![Line::styled(PLACEHOLDER, Style::default().fg(Color::DarkGray))]
        } else {
            rows.iter()
                .skip(usize::from(self.scroll))
                .take(usize::from(visible))
                .map(|r| Line::raw(&self.buffer[r.start..r.end]))
                .collect()
        };

        frame.render_widget(Paragraph::new(lines).block(block).style(style), area);
        self.render_scrollbar(frame, area, total, visible);

        if self.focused {
            let x = area.x + 2 + col.min(self.width.saturating_sub(1));
            let y = area.y + 1 + row.saturating_sub(self.scroll);
            frame.set_cursor_position((x, y));
        }
    }
}

impl EventHandler for Composer {
    type Event = ComposerEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        let changed = match event {
            TuiEvent::InputChar(c) => {
                let mut utf8 = [0u8; 4];
                self.insert(c.encode_utf8(&mut utf8));
                true
            }
            TuiEvent::Paste(text) => {
                // Terminals deliver pasted newlines as CR
                let text = text.replace("\r\n", "\n").replace('\r', "\n");
                self.insert(&text);
                true
            }
            TuiEvent::Backspace => {
                let from = prev_char(&self.buffer, self.cursor);
                self.delete_range(from, self.cursor)
            }
            TuiEvent::DeleteWordBack => {
                let from = prev_word_start(&self.buffer, self.cursor);
                self.delete_range(from, self.cursor)
            }
            TuiEvent::Delete => {
                let to = next_char(&self.buffer, self.cursor);
                let at = self.cursor;
                self.delete_range(at, to)
            }
            TuiEvent::CursorLeft => self.move_to(prev_char(&self.buffer, self.cursor)),
            TuiEvent::CursorRight => self.move_to(next_char(&self.buffer, self.cursor)),
            TuiEvent::CursorWordLeft => self.move_to(prev_word_start(&self.buffer, self.cursor)),
            TuiEvent::CursorWordRight => self.move_to(next_word_end(&self.buffer, self.cursor)),
            TuiEvent::CursorHome => {
                let start = self.buffer[..self.cursor].rfind('\n').map_or(0, |i| i + 1);
                self.move_to(start)
            }
            TuiEvent::CursorEnd => {
                let end = self.buffer[self.cursor..]
                    .find('\n')
                    .map_or(self.buffer.len(), |i| self.cursor + i);
                self.move_to(end)
            }
            TuiEvent::CursorUp => self.move_row(false),
            TuiEvent::CursorDown => self.move_row(true),
            TuiEvent::Submit => {
                if self.busy || self.buffer.trim().is_empty() {
                    return None;
                }
                let text = std::mem::take(&mut self.buffer);
                self.cursor = 0;
                self.scroll = 0;
                return Some(ComposerEvent::Submit(text));
            }
            _ => false,
        };
        changed.then_some(ComposerEvent::Changed)
    }
}
