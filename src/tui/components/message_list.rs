//! # MessageList Component
//!
//! Scrollable view of the transcript.
//!
//! ## Responsibilities
//!
//! - Measure blocks and cache their heights by `(BlockId, version)`
//! - Report the measured size to the transcript's `ScrollModel` and draw at
//!   the offset it returns (follow mode, smooth scroll-to-bottom)
//! - Draw only the blocks near the viewport
//! - Overlay the fixed history loader and the "more below" hint
//!
//! ## Architecture
//!
//! `MessageList` is a transient component (created each frame) that wraps
//! `&'a mut MessageListState` (persistent state) and `&'a mut Transcript`
//! (the view-model). The scroll model is the only part of the transcript it
//! writes: it is presentation state, and the row counts it needs only exist
//! after measuring.

use std::ops::Range;

use ratatui::Frame;
use ratatui::layout::{Alignment, Position, Rect, Size};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, BorderType, Clear, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::core::transcript::{BlockId, Entry, Transcript};
use crate::tui::component::Component;
use crate::tui::components::message::MessageView;
use crate::tui::components::status_line::SPINNER_FRAMES;

const EMPTY_HINT: &str =
    "Pick a phase in the sidebar (Tab), or type a prompt to start a new project.";

/// Persistent state for the message list.
pub struct MessageListState {
    pub scroll_state: ScrollViewState,
    pub layout: LayoutCache,
    /// Viewport rows from the last render (page size for PageUp/PageDown)
    pub viewport_height: u16,
}

impl Default for MessageListState {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageListState {
    pub fn new() -> Self {
        Self {
            scroll_state: ScrollViewState::default(),
            layout: LayoutCache::new(),
            viewport_height: 0,
        }
    }

    /// Rows moved by PageUp/PageDown.
    pub fn page_rows(&self) -> u16 {
        self.viewport_height.saturating_sub(2).max(1)
    }
}

/// Transient wrapper for rendering the transcript.
pub struct MessageList<'a> {
    pub state: &'a mut MessageListState,
    pub transcript: &'a mut Transcript,
    pub spinner_frame: usize,
}

impl<'a> MessageList<'a> {
    pub fn new(
        state: &'a mut MessageListState,
        transcript: &'a mut Transcript,
        spinner_frame: usize,
    ) -> Self {
        Self {
            state,
            transcript,
            spinner_frame,
        }
    }

    fn render_centered(frame: &mut Frame, area: Rect, text: Line<'_>) {
        let y = area.y + area.height / 2;
        let row = Rect::new(area.x, y, area.width, 1.min(area.height));
        frame.render_widget(
            Paragraph::new(text)
                .alignment(Alignment::Center)
                .wrap(Wrap { trim: true }),
            row,
        );
    }

    fn render_loader(&self, frame: &mut Frame, area: Rect) {
        let glyph = SPINNER_FRAMES[self.spinner_frame % SPINNER_FRAMES.len()];
        let label = format!(" {glyph} Loading history… ");
        let width = (u16::try_from(label.chars().count()).unwrap_or(0) + 2).min(area.width);
        let height = 3.min(area.height);
        let overlay = Rect::new(
            area.x + area.width.saturating_sub(width) / 2,
            area.y + area.height.saturating_sub(height) / 2,
            width,
            height,
        );
        frame.render_widget(Clear, overlay);
        frame.render_widget(
            Paragraph::new(label)
                .style(Style::default().fg(Color::Cyan))
                .block(Block::bordered().border_type(BorderType::Rounded)),
            overlay,
        );
    }
}

impl<'a> Component for MessageList<'a> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let content_width = area.width.saturating_sub(1); // -1 for scrollbar safe area
        self.state.viewport_height = area.height;

        let entries = self.transcript.entries();
        self.state.layout.update(entries, content_width);
        let total_height = self.state.layout.total_height();

        let max_offset = total_height.saturating_sub(area.height);
        let offset = self.transcript.scroll.layout(max_offset);
        self.state
            .scroll_state
            .set_offset(Position { x: 0, y: offset });

        if self.transcript.is_empty() {
            if !self.transcript.loader_visible() {
                let hint = Line::styled(EMPTY_HINT, Style::default().fg(Color::DarkGray));
                Self::render_centered(frame, area, hint);
            }
        } else {
            let entries = self.transcript.entries();
            let visible = self.state.layout.visible_range(offset, area.height);

            let mut scroll_view = ScrollView::new(Size::new(content_width, total_height))
                .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
                .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);

            let mut y = self.state.layout.top_of(visible.start);
            for i in visible {
                let height = self.state.layout.heights[i];
                if height == 0 {
                    continue;
                }
                let entry = &entries[i];
                let view = MessageView::new(
                    &entry.block,
                    self.transcript.is_revealing_block(entry.id),
                    self.spinner_frame,
                );
                scroll_view.render_widget(view, Rect::new(0, y, content_width, height));
                y = y.saturating_add(height);
            }

            frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);

            if !self.transcript.scroll.is_at_bottom() && area.height > 0 {
                let hint = Line::styled(
                    " ↓ more below (Ctrl+End) ",
                    Style::default()
                        .fg(Color::Black)
                        .bg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )
                .right_aligned();
                let row = Rect::new(area.x, area.y + area.height - 1, content_width, 1);
                frame.render_widget(Paragraph::new(hint), row);
            }
        }

        if self.transcript.loader_visible() {
            self.render_loader(frame, area);
        }
    }
}

/// Cached block heights, keyed by block identity and content version.
///
/// Blocks keep their id when content changes (the typewriter bumps
/// `version` on every step), so only the blocks from the first changed key
/// onward are measured again.
pub struct LayoutCache {
    keys: Vec<(BlockId, u64)>,
    pub heights: Vec<u16>,
    pub prefix_heights: Vec<u16>,
    content_width: u16,
}

impl Default for LayoutCache {
    fn default() -> Self {
        Self::new()
    }
}

impl LayoutCache {
    pub fn new() -> Self {
        Self {
            keys: Vec::new(),
            heights: Vec::new(),
            prefix_heights: Vec::new(),
            content_width: 0,
        }
    }

    /// Leading entries whose cached heights are still valid.
    pub fn reusable_count(&self, entries: &[Entry], content_width: u16) -> usize {
        if self.content_width != content_width {
            return 0;
        }
        self.keys
            .iter()
            .zip(entries)
            .take_while(|(key, entry)| **key == (entry.id, entry.version))
            .count()
    }

    /// Re-measure whatever changed and rebuild the prefix sums.
    pub fn update(&mut self, entries: &[Entry], content_width: u16) {
        let reusable = self.reusable_count(entries, content_width);
        self.keys.truncate(reusable);
        self.heights.truncate(reusable);

        for entry in &entries[reusable..] {
            self.keys.push((entry.id, entry.version));
            self.heights
                .push(MessageView::calculate_height(&entry.block, content_width));
        }
        self.content_width = content_width;
        self.rebuild_prefix_heights();
    }

    pub fn rebuild_prefix_heights(&mut self) {
        self.prefix_heights = self
            .heights
            .iter()
            .scan(0u16, |acc, &h| {
                *acc = acc.saturating_add(h);
                Some(*acc)
            })
            .collect();
    }

    pub fn total_height(&self) -> u16 {
        self.prefix_heights.last().copied().unwrap_or(0)
    }

    /// Canvas row where entry `index` starts.
    pub fn top_of(&self, index: usize) -> u16 {
        match index.checked_sub(1) {
            Some(prev) => self.prefix_heights.get(prev).copied().unwrap_or(0),
            None => 0,
        }
    }

    /// Entries overlapping the viewport, plus half a screen either side.
    pub fn visible_range(&self, scroll_offset: u16, viewport_height: u16) -> Range<usize> {
        let buffer = viewport_height / 2;
        let buffered_start = scroll_offset.saturating_sub(buffer);
        let buffered_end = scroll_offset
            .saturating_add(viewport_height)
            .saturating_add(buffer);

        let start = self
            .prefix_heights
            .partition_point(|&end| end <= buffered_start);
        let end = self
            .prefix_heights
            .partition_point(|&end| end < buffered_end)
            .saturating_add(1)
            .min(self.prefix_heights.len());

        start..end
    }
}
