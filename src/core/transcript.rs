//! # Transcript
//!
//! View-model of the scrollable conversation pane. It holds the ordered
//! blocks the renderer draws, the single reserved "current reply"
//! placeholder, the fixed loader flag, the typewriter reveal and the
//! scroll model. No terminal types in here; the TUI draws whatever this
//! describes.
//!
//! ```text
//! Transcript
//! ├── entries: Vec<Entry>       // Message | Hud | Placeholder, with stable ids
//! ├── loader_visible: bool      // page-level loader, survives clear()
//! ├── scroll: ScrollModel       // follow mode + pending scroll motion
//! ├── reveal: Option<Reveal>    // in-flight typewriter
//! └── generation: u64           // bumped by begin_view()
//! ```
//!
//! ## Stale results
//!
//! Every phase load and every reveal captures `generation` when it starts.
//! `begin_view()` advances it, so a history response or reveal step that
//! arrives after the user moved on is rejected before it writes anything.

use log::{debug, warn};

use crate::core::metrics::Hud;
use crate::gateway::{Message, Role};

/// Distance from the bottom (in rows) within which the pane still counts
/// as scrolled to the bottom.
pub const AT_BOTTOM_THRESHOLD: u16 = 1;

// ============================================================================
// Scroll model
// ============================================================================

/// How a requested scroll-to-bottom should move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollMotion {
    /// Jump in one frame.
    Instant,
    /// Close half the remaining distance per frame.
    Smooth,
}

/// Row-based scroll position of the transcript pane.
///
/// `max_offset` is reported by the renderer after it measures the blocks;
/// `pinned` is follow mode: while set, the renderer keeps the view on the
/// last row.
#[derive(Debug, Clone, PartialEq)]
pub struct ScrollModel {
    offset: u16,
    max_offset: u16,
    pinned: bool,
    pending: Option<ScrollMotion>,
}

impl Default for ScrollModel {
    fn default() -> Self {
        Self::new()
    }
}

impl ScrollModel {
    pub fn new() -> Self {
        Self {
            offset: 0,
            max_offset: 0,
            pinned: true,
            pending: None,
        }
    }

    pub fn offset(&self) -> u16 {
        self.offset
    }

    pub fn max_offset(&self) -> u16 {
        self.max_offset
    }

    pub fn pinned(&self) -> bool {
        self.pinned
    }

    pub fn pending(&self) -> Option<ScrollMotion> {
        self.pending
    }

    pub fn is_at_bottom(&self) -> bool {
        self.pinned || self.max_offset.saturating_sub(self.offset) <= AT_BOTTOM_THRESHOLD
    }

    pub fn scroll_to_bottom(&mut self, motion: ScrollMotion) {
        self.pinned = true;
        self.pending = Some(motion);
    }

    pub fn scroll_up(&mut self, rows: u16) {
        self.offset = self.offset.saturating_sub(rows);
        self.pinned = false;
        self.pending = None;
    }

    pub fn scroll_down(&mut self, rows: u16) {
        self.offset = self.offset.saturating_add(rows).min(self.max_offset);
        if self.offset >= self.max_offset {
            self.pinned = true;
        }
    }

    /// Applies a freshly measured content size and advances any pending
    /// motion by one frame. Returns the offset to draw with.
    pub fn layout(&mut self, max_offset: u16) -> u16 {
        self.max_offset = max_offset;
        if !self.pinned {
            self.pending = None;
            self.offset = self.offset.min(max_offset);
            return self.offset;
        }

        match self.pending.unwrap_or(ScrollMotion::Instant) {
            ScrollMotion::Instant => {
                self.offset = max_offset;
                self.pending = None;
            }
            ScrollMotion::Smooth => {
                let gap = max_offset.saturating_sub(self.offset);
                self.offset = self.offset.saturating_add(gap.div_ceil(2)).min(max_offset);
                if self.offset >= max_offset {
                    self.offset = max_offset;
                    self.pending = None;
                }
            }
        }
        self.offset
    }
}

// ============================================================================
// Blocks
// ============================================================================

/// Stable identity of a block, unaffected by insertions/removals around it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BlockId(u64);

#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Message { role: Role, content: String },
    Hud(Hud),
    /// Reserved slot for the reply being waited on.
    Placeholder { loader: bool },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: BlockId,
    /// Bumped whenever the block's content changes (layout cache key).
    pub version: u64,
    pub block: Block,
}

/// Returned by `append_loader`; identifies the placeholder it created.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReplyHandle(BlockId);

// ============================================================================
// Reveal
// ============================================================================

#[derive(Debug, Clone, PartialEq)]
struct Reveal {
    target: BlockId,
    text: String,
    /// Byte offset of the revealed prefix (always a char boundary).
    shown: usize,
    stick: bool,
    generation: u64,
    hud: Hud,
}

/// Result of starting a reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealStart {
    /// `steps` more reveal steps are needed for `generation`.
    Running { generation: u64, steps: usize },
    /// Nothing to animate; the HUD is already attached.
    Finished,
    /// The target block no longer exists.
    Missing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealProgress {
    Continue,
    Finished,
    /// The step belonged to an older view (or no reveal is running).
    Stale,
}

// ============================================================================
// Transcript
// ============================================================================

#[derive(Debug, Clone)]
pub struct Transcript {
    entries: Vec<Entry>,
    next_id: u64,
    loader_visible: bool,
    pub scroll: ScrollModel,
    reveal: Option<Reveal>,
    generation: u64,
}

impl Default for Transcript {
    fn default() -> Self {
        Self::new()
    }
}

impl Transcript {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            loader_visible: false,
            scroll: ScrollModel::new(),
            reveal: None,
            generation: 0,
        }
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    /// The visible blocks without identities, for comparisons.
    pub fn blocks(&self) -> Vec<&Block> {
        self.entries.iter().map(|e| &e.block).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn loader_visible(&self) -> bool {
        self.loader_visible
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_revealing(&self) -> bool {
        self.reveal.is_some()
    }

    /// Whether the block is the live target of a running reveal.
    pub fn is_revealing_block(&self, id: BlockId) -> bool {
        self.reveal.as_ref().is_some_and(|r| r.target == id)
    }

    pub fn placeholder(&self) -> Option<&Entry> {
        self.entries
            .iter()
            .find(|e| matches!(e.block, Block::Placeholder { .. }))
    }

    /// Starts a new view: results captured under the old generation go stale.
    pub fn begin_view(&mut self) -> u64 {
        self.generation += 1;
        debug!("Transcript generation -> {}", self.generation);
        self.generation
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }

    pub fn show_loader(&mut self) {
        self.loader_visible = true;
    }

    pub fn hide_loader(&mut self) {
        self.loader_visible = false;
    }

    /// Removes every block. The fixed loader keeps its visibility.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.reveal = None;
        self.scroll = ScrollModel::new();
    }

    /// Replaces the transcript with `messages`, in server order.
    pub fn render_all(&mut self, messages: &[Message]) {
        self.clear();
        for message in messages {
            self.push(Block::Message {
                role: message.role,
                content: message.content.clone(),
            });
            if message.role == Role::Assistant
                && let Some(hud) = Hud::from_meta(message.meta.as_ref())
            {
                self.push(Block::Hud(hud));
            }
        }
        self.scroll.scroll_to_bottom(ScrollMotion::Instant);
    }

    /// Appends a completed message.
    pub fn append(&mut self, role: Role, content: &str) -> BlockId {
        let id = self.push(Block::Message {
            role,
            content: content.to_string(),
        });
        self.scroll.scroll_to_bottom(ScrollMotion::Smooth);
        id
    }

    /// Adds an empty assistant block for a reveal to write into.
    ///
    /// Scroll is left alone: the reveal started on it decides whether to
    /// follow, from where the reader is now.
    pub fn open_reply(&mut self) -> BlockId {
        self.push(Block::Message {
            role: Role::Assistant,
            content: String::new(),
        })
    }

    /// Creates the reply placeholder with a waiting indicator, or resets the
    /// existing one in place.
    pub fn append_loader(&mut self) -> ReplyHandle {
        let id = match self.find_placeholder_mut() {
            Some(entry) => {
                entry.block = Block::Placeholder { loader: true };
                entry.version += 1;
                entry.id
            }
            None => self.push(Block::Placeholder { loader: true }),
        };
        self.scroll.scroll_to_bottom(ScrollMotion::Smooth);
        ReplyHandle(id)
    }

    /// Drops the waiting indicator but keeps the reserved slot.
    pub fn remove_loader(&mut self, handle: ReplyHandle) {
        if let Some(entry) = self.entries.iter_mut().find(|e| e.id == handle.0)
            && let Block::Placeholder { loader } = &mut entry.block
        {
            *loader = false;
            entry.version += 1;
        }
    }

    /// Drops the reserved slot, if any.
    pub fn remove_placeholder(&mut self) -> bool {
        let before = self.entries.len();
        self.entries
            .retain(|e| !matches!(e.block, Block::Placeholder { .. }));
        before != self.entries.len()
    }

    /// Begins revealing `text` into `target` one character per step.
    ///
    /// Follow mode is decided once, here: if the pane is at the bottom now,
    /// every step pins it there; if the user scrolled up, nothing moves
    /// until the reveal is over. `hud` is attached after the block when the
    /// reveal completes.
    pub fn start_reveal(&mut self, target: BlockId, text: &str, hud: Hud) -> RevealStart {
        let Some(entry) = self.entries.iter_mut().find(|e| e.id == target) else {
            warn!("Reveal target {:?} is gone", target);
            return RevealStart::Missing;
        };
        if let Block::Message { content, .. } = &mut entry.block {
            content.clear();
            entry.version += 1;
        }

        let reveal = Reveal {
            target,
            text: text.to_string(),
            shown: 0,
            stick: self.scroll.is_at_bottom(),
            generation: self.generation,
            hud,
        };

        if text.is_empty() {
            self.finish_reveal(reveal);
            return RevealStart::Finished;
        }

        let steps = text.chars().count();
        let generation = reveal.generation;
        self.reveal = Some(reveal);
        RevealStart::Running { generation, steps }
    }

    /// Reveals one more character of the running reveal.
    pub fn reveal_step(&mut self, generation: u64) -> RevealProgress {
        let Some(running) = self.reveal.as_ref() else {
            return RevealProgress::Stale;
        };
        if !self.is_current(running.generation) {
            debug!(
                "Dropping reveal from generation {} (current {})",
                running.generation, self.generation
            );
            self.reveal = None;
            return RevealProgress::Stale;
        }
        if running.generation != generation {
            debug!("Ignoring reveal step from generation {}", generation);
            return RevealProgress::Stale;
        }
        let Some(mut reveal) = self.reveal.take() else {
            return RevealProgress::Stale;
        };

        let next = reveal.text[reveal.shown..]
            .chars()
            .next()
            .map_or(reveal.text.len(), |c| reveal.shown + c.len_utf8());
        reveal.shown = next;

        let partial = &reveal.text[..reveal.shown];
        if !self.set_content(reveal.target, partial) {
            warn!("Reveal target {:?} vanished mid-reveal", reveal.target);
            return RevealProgress::Stale;
        }
        if reveal.stick {
            self.scroll.scroll_to_bottom(ScrollMotion::Instant);
        }

        if reveal.shown >= reveal.text.len() {
            self.finish_reveal(reveal);
            RevealProgress::Finished
        } else {
            self.reveal = Some(reveal);
            RevealProgress::Continue
        }
    }

    fn finish_reveal(&mut self, reveal: Reveal) {
        self.set_content(reveal.target, &reveal.text);
        if reveal.stick {
            self.scroll.scroll_to_bottom(ScrollMotion::Smooth);
        }
        self.remove_placeholder();
        if let Some(pos) = self.entries.iter().position(|e| e.id == reveal.target) {
            let entry = self.new_entry(Block::Hud(reveal.hud));
            self.entries.insert(pos + 1, entry);
        }
    }

    fn set_content(&mut self, id: BlockId, text: &str) -> bool {
        match self.entries.iter_mut().find(|e| e.id == id) {
            Some(entry) => {
                if let Block::Message { content, .. } = &mut entry.block {
                    content.clear();
                    content.push_str(text);
                    entry.version += 1;
                }
                true
            }
            None => false,
        }
    }

    fn find_placeholder_mut(&mut self) -> Option<&mut Entry> {
        self.entries
            .iter_mut()
            .find(|e| matches!(e.block, Block::Placeholder { .. }))
    }

    fn new_entry(&mut self, block: Block) -> Entry {
        let id = BlockId(self.next_id);
        self.next_id += 1;
        Entry {
            id,
            version: 0,
            block,
        }
    }

    fn push(&mut self, block: Block) -> BlockId {
        let entry = self.new_entry(block);
        let id = entry.id;
        self.entries.push(entry);
        id
    }
}
