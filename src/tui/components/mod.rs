//! # TUI Components
//!
//! All UI components for the terminal interface.
//!
//! ## Component Architecture
//!
//! Components follow two patterns:
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Built fresh every frame from the data they show:
//! - `HeaderBar`: active project label and the save button
//! - `MessageView`: one transcript block
//! - `StatusLine`: status text, last memory write, key hints
//! - `Toasts`: transient notices
//! - `ConfirmPrompt`: delete confirmation overlay
//!
//! ### Stateful Components (Event-Driven)
//!
//! Keep state across frames in `TuiState` and emit high-level events:
//! - `Composer`: prompt editor
//! - `MessageList`: scrollable transcript with layout caching
//! - `Sidebar`: project tree with inline rename and delete
//!
//! Components receive external data as props, never by reaching into `App`.
//! The event loop owns the wiring between component events and core actions.
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── composer/        (prompt editor, row layout)
//! ├── confirm.rs       (modal y/n prompt)
//! ├── header_bar.rs    (top line)
//! ├── message.rs       (single block renderer)
//! ├── message_list.rs  (scrollable transcript)
//! ├── sidebar.rs       (project tree)
//! ├── status_line.rs   (bottom line)
//! └── toasts.rs        (notices)
//! ```

pub mod composer;
pub mod confirm;
pub mod header_bar;
pub mod message;
pub mod message_list;
pub mod sidebar;
pub mod status_line;
pub mod toasts;

pub use composer::{Composer, ComposerEvent};
pub use confirm::ConfirmPrompt;
pub use header_bar::HeaderBar;
pub use message_list::{MessageList, MessageListState};
pub use sidebar::{Sidebar, SidebarEvent, SidebarState};
pub use status_line::StatusLine;
pub use toasts::Toasts;
