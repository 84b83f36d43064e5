//! Frame layout: sidebar on the left, conversation column on the right,
//! status line across the bottom, overlays on top.
//!
//! ```text
//! ┌ Projects ┐ header bar                      ^S Save
//! │ ▾ Alpha  │ ╭ you ───────────────────────────────╮
//! │  ● ph 1  │ │ ...                                 │
//! │          │ ╭ Message ───────────────────────────╮
//! └──────────┘ ╰─────────────────────────────────────╯
//!  status                                   key hints
//! ```

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::tui::component::Component;
use crate::tui::components::{ConfirmPrompt, HeaderBar, MessageList, Sidebar, StatusLine, Toasts};
use crate::tui::{Focus, TuiState};

/// Conversation column never shrinks below this many columns.
const MIN_CHAT_WIDTH: u16 = 40;

pub fn draw_ui(frame: &mut Frame, app: &mut App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};

    let area = frame.area();
    let [main_area, status_area] = Layout::vertical([Min(0), Length(1)]).areas(area);
    let sidebar_width = tui
        .sidebar_width
        .min(main_area.width.saturating_sub(MIN_CHAT_WIDTH));
    let [sidebar_area, chat_area] =
        Layout::horizontal([Length(sidebar_width), Min(0)]).areas(main_area);
    let composer_height = tui.composer.height(chat_area.width);
    let [header_area, messages_area, composer_area] =
        Layout::vertical([Length(1), Min(0), Length(composer_height)]).areas(chat_area);

    HeaderBar::new(
        app.header_label(),
        app.header.status(),
        app.header.save_enabled(),
    )
    .render(frame, header_area);

    MessageList::new(&mut tui.message_list, &mut app.transcript, spinner_frame)
        .render(frame, messages_area);

    tui.composer.busy = app.is_loading();
    tui.composer.focused = tui.focus == Focus::Composer;
    tui.composer.render(frame, composer_area);

    if sidebar_width > 0 {
        Sidebar::new(&mut tui.sidebar, &app.nav, tui.focus == Focus::Sidebar)
            .render(frame, sidebar_area);
    }

    StatusLine {
        status_message: &app.status_message,
        memory: app.session().memory_time_label(),
        spinner: app.is_loading().then_some(spinner_frame),
    }
    .render(frame, status_area);

    Toasts {
        notices: &app.notices,
    }
    .render(frame, messages_area);

    if let Some(title) = tui.sidebar.confirming() {
        ConfirmPrompt::delete_project(title).render(frame, area);
    }
}
