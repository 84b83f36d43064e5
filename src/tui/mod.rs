//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! translates keyboard events into `core::Action` values and runs the
//! effects the reducer returns.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! The event loop uses conditional redraw to avoid unnecessary work:
//!
//! - **Animating** (request in flight, typewriter running, smooth scroll
//!   pending): draws every ~40ms so the spinner and reveal stay fluid.
//! - **Idle**: sleeps up to 150ms, only redraws on input, resize or an
//!   action coming back from a background task.
//!
//! A `SteadyBlock` cursor style is used instead of a blinking cursor because
//! ratatui's `set_cursor_position` resets the terminal's blink timer on every
//! `draw()` call, making blinking cursors appear erratic during continuous redraws.

mod component;
mod components;
mod effects;
mod event;
pub mod markdown;
mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, SetCursorStyle, Show};
use crossterm::event::{
    DisableBracketedPaste, DisableMouseCapture, EnableBracketedPaste, EnableMouseCapture,
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::Action;
use crate::core::config::ResolvedConfig;
use crate::core::state::App;
use crate::gateway::{Backend, HttpBackend};
use crate::tui::component::EventHandler;
use crate::tui::components::{Composer, ComposerEvent, MessageListState, SidebarEvent, SidebarState};
use crate::tui::effects::Executor;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const ANIMATION_TICK: Duration = Duration::from_millis(40);
const IDLE_TICK: Duration = Duration::from_millis(150);
/// Rows moved per mouse wheel notch.
const WHEEL_ROWS: u16 = 3;

/// Which pane receives keys that are not global shortcuts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Composer,
    Sidebar,
}

/// TUI-specific presentation state (not part of core business logic)
pub struct TuiState {
    // Persistent component states
    pub message_list: MessageListState,
    pub composer: Composer,
    pub sidebar: SidebarState,
    pub focus: Focus,
    pub sidebar_width: u16,
}

impl TuiState {
    pub fn new(sidebar_width: u16) -> Self {
        Self {
            message_list: MessageListState::new(),
            composer: Composer::new(),
            sidebar: SidebarState::new(),
            focus: Focus::Composer, // User expects to type immediately
            sidebar_width,
        }
    }

    fn toggle_focus(&mut self, app: &App) {
        self.focus = match self.focus {
            Focus::Composer => {
                self.sidebar.follow_active(&app.nav);
                Focus::Sidebar
            }
            Focus::Sidebar => {
                self.sidebar.reset_mode();
                Focus::Composer
            }
        };
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Kitty keyboard protocol lets Shift+Enter through; terminals that
        // don't speak it ignore the request
        execute!(
            stdout(),
            EnableMouseCapture,
            EnableBracketedPaste,
            Show,
            SetCursorStyle::SteadyBlock,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (mouse, bracketed paste, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(
            stdout(),
            PopKeyboardEnhancementFlags,
            DisableMouseCapture,
            DisableBracketedPaste,
            Hide
        );
    }
}

pub fn run(config: ResolvedConfig) -> std::io::Result<()> {
    info!("Using backend at {}", config.base_url);
    let backend: Arc<dyn Backend> = Arc::new(HttpBackend::new(
        config.base_url.clone(),
        config.request_timeout,
    ));

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let executor = Executor::new(backend, tx, &config);

    let mut app = App::new();
    let mut tui = TuiState::new(config.sidebar_width);
    executor.dispatch(&mut app, Action::RefreshProjects);

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new()
        .inspect_err(|e| warn!("Failed to enable terminal modes: {}", e))
        .ok();

    let start_time = Instant::now();
    let mut needs_redraw = true; // Force first frame

    loop {
        let animating = app.is_loading()
            || app.transcript.loader_visible()
            || app.transcript.scroll.pending().is_some();
        if animating {
            needs_redraw = true;
        }

        if needs_redraw {
            tui.composer.busy = app.is_loading();
            let spinner_frame = (start_time.elapsed().as_secs_f32() * 12.0) as usize;
            terminal.draw(|f| ui::draw_ui(f, &mut app, &mut tui, spinner_frame))?;
            needs_redraw = false;
        }

        let timeout = if animating { ANIMATION_TICK } else { IDLE_TICK };
        let first_event = poll_event_timeout(timeout)?;

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        let mut events = first_event.into_iter().collect::<Vec<_>>();
        while let Some(event) = poll_event_immediate()? {
            events.push(event);
        }
        for event in events {
            if handle_event(event, &mut app, &mut tui, &executor) {
                should_quit = true;
                break;
            }
        }
        if should_quit {
            break;
        }

        // Results and timer ticks from background tasks
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {:?}", action);
            let follow = matches!(action, Action::ProjectsLoaded { .. });
            if executor.dispatch(&mut app, action) {
                should_quit = true;
                break;
            }
            if follow && tui.focus == Focus::Composer {
                tui.sidebar.follow_active(&app.nav);
            }
        }
        if should_quit {
            break;
        }
    }

    info!("Shutting down");
    ratatui::restore();
    Ok(())
}

/// Route one terminal event. Returns `true` when the app should exit.
fn handle_event(event: TuiEvent, app: &mut App, tui: &mut TuiState, executor: &Executor) -> bool {
    // Global shortcuts work in either pane
    let global = match event {
        TuiEvent::Resize => return false,
        TuiEvent::Quit => Some(Action::Quit),
        TuiEvent::SaveContext => Some(Action::SaveContext),
        TuiEvent::NewProject => {
            tui.focus = Focus::Composer;
            tui.sidebar.reset_mode();
            Some(Action::NewProject)
        }
        TuiEvent::RefreshProjects => Some(Action::RefreshProjects),
        TuiEvent::ScrollUp => Some(Action::ScrollUp(WHEEL_ROWS)),
        TuiEvent::ScrollDown => Some(Action::ScrollDown(WHEEL_ROWS)),
        TuiEvent::ScrollPageUp => Some(Action::ScrollUp(tui.message_list.page_rows())),
        TuiEvent::ScrollPageDown => Some(Action::ScrollDown(tui.message_list.page_rows())),
        TuiEvent::ScrollToBottom => Some(Action::ScrollToBottom),
        TuiEvent::FocusNext => {
            tui.toggle_focus(app);
            return false;
        }
        _ => None,
    };
    if let Some(action) = global {
        return executor.dispatch(app, action);
    }

    match tui.focus {
        Focus::Sidebar => {
            let Some(sidebar_event) = tui.sidebar.handle_event(&event, &app.nav) else {
                return false;
            };
            let action = match sidebar_event {
                SidebarEvent::Select { project, phase } => {
                    tui.focus = Focus::Composer;
                    Action::SelectPhase { project, phase }
                }
                SidebarEvent::Toggle(slug) => Action::ToggleProject(slug),
                SidebarEvent::Rename { slug, new_title } => {
                    Action::RenameProject { slug, new_title }
                }
                SidebarEvent::Delete(slug) => Action::DeleteProject { slug },
                SidebarEvent::NewProject => {
                    tui.focus = Focus::Composer;
                    Action::NewProject
                }
                SidebarEvent::Dismiss => {
                    tui.focus = Focus::Composer;
                    return false;
                }
            };
            executor.dispatch(app, action)
        }
        Focus::Composer => {
            tui.composer.busy = app.is_loading();
            match tui.composer.handle_event(&event) {
                Some(ComposerEvent::Submit(text)) => executor.dispatch(app, Action::Submit(text)),
                Some(ComposerEvent::Changed) | None => false,
            }
        }
    }
}
