use std::io;
use std::time::Duration;

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind,
};

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    // Global intents (routed to core::update)
    Quit,
    SaveContext,
    NewProject,
    RefreshProjects,

    // Focus handling
    Escape,
    FocusNext,

    // Editing (composer, sidebar rename)
    Submit,
    InputChar(char),
    Paste(String), // Bracketed paste - preserves newlines
    Backspace,
    Delete,
    DeleteWordBack,
    CursorLeft,
    CursorRight,
    CursorWordLeft,
    CursorWordRight,
    CursorUp,
    CursorDown,
    CursorHome,
    CursorEnd,

    // Transcript scrolling
    ScrollUp,
    ScrollDown,
    ScrollPageUp,
    ScrollPageDown,
    ScrollToBottom, // Ctrl+End - also re-pins to the bottom

    Resize,
}

/// Poll for an event with timeout (blocks up to `timeout`)
pub fn poll_event_timeout(timeout: Duration) -> io::Result<Option<TuiEvent>> {
    if !event::poll(timeout)? {
        return Ok(None);
    }
    Ok(translate(event::read()?))
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> io::Result<Option<TuiEvent>> {
    poll_event_timeout(Duration::ZERO)
}

/// Map a raw crossterm event to a `TuiEvent`.
pub fn translate(event: Event) -> Option<TuiEvent> {
    match event {
        Event::Key(key) => translate_key(key),
        Event::Mouse(mouse) => match mouse.kind {
            MouseEventKind::ScrollUp => Some(TuiEvent::ScrollUp),
            MouseEventKind::ScrollDown => Some(TuiEvent::ScrollDown),
            _ => None,
        },
        Event::Paste(data) => Some(TuiEvent::Paste(data)),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

fn translate_key(key: KeyEvent) -> Option<TuiEvent> {
    // Some terminals report releases too
    if key.kind == KeyEventKind::Release {
        return None;
    }
    log::trace!("Key event: {:?} with modifiers {:?}", key.code, key.modifiers);

    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    let alt = key.modifiers.contains(KeyModifiers::ALT);
    let shift = key.modifiers.contains(KeyModifiers::SHIFT);

    match key.code {
        KeyCode::Char('c') | KeyCode::Char('q') if ctrl => Some(TuiEvent::Quit),
        KeyCode::Char('s') if ctrl => Some(TuiEvent::SaveContext),
        KeyCode::Char('n') if ctrl => Some(TuiEvent::NewProject),
        KeyCode::Char('r') if ctrl => Some(TuiEvent::RefreshProjects),
        // Ctrl+J is ASCII LF; Ctrl+Enter sends this in most terminals
        KeyCode::Char('j') if ctrl => Some(TuiEvent::InputChar('\n')),
        KeyCode::Char('w') if ctrl => Some(TuiEvent::DeleteWordBack),
        KeyCode::Char('b') if alt => Some(TuiEvent::CursorWordLeft),
        KeyCode::Char('f') if alt => Some(TuiEvent::CursorWordRight),
        KeyCode::Char(_) if ctrl => None,
        KeyCode::Char(c) => Some(TuiEvent::InputChar(c)),

        KeyCode::Enter if shift || alt => Some(TuiEvent::InputChar('\n')),
        KeyCode::Enter => Some(TuiEvent::Submit),
        KeyCode::Esc => Some(TuiEvent::Escape),
        KeyCode::Tab | KeyCode::BackTab => Some(TuiEvent::FocusNext),
        KeyCode::Backspace => Some(TuiEvent::Backspace),
        KeyCode::Delete => Some(TuiEvent::Delete),

        KeyCode::Left if ctrl || alt => Some(TuiEvent::CursorWordLeft),
        KeyCode::Right if ctrl || alt => Some(TuiEvent::CursorWordRight),
        KeyCode::Left => Some(TuiEvent::CursorLeft),
        KeyCode::Right => Some(TuiEvent::CursorRight),
        KeyCode::Up => Some(TuiEvent::CursorUp),
        KeyCode::Down => Some(TuiEvent::CursorDown),
        KeyCode::Home => Some(TuiEvent::CursorHome),
        KeyCode::End if ctrl => Some(TuiEvent::ScrollToBottom),
        KeyCode::End => Some(TuiEvent::CursorEnd),
        KeyCode::PageUp => Some(TuiEvent::ScrollPageUp),
        KeyCode::PageDown => Some(TuiEvent::ScrollPageDown),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventState, MouseEvent};

    fn key(code: KeyCode, modifiers: KeyModifiers) -> Event {
        Event::Key(KeyEvent::new(code, modifiers))
    }

    #[test]
    fn control_chords_map_to_global_intents() {
        let ctrl = KeyModifiers::CONTROL;
        assert_eq!(translate(key(KeyCode::Char('c'), ctrl)), Some(TuiEvent::Quit));
        assert_eq!(translate(key(KeyCode::Char('s'), ctrl)), Some(TuiEvent::SaveContext));
        assert_eq!(translate(key(KeyCode::Char('n'), ctrl)), Some(TuiEvent::NewProject));
        assert_eq!(translate(key(KeyCode::Char('r'), ctrl)), Some(TuiEvent::RefreshProjects));
        assert_eq!(translate(key(KeyCode::Char('x'), ctrl)), None);
    }

    #[test]
    fn enter_submits_and_modified_enter_inserts_newline() {
        assert_eq!(translate(key(KeyCode::Enter, KeyModifiers::NONE)), Some(TuiEvent::Submit));
        assert_eq!(
            translate(key(KeyCode::Enter, KeyModifiers::SHIFT)),
            Some(TuiEvent::InputChar('\n'))
        );
        assert_eq!(
            translate(key(KeyCode::Char('j'), KeyModifiers::CONTROL)),
            Some(TuiEvent::InputChar('\n'))
        );
    }

    #[test]
    fn shifted_characters_are_typed() {
        assert_eq!(
            translate(key(KeyCode::Char('A'), KeyModifiers::SHIFT)),
            Some(TuiEvent::InputChar('A'))
        );
    }

    #[test]
    fn end_moves_cursor_unless_control_is_held() {
        assert_eq!(translate(key(KeyCode::End, KeyModifiers::NONE)), Some(TuiEvent::CursorEnd));
        assert_eq!(
            translate(key(KeyCode::End, KeyModifiers::CONTROL)),
            Some(TuiEvent::ScrollToBottom)
        );
    }

    #[test]
    fn key_release_is_ignored() {
        let release = KeyEvent {
            code: KeyCode::Char('a'),
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Release,
            state: KeyEventState::NONE,
        };
        assert_eq!(translate(Event::Key(release)), None);
    }

    #[test]
    fn mouse_wheel_scrolls() {
        let wheel = |kind| {
            Event::Mouse(MouseEvent {
                kind,
                column: 0,
                row: 0,
                modifiers: KeyModifiers::NONE,
            })
        };
        assert_eq!(translate(wheel(MouseEventKind::ScrollUp)), Some(TuiEvent::ScrollUp));
        assert_eq!(translate(wheel(MouseEventKind::ScrollDown)), Some(TuiEvent::ScrollDown));
        assert_eq!(translate(wheel(MouseEventKind::Moved)), None);
    }

    #[test]
    fn paste_and_resize_pass_through() {
        assert_eq!(
            translate(Event::Paste("a\nb".into())),
            Some(TuiEvent::Paste("a\nb".into()))
        );
        assert_eq!(translate(Event::Resize(80, 24)), Some(TuiEvent::Resize));
    }
}
