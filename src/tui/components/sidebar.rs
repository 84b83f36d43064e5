//! # Sidebar Component
//!
//! Project tree on the left: projects expand into their phases, the active
//! phase is highlighted, and projects can be renamed or deleted in place.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `SidebarState` lives in `TuiState` (cursor, inline rename, delete confirmation)
//! - `Sidebar` is created each frame with borrowed state and the `Navigator` as a prop
//!
//! The tree itself is owned by `core::nav`; this component only reads it and
//! turns keys into `SidebarEvent`s for the event loop to dispatch.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, List, ListItem, ListState, Padding, Paragraph};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::core::nav::{ListStatus, NavRow, Navigator};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarMode {
    Browse,
    /// Inline title editor for a project
    Rename { slug: String, buffer: String },
    /// Waiting for y/n on a delete
    ConfirmDelete { slug: String, title: String },
}

/// Events emitted by the sidebar.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SidebarEvent {
    Select { project: String, phase: String },
    Toggle(String),
    Rename { slug: String, new_title: String },
    Delete(String),
    NewProject,
    Dismiss,
}

/// Persistent state for the sidebar.
pub struct SidebarState {
    pub cursor: usize,
    pub mode: SidebarMode,
    list_state: ListState,
}

impl Default for SidebarState {
    fn default() -> Self {
        Self::new()
    }
}

impl SidebarState {
    pub fn new() -> Self {
        Self {
            cursor: 0,
            mode: SidebarMode::Browse,
            list_state: ListState::default(),
        }
    }

    /// Handle a key event, returning a SidebarEvent if the loop should act.
    pub fn handle_event(&mut self, event: &TuiEvent, nav: &Navigator) -> Option<SidebarEvent> {
        match std::mem::replace(&mut self.mode, SidebarMode::Browse) {
            SidebarMode::Browse => self.browse(event, nav),
            SidebarMode::Rename { slug, buffer } => self.rename(event, nav, slug, buffer),
            SidebarMode::ConfirmDelete { slug, title } => match event {
                TuiEvent::InputChar('y') | TuiEvent::InputChar('Y') | TuiEvent::Submit => {
                    Some(SidebarEvent::Delete(slug))
                }
                TuiEvent::InputChar('n') | TuiEvent::InputChar('N') | TuiEvent::Escape => None,
                _ => {
                    self.mode = SidebarMode::ConfirmDelete { slug, title };
                    None
                }
            },
        }
    }

    fn browse(&mut self, event: &TuiEvent, nav: &Navigator) -> Option<SidebarEvent> {
        let rows = nav.rows();
        self.cursor = self.cursor.min(rows.len().saturating_sub(1));
        let current = rows.get(self.cursor);

        match event {
            TuiEvent::Escape => Some(SidebarEvent::Dismiss),
            TuiEvent::CursorUp => {
                self.cursor = self.cursor.saturating_sub(1);
                None
            }
            TuiEvent::CursorDown => {
                if self.cursor + 1 < rows.len() {
                    self.cursor += 1;
                }
                None
            }
            TuiEvent::Submit | TuiEvent::InputChar(' ') => match current? {
                NavRow::Project { slug, .. } => Some(SidebarEvent::Toggle(slug.to_string())),
                NavRow::Phase { slug, phase, .. } => Some(SidebarEvent::Select {
                    project: slug.to_string(),
                    phase: phase.to_string(),
                }),
            },
            TuiEvent::InputChar('n') => Some(SidebarEvent::NewProject),
            TuiEvent::InputChar('r') => {
                let slug = row_slug(current?);
                let buffer = nav.title_of(slug).unwrap_or(slug).to_string();
                self.mode = SidebarMode::Rename {
                    slug: slug.to_string(),
                    buffer,
                };
                None
            }
            TuiEvent::InputChar('d') => {
                let slug = row_slug(current?);
                let title = nav.title_of(slug).unwrap_or(slug).to_string();
                self.mode = SidebarMode::ConfirmDelete {
                    slug: slug.to_string(),
                    title,
                };
                None
            }
            _ => None,
        }
    }

    fn rename(
        &mut self,
        event: &TuiEvent,
        nav: &Navigator,
        slug: String,
        mut buffer: String,
    ) -> Option<SidebarEvent> {
        match event {
            TuiEvent::Escape => return None,
            TuiEvent::Submit => {
                let new_title = buffer.trim();
                let unchanged = nav.title_of(&slug) == Some(new_title);
                if new_title.is_empty() || unchanged {
                    log::debug!("Rename of {} cancelled", slug);
                    return None;
                }
                return Some(SidebarEvent::Rename {
                    new_title: new_title.to_string(),
                    slug,
                });
            }
            TuiEvent::InputChar('\n') => {}
            TuiEvent::InputChar(c) => buffer.push(*c),
            TuiEvent::Paste(text) => buffer.push_str(&text.replace(['\r', '\n'], " ")),
            TuiEvent::Backspace => {
                buffer.pop();
            }
            _ => {}
        }
        self.mode = SidebarMode::Rename { slug, buffer };
        None
    }

    /// Project pending a delete confirmation, if any.
    pub fn confirming(&self) -> Option<&str> {
        match &self.mode {
            SidebarMode::ConfirmDelete { title, .. } => Some(title.as_str()),
            _ => None,
        }
    }

    /// Leave rename/confirm modes, e.g. when focus moves away.
    pub fn reset_mode(&mut self) {
        self.mode = SidebarMode::Browse;
    }

    /// Put the cursor on the active phase row, if it is visible.
    pub fn follow_active(&mut self, nav: &Navigator) {
        if let Some(i) = nav
            .rows()
            .iter()
            .position(|row| matches!(row, NavRow::Phase { active: true, .. }))
        {
            self.cursor = i;
        }
    }
}

fn row_slug<'a>(row: &NavRow<'a>) -> &'a str {
    match *row {
        NavRow::Project { slug, .. } | NavRow::Phase { slug, .. } => slug,
    }
}

/// Transient render wrapper for the sidebar.
pub struct Sidebar<'a> {
    state: &'a mut SidebarState,
    nav: &'a Navigator,
    focused: bool,
}

impl<'a> Sidebar<'a> {
    pub fn new(state: &'a mut SidebarState, nav: &'a Navigator, focused: bool) -> Self {
        Self {
            state,
            nav,
            focused,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border = if self.focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let help = match self.state.mode {
            _ if !self.focused => " Tab: focus ",
            SidebarMode::Rename { .. } => " ⏎ save · Esc cancel ",
            _ => " r rename · d delete · n new ",
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .border_style(border)
            .title(" Projects ")
            .title_bottom(Line::from(help).centered())
            .padding(Padding::horizontal(1));

        let message = match self.nav.status() {
            ListStatus::Loading if self.nav.projects().is_empty() => {
                Some(("Loading…", Color::DarkGray))
            }
            ListStatus::Failed => Some(("Failed to load projects", Color::Red)),
            _ if self.nav.projects().is_empty() => Some(("No projects", Color::DarkGray)),
            _ => None,
        };
        if let Some((text, color)) = message {
            let empty = Paragraph::new(text)
                .style(Style::default().fg(color))
                .alignment(Alignment::Center)
                .block(block);
            frame.render_widget(empty, area);
            return;
        }

        let rows = self.nav.rows();
        self.state.cursor = self.state.cursor.min(rows.len().saturating_sub(1));
        let width = usize::from(area.width.saturating_sub(4));

        let items: Vec<ListItem> = rows
            .iter()
            .map(|row| ListItem::new(self.row_line(row, width)))
            .collect();

        self.state
            .list_state
            .select(self.focused.then_some(self.state.cursor));

        let list = List::new(items)
            .block(block)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.state.list_state);
    }

    fn row_line(&self, row: &NavRow<'_>, width: usize) -> Line<'static> {
        match *row {
            NavRow::Project { slug, title, expanded } => {
                if let SidebarMode::Rename { slug: editing, buffer } = &self.state.mode
                    && editing == slug
                {
                    let shown = truncate_start(buffer, width.saturating_sub(3));
                    return Line::from(vec![
                        Span::styled("✎ ", Style::default().fg(Color::Yellow)),
                        Span::styled(shown, Style::default().fg(Color::Yellow)),
                        Span::styled("▏", Style::default().fg(Color::Yellow)),
                    ]);
                }
                let marker = if expanded { "▾ " } else { "▸ " };
                Line::from(vec![
                    Span::raw(marker),
                    Span::styled(
                        truncate(title, width.saturating_sub(2)),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                ])
            }
            NavRow::Phase { phase, active, .. } => {
                let (marker, style) = if active {
                    ("  ● ", Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
                } else {
                    ("  · ", Style::default().fg(Color::Gray))
                };
                Line::from(vec![
                    Span::styled(marker, style),
                    Span::styled(truncate(phase, width.saturating_sub(4)), style),
                ])
            }
        }
    }
}

/// Cut `s` to `max` display columns, ending with "…" when shortened.
fn truncate(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// Keep the last `max` columns of `s` so the end being typed stays visible.
fn truncate_start(s: &str, max: usize) -> String {
    if s.width() <= max {
        return s.to_string();
    }
    let mut kept = Vec::new();
    let mut used = 0;
    for c in s.chars().rev() {
        let w = c.width().unwrap_or(0);
        if used + w > max {
            break;
        }
        kept.push(c);
        used += w;
    }
    kept.into_iter().rev().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ProjectSummary;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn summary(slug: &str, title: &str, phases: &[&str]) -> ProjectSummary {
        ProjectSummary {
            project: slug.to_string(),
            title: title.to_string(),
            phases: phases.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn nav_with_alpha_expanded() -> Navigator {
        let mut nav = Navigator::new();
        nav.load(
            vec![
                summary("alpha", "Alpha", &["phase2", "main"]),
                summary("beta", "Beta", &["main"]),
            ],
            Some("Alpha"),
        );
        nav
    }

    fn rendered(state: &mut SidebarState, nav: &Navigator, focused: bool) -> String {
        let mut terminal = Terminal::new(TestBackend::new(30, 10)).unwrap();
        terminal
            .draw(|f| Sidebar::new(state, nav, focused).render(f, f.area()))
            .unwrap();
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn enter_toggles_projects_and_selects_phases() {
        let nav = nav_with_alpha_expanded();
        let mut state = SidebarState::new();

        assert_eq!(
            state.handle_event(&TuiEvent::Submit, &nav),
            Some(SidebarEvent::Toggle("alpha".into()))
        );

        state.handle_event(&TuiEvent::CursorDown, &nav);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit, &nav),
            Some(SidebarEvent::Select {
                project: "alpha".into(),
                phase: "main".into(),
            })
        );
    }

    #[test]
    fn cursor_stays_within_rows() {
        let nav = nav_with_alpha_expanded();
        let mut state = SidebarState::new();
        state.handle_event(&TuiEvent::CursorUp, &nav);
        assert_eq!(state.cursor, 0);
        for _ in 0..10 {
            state.handle_event(&TuiEvent::CursorDown, &nav);
        }
        // alpha, main, phase2, beta
        assert_eq!(state.cursor, 3);
    }

    #[test]
    fn rename_is_prefilled_and_commits_trimmed_title() {
        let nav = nav_with_alpha_expanded();
        let mut state = SidebarState::new();
        state.handle_event(&TuiEvent::InputChar('r'), &nav);
        assert_eq!(
            state.mode,
            SidebarMode::Rename {
                slug: "alpha".into(),
                buffer: "Alpha".into(),
            }
        );

        state.handle_event(&TuiEvent::InputChar(' '), &nav);
        state.handle_event(&TuiEvent::InputChar('2'), &nav);
        state.handle_event(&TuiEvent::InputChar(' '), &nav);
        assert_eq!(
            state.handle_event(&TuiEvent::Submit, &nav),
            Some(SidebarEvent::Rename {
                slug: "alpha".into(),
                new_title: "Alpha 2".into(),
            })
        );
        assert_eq!(state.mode, SidebarMode::Browse);
    }

    #[test]
    fn rename_with_empty_or_unchanged_title_cancels() {
        let nav = nav_with_alpha_expanded();
        let mut state = SidebarState::new();

        state.handle_event(&TuiEvent::InputChar('r'), &nav);
        assert_eq!(state.handle_event(&TuiEvent::Submit, &nav), None);
        assert_eq!(state.mode, SidebarMode::Browse);

        state.handle_event(&TuiEvent::InputChar('r'), &nav);
        for _ in 0.."Alpha".len() {
            state.handle_event(&TuiEvent::Backspace, &nav);
        }
        assert_eq!(state.handle_event(&TuiEvent::Submit, &nav), None);
        assert_eq!(state.mode, SidebarMode::Browse);
    }

    #[test]
    fn escape_cancels_rename_without_dismissing() {
        let nav = nav_with_alpha_expanded();
        let mut state = SidebarState::new();
        state.handle_event(&TuiEvent::InputChar('r'), &nav);
        assert_eq!(state.handle_event(&TuiEvent::Escape, &nav), None);
        assert_eq!(state.mode, SidebarMode::Browse);
        assert_eq!(
            state.handle_event(&TuiEvent::Escape, &nav),
            Some(SidebarEvent::Dismiss)
        );
    }

    #[test]
    fn delete_requires_confirmation() {
        let nav = nav_with_alpha_expanded();
        let mut state = SidebarState::new();
        state.cursor = 3;

        assert_eq!(state.handle_event(&TuiEvent::InputChar('d'), &nav), None);
        assert_eq!(state.confirming(), Some("Beta"));

        // Unrelated keys keep the prompt open
        assert_eq!(state.handle_event(&TuiEvent::CursorUp, &nav), None);
        assert_eq!(state.confirming(), Some("Beta"));

        assert_eq!(state.handle_event(&TuiEvent::InputChar('n'), &nav), None);
        assert_eq!(state.confirming(), None);

        state.handle_event(&TuiEvent::InputChar('d'), &nav);
        assert_eq!(
            state.handle_event(&TuiEvent::InputChar('y'), &nav),
            Some(SidebarEvent::Delete("beta".into()))
        );
    }

    #[test]
    fn delete_from_a_phase_row_targets_its_project() {
        let nav = nav_with_alpha_expanded();
        let mut state = SidebarState::new();
        state.cursor = 2;
        state.handle_event(&TuiEvent::InputChar('d'), &nav);
        assert_eq!(state.confirming(), Some("Alpha"));
    }

    #[test]
    fn follow_active_moves_cursor_to_active_phase() {
        let mut nav = nav_with_alpha_expanded();
        nav.set_active("alpha", "phase2");
        let mut state = SidebarState::new();
        state.follow_active(&nav);
        assert_eq!(state.cursor, 2);
    }

    #[test]
    fn render_shows_tree_with_markers() {
        let nav = nav_with_alpha_expanded();
        let mut state = SidebarState::new();
        let text = rendered(&mut state, &nav, true);
        assert!(text.contains("Projects"));
        assert!(text.contains("▾ Alpha"));
        assert!(text.contains("· main"));
        assert!(text.contains("· phase2"));
        assert!(text.contains("▸ Beta"));
    }

    #[test]
    fn render_marks_the_active_phase() {
        let mut nav = nav_with_alpha_expanded();
        nav.set_active("alpha", "main");
        let mut state = SidebarState::new();
        let text = rendered(&mut state, &nav, false);
        assert!(text.contains("● main"));
    }

    #[test]
    fn render_shows_empty_and_failed_states() {
        let mut nav = Navigator::new();
        nav.load(Vec::new(), None);
        let mut state = SidebarState::new();
        assert!(rendered(&mut state, &nav, false).contains("No projects"));

        nav.mark_failed();
        assert!(rendered(&mut state, &nav, false).contains("Failed to load projects"));
    }

    #[test]
    fn truncate_respects_display_width() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("a long title", 6), "a lon…");
        assert_eq!(truncate_start("abcdef", 3), "def");
    }
}
