//! # Navigation
//!
//! The sidebar's project tree: one entry per project, each expandable into
//! its phases. At most one phase is active at a time.

use std::collections::HashSet;

use log::debug;

use crate::core::phase::sort_phases;
use crate::gateway::ProjectSummary;

#[derive(Debug, Clone, PartialEq)]
pub struct ProjectEntry {
    pub slug: String,
    pub title: String,
    pub phases: Vec<String>,
}

impl From<ProjectSummary> for ProjectEntry {
    fn from(summary: ProjectSummary) -> Self {
        let mut phases = summary.phases;
        sort_phases(&mut phases);
        let title = if summary.title.trim().is_empty() {
            summary.project.clone()
        } else {
            summary.title
        };
        Self {
            slug: summary.project,
            title,
            phases,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    Ready,
    Failed,
}

/// One visible line of the tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavRow<'a> {
    Project {
        slug: &'a str,
        title: &'a str,
        expanded: bool,
    },
    Phase {
        slug: &'a str,
        title: &'a str,
        phase: &'a str,
        active: bool,
    },
}

#[derive(Debug, Clone)]
pub struct Navigator {
    projects: Vec<ProjectEntry>,
    expanded: HashSet<String>,
    active: Option<(String, String)>,
    status: ListStatus,
}

impl Default for Navigator {
    fn default() -> Self {
        Self::new()
    }
}

impl Navigator {
    pub fn new() -> Self {
        Self {
            projects: Vec::new(),
            expanded: HashSet::new(),
            active: None,
            status: ListStatus::Loading,
        }
    }

    pub fn projects(&self) -> &[ProjectEntry] {
        &self.projects
    }

    pub fn status(&self) -> &ListStatus {
        &self.status
    }

    pub fn active(&self) -> Option<(&str, &str)> {
        self.active
            .as_ref()
            .map(|(slug, phase)| (slug.as_str(), phase.as_str()))
    }

    pub fn is_expanded(&self, slug: &str) -> bool {
        self.expanded.contains(slug)
    }

    pub fn title_of(&self, slug: &str) -> Option<&str> {
        self.projects
            .iter()
            .find(|p| p.slug == slug)
            .map(|p| p.title.as_str())
    }

    /// Replaces the tree with a fresh list from the backend. The project
    /// whose title equals `expand_title` is opened; expansion and the
    /// active entry survive for projects that still exist.
    pub fn load(&mut self, summaries: Vec<ProjectSummary>, expand_title: Option<&str>) {
        self.projects = summaries.into_iter().map(ProjectEntry::from).collect();
        let slugs: HashSet<&str> = self.projects.iter().map(|p| p.slug.as_str()).collect();
        self.expanded.retain(|slug| slugs.contains(slug.as_str()));

        if let Some(title) = expand_title
            && let Some(project) = self.projects.iter().find(|p| p.title == title)
        {
            self.expanded.insert(project.slug.clone());
        }

        let active_exists = self.active.as_ref().is_some_and(|(slug, phase)| {
            self.projects
                .iter()
                .any(|p| &p.slug == slug && p.phases.contains(phase))
        });
        if !active_exists {
            self.active = None;
        }
        self.status = ListStatus::Ready;
        debug!(
            "Project list loaded: {} projects, expand={:?}",
            self.projects.len(),
            expand_title
        );
    }

    pub fn mark_failed(&mut self) {
        self.projects.clear();
        self.active = None;
        self.status = ListStatus::Failed;
    }

    pub fn toggle(&mut self, slug: &str) {
        if !self.expanded.remove(slug) {
            self.expanded.insert(slug.to_string());
        }
    }

    /// Marks exactly one phase as active and opens its project.
    pub fn set_active(&mut self, slug: &str, phase: &str) {
        self.expanded.insert(slug.to_string());
        self.active = Some((slug.to_string(), phase.to_string()));
    }

    pub fn clear_active(&mut self) {
        self.active = None;
    }

    pub fn rename(&mut self, slug: &str, title: &str) -> bool {
        match self.projects.iter_mut().find(|p| p.slug == slug) {
            Some(project) => {
                project.title = title.to_string();
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, slug: &str) {
        self.projects.retain(|p| p.slug != slug);
        self.expanded.remove(slug);
        if self.active.as_ref().is_some_and(|(s, _)| s == slug) {
            self.active = None;
        }
    }

    /// Visible rows in display order.
    pub fn rows(&self) -> Vec<NavRow<'_>> {
        let mut rows = Vec::new();
        for project in &self.projects {
            let expanded = self.is_expanded(&project.slug);
            rows.push(NavRow::Project {
                slug: &project.slug,
                title: &project.title,
                expanded,
            });
            if !expanded {
                continue;
            }
            for phase in &project.phases {
                let active = self
                    .active
                    .as_ref()
                    .is_some_and(|(s, p)| s == &project.slug && p == phase);
                rows.push(NavRow::Phase {
                    slug: &project.slug,
                    title: &project.title,
                    phase,
                    active,
                });
            }
        }
        rows
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(slug: &str, title: &str, phases: &[&str]) -> ProjectSummary {
        ProjectSummary {
            project: slug.into(),
            title: title.into(),
            phases: phases.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn sample() -> Navigator {
        let mut nav = Navigator::new();
        nav.load(
            vec![
                summary("acme", "Acme", &["phase3", "main", "phase1"]),
                summary("globex", "Globex", &["main"]),
            ],
            None,
        );
        nav
    }

    fn active_count(nav: &Navigator) -> usize {
        nav.rows()
            .iter()
            .filter(|r| matches!(r, NavRow::Phase { active: true, .. }))
            .count()
    }

    #[test]
    fn load_sorts_phases_and_collapses_by_default() {
        let nav = sample();
        assert_eq!(nav.status(), &ListStatus::Ready);
        assert_eq!(nav.projects()[0].phases, vec!["main", "phase1", "phase3"]);
        assert_eq!(nav.rows().len(), 2);
    }

    #[test]
    fn load_expands_the_matching_title() {
        let mut nav = Navigator::new();
        nav.load(
            vec![summary("acme", "Acme", &["main", "phase1"]), summary("b", "B", &["main"])],
            Some("Acme"),
        );
        assert!(nav.is_expanded("acme"));
        assert!(!nav.is_expanded("b"));
        assert_eq!(nav.rows().len(), 4);
    }

    #[test]
    fn blank_title_falls_back_to_slug() {
        let mut nav = Navigator::new();
        nav.load(vec![summary("untitled-1", "  ", &["main"])], None);
        assert_eq!(nav.title_of("untitled-1"), Some("untitled-1"));
    }

    #[test]
    fn exactly_one_active_after_any_selection_sequence() {
        let mut nav = sample();
        nav.set_active("acme", "main");
        nav.set_active("globex", "main");
        nav.set_active("acme", "phase3");
        nav.toggle("globex");
        nav.toggle("globex");
        nav.expanded.insert("globex".into());
        assert_eq!(active_count(&nav), 1);
        assert_eq!(nav.active(), Some(("acme", "phase3")));
    }

    #[test]
    fn reload_keeps_active_and_expansion_of_surviving_projects() {
        let mut nav = sample();
        nav.set_active("acme", "phase1");
        nav.load(
            vec![
                summary("acme", "Acme", &["main", "phase1", "phase4"]),
                summary("initech", "Initech", &["main"]),
            ],
            None,
        );
        assert_eq!(nav.active(), Some(("acme", "phase1")));
        assert!(nav.is_expanded("acme"));
        assert_eq!(active_count(&nav), 1);
    }

    #[test]
    fn reload_drops_active_that_no_longer_exists() {
        let mut nav = sample();
        nav.set_active("globex", "main");
        nav.load(vec![summary("acme", "Acme", &["main"])], None);
        assert!(nav.active().is_none());
        assert!(!nav.is_expanded("globex"));
    }

    #[test]
    fn rename_and_remove() {
        let mut nav = sample();
        nav.set_active("acme", "main");
        assert!(nav.rename("acme", "Acme Corp"));
        assert!(!nav.rename("missing", "x"));
        assert_eq!(nav.title_of("acme"), Some("Acme Corp"));

        nav.remove("acme");
        assert!(nav.title_of("acme").is_none());
        assert!(nav.active().is_none());
    }

    #[test]
    fn failure_empties_the_tree() {
        let mut nav = sample();
        nav.mark_failed();
        assert_eq!(nav.status(), &ListStatus::Failed);
        assert!(nav.rows().is_empty());
    }
}
