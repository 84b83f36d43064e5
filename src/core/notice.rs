//! Transient notifications. Each one is dismissed by id once its timer fires.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: u64,
    pub text: String,
    pub kind: NoticeKind,
}

#[derive(Debug, Clone, Default)]
pub struct Notices {
    items: Vec<Notice>,
    next_id: u64,
}

impl Notices {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push(&mut self, text: impl Into<String>, kind: NoticeKind) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        let text = text.into();
        match kind {
            NoticeKind::Success => log::info!("Notice #{}: {}", id, text),
            NoticeKind::Error => log::warn!("Notice #{}: {}", id, text),
        }
        self.items.push(Notice { id, text, kind });
        id
    }

    pub(crate) fn dismiss(&mut self, id: u64) {
        self.items.retain(|n| n.id != id);
    }

    /// Newest first.
    pub fn newest_first(&self) -> impl Iterator<Item = &Notice> {
        self.items.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_assigns_increasing_ids_and_lists_newest_first() {
        let mut notices = Notices::new();
        let a = notices.push("first", NoticeKind::Success);
        let b = notices.push("second", NoticeKind::Error);
        assert!(b > a);
        let texts: Vec<&str> = notices.newest_first().map(|n| n.text.as_str()).collect();
        assert_eq!(texts, vec!["second", "first"]);
    }

    #[test]
    fn dismiss_removes_only_that_notice() {
        let mut notices = Notices::new();
        let a = notices.push("a", NoticeKind::Success);
        notices.push("b", NoticeKind::Success);
        notices.dismiss(a);
        notices.dismiss(a);
        assert_eq!(notices.len(), 1);
        assert_eq!(notices.newest_first().next().unwrap().text, "b");
    }
}
