//! Application-managed navigable history.
//!
//! Mirrors the browser session-history contract the UI was born under:
//! entries carry an optional pushed state object plus the query-string
//! mirror of the address bar. The pushed state only ever holds the path;
//! sort order lives in the query string alone, so traversing history does
//! not restore it.

/// State object attached to a pushed history entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PushedState {
    pub path: String,
}

/// One history entry: optional pushed state plus the URL query mirror.
///
/// The initial entry has no state, like the browser's initial entry whose
/// `history.state` is null.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
    pub state: Option<PushedState>,
    pub query: String,
}

/// Back/forward stack with a cursor.
#[derive(Debug)]
pub struct History {
    entries: Vec<HistoryEntry>,
    index: usize,
}

impl History {
    /// Start with a single stateless entry holding the initial query.
    pub fn new(initial_query: impl Into<String>) -> Self {
        Self {
            entries: vec![HistoryEntry {
                state: None,
                query: initial_query.into(),
            }],
            index: 0,
        }
    }

    /// Push a new entry, discarding any forward entries.
    pub fn push(&mut self, state: PushedState, query: String) {
        self.entries.truncate(self.index + 1);
        self.entries.push(HistoryEntry {
            state: Some(state),
            query,
        });
        self.index = self.entries.len() - 1;
    }

    /// Step back; returns the now-current entry, or `None` at the oldest.
    pub fn back(&mut self) -> Option<&HistoryEntry> {
        if self.index == 0 {
            return None;
        }
        self.index -= 1;
        Some(&self.entries[self.index])
    }

    /// Step forward; returns the now-current entry, or `None` at the newest.
    pub fn forward(&mut self) -> Option<&HistoryEntry> {
        if self.index + 1 >= self.entries.len() {
            return None;
        }
        self.index += 1;
        Some(&self.entries[self.index])
    }

    /// The current entry.
    #[allow(dead_code)]
    pub fn current(&self) -> &HistoryEntry {
        &self.entries[self.index]
    }

    /// Query string of the current entry (the address-bar mirror).
    pub fn current_query(&self) -> &str {
        &self.entries[self.index].query
    }

    /// Number of entries in the stack (back and forward included).
    #[allow(dead_code)]
    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state(path: &str) -> PushedState {
        PushedState {
            path: path.to_string(),
        }
    }

    #[test]
    fn initial_entry_has_no_state() {
        let history = History::new("?path=%2Fsrv");
        assert_eq!(history.current().state, None);
        assert_eq!(history.current_query(), "?path=%2Fsrv");
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn push_makes_entry_current() {
        let mut history = History::new("");
        history.push(state("/a"), "?path=%2Fa".into());
        assert_eq!(history.current().state, Some(state("/a")));
        assert_eq!(history.current_query(), "?path=%2Fa");
        assert_eq!(history.len(), 2);
    }

    #[test]
    fn back_at_oldest_entry_is_none() {
        let mut history = History::new("");
        assert!(history.back().is_none());
        // Cursor must not have moved.
        assert_eq!(history.current_query(), "");
    }

    #[test]
    fn back_and_forward_round_trip() {
        let mut history = History::new("");
        history.push(state("/a"), "?path=%2Fa".into());
        history.push(state("/a/b"), "?path=%2Fa%2Fb".into());

        let back = history.back().unwrap();
        assert_eq!(back.state, Some(state("/a")));

        let fwd = history.forward().unwrap();
        assert_eq!(fwd.state, Some(state("/a/b")));
        assert!(history.forward().is_none());
    }

    #[test]
    fn back_to_initial_yields_stateless_entry() {
        let mut history = History::new("?path=%2Fhome");
        history.push(state("/home/docs"), "?path=%2Fhome%2Fdocs".into());
        let entry = history.back().unwrap();
        assert_eq!(entry.state, None);
    }

    #[test]
    fn push_truncates_forward_entries() {
        let mut history = History::new("");
        history.push(state("/a"), "?path=%2Fa".into());
        history.push(state("/b"), "?path=%2Fb".into());
        history.back().unwrap();
        history.push(state("/c"), "?path=%2Fc".into());

        // /b is gone: forward from /c leads nowhere, back leads to /a.
        assert!(history.forward().is_none());
        assert_eq!(history.len(), 3);
        assert_eq!(history.back().unwrap().state, Some(state("/a")));
    }
}
