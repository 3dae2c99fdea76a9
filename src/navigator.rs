//! Navigation core: browse state, parent-path math, history sync, and
//! request sequencing.
//!
//! The navigator is deliberately synchronous and I/O-free. Every operation
//! that needs fresh data returns a [`FetchRequest`]; the caller performs the
//! fetch and feeds the completion back through [`Navigator::accept`], which
//! drops responses that lost the race against a newer request.

use crate::api::SortOrder;
use crate::history::{History, HistoryEntry, PushedState};

/// The client's current navigation position and sort preference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BrowseState {
    /// Absolute server-side path currently being browsed. Never empty.
    pub current_path: String,
    pub sort_order: SortOrder,
}

/// A listing request for the caller to carry out.
///
/// `seq` increases monotonically across the navigator's lifetime. Completions
/// must go through [`Navigator::accept`] so stale responses are discarded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub seq: u64,
    pub path: String,
    pub order: SortOrder,
}

/// Owns [`BrowseState`] and the navigable history, and translates user
/// intent (navigate, sort, go to parent, traverse history) into listing
/// requests plus consistent history updates.
pub struct Navigator {
    state: BrowseState,
    history: History,
    default_root: String,
    next_seq: u64,
    applied_seq: u64,
}

impl Navigator {
    /// Initialize from the startup query string (`?path=...`, leading `?`
    /// optional, possibly empty). Falls back to `default_root` when the
    /// query has no `path`, and always starts with descending sort.
    ///
    /// Returns the navigator together with the initial listing request.
    pub fn new(initial_query: &str, default_root: impl Into<String>) -> (Self, FetchRequest) {
        let default_root = default_root.into();
        let current_path =
            path_from_query(initial_query).unwrap_or_else(|| default_root.clone());
        let mut nav = Self {
            state: BrowseState {
                current_path,
                sort_order: SortOrder::default(),
            },
            history: History::new(initial_query),
            default_root,
            next_seq: 0,
            applied_seq: 0,
        };
        let request = nav.request(nav.state.current_path.clone());
        (nav, request)
    }

    pub fn state(&self) -> &BrowseState {
        &self.state
    }

    pub fn current_path(&self) -> &str {
        &self.state.current_path
    }

    pub fn sort_order(&self) -> SortOrder {
        self.state.sort_order
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    fn request(&mut self, path: String) -> FetchRequest {
        self.next_seq += 1;
        FetchRequest {
            seq: self.next_seq,
            path,
            order: self.state.sort_order,
        }
    }

    /// Enter a directory. `path` must be a value previously reported by the
    /// listing service, not arbitrary input. Pushes a history entry whose
    /// state and query both carry the path, then requests the listing with
    /// the current sort order.
    pub fn navigate_to(&mut self, path: &str) -> FetchRequest {
        self.history.push(
            PushedState {
                path: path.to_string(),
            },
            nav_query(path),
        );
        self.state.current_path = path.to_string();
        self.request(path.to_string())
    }

    /// Re-request the current path with a new sort order. The pushed query
    /// carries both `path` and `sort`; the pushed state still carries only
    /// the path, so history traversal will not restore the order.
    pub fn set_sort_order(&mut self, order: SortOrder) -> FetchRequest {
        self.state.sort_order = order;
        self.history.push(
            PushedState {
                path: self.state.current_path.clone(),
            },
            sort_query(&self.state.current_path, order),
        );
        self.request(self.state.current_path.clone())
    }

    /// Go up one level. A no-op (`None`) when already at the root: no
    /// history push, no fetch. Sort order is left untouched either way.
    pub fn go_to_parent(&mut self) -> Option<FetchRequest> {
        let parent = parent_path(&self.state.current_path);
        if parent == self.state.current_path {
            return None;
        }
        Some(self.navigate_to(&parent))
    }

    /// Replay a history traversal (the popstate analog). The path comes
    /// from the entry's pushed state, falling back to the default root for
    /// the stateless initial entry. Sort order is whatever is currently in
    /// memory; it is never part of the pushed state.
    pub fn on_history_pop(&mut self, entry: &HistoryEntry) -> FetchRequest {
        let path = entry
            .state
            .as_ref()
            .map(|s| s.path.clone())
            .unwrap_or_else(|| self.default_root.clone());
        self.state.current_path = path.clone();
        self.request(path)
    }

    /// Step back in history and replay; `None` when nothing is behind.
    pub fn history_back(&mut self) -> Option<FetchRequest> {
        let entry = self.history.back()?.clone();
        Some(self.on_history_pop(&entry))
    }

    /// Step forward in history and replay; `None` when nothing is ahead.
    pub fn history_forward(&mut self) -> Option<FetchRequest> {
        let entry = self.history.forward()?.clone();
        Some(self.on_history_pop(&entry))
    }

    /// True when `seq` is newer than anything applied so far, marking it
    /// applied. Responses that return false must be dropped unrendered.
    pub fn accept(&mut self, seq: u64) -> bool {
        if seq > self.applied_seq {
            self.applied_seq = seq;
            true
        } else {
            false
        }
    }
}

/// Parent of `path` by segment math: split on `/`, drop empty segments,
/// drop the last one, keep the leading separator. Zero or one segments
/// parent to `"/"`.
pub fn parent_path(path: &str) -> String {
    let mut segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
    if segments.len() <= 1 {
        return "/".to_string();
    }
    segments.pop();
    format!("/{}", segments.join("/"))
}

/// Extract the `path` parameter from a query string (leading `?` optional).
/// A present-but-empty value (`?path=`) counts as absent, so callers fall
/// back to their default and `current_path` stays non-empty.
pub fn path_from_query(query: &str) -> Option<String> {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == "path")
        .map(|(_, value)| value.into_owned())
        .filter(|value| !value.is_empty())
}

/// Query mirror for a plain navigation: `?path=<urlencoded>`.
pub fn nav_query(path: &str) -> String {
    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("path", path)
        .finish();
    format!("?{encoded}")
}

/// Query mirror for a sort action: `?path=<urlencoded>&sort=<order>`.
fn sort_query(path: &str, order: SortOrder) -> String {
    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .append_pair("path", path)
        .append_pair("sort", order.as_str())
        .finish();
    format!("?{encoded}")
}
