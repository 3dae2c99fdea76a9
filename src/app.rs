use std::time::Instant;

use ratatui::layout::Rect;
use tokio::sync::mpsc::UnboundedSender;

use crate::api::{DirectoryEntry, ListingClient, SortOrder};
use crate::config::TypeLabels;
use crate::event::{Event, ListingUpdate};
use crate::navigator::{FetchRequest, Navigator};
use crate::theme::ThemeColors;

/// Main application state.
///
/// Holds the navigator, the last applied listing, and the selection. Every
/// navigator operation that yields a [`FetchRequest`] is turned into a
/// spawned fetch whose completion comes back through the event channel.
pub struct App {
    pub navigator: Navigator,
    pub entries: Vec<DirectoryEntry>,
    pub selected_index: usize,
    pub scroll_offset: usize,
    pub should_quit: bool,
    pub loading: bool,
    pub status_message: Option<(String, Instant)>,
    pub labels: TypeLabels,
    pub theme: ThemeColors,
    /// Screen area of the listing grid from the last render, for mouse hits.
    pub listing_area: Rect,
    client: ListingClient,
    events: UnboundedSender<Event>,
}

impl App {
    /// Create the app and issue the initial listing request.
    ///
    /// `initial_query` is the startup `?path=...` query string (possibly
    /// empty); `default_root` is the fallback browse path.
    pub fn new(
        client: ListingClient,
        initial_query: &str,
        default_root: String,
        events: UnboundedSender<Event>,
        labels: TypeLabels,
        theme: ThemeColors,
    ) -> Self {
        let (navigator, initial) = Navigator::new(initial_query, default_root);
        let mut app = Self {
            navigator,
            entries: Vec::new(),
            selected_index: 0,
            scroll_offset: 0,
            should_quit: false,
            loading: false,
            status_message: None,
            labels,
            theme,
            listing_area: Rect::default(),
            client,
            events,
        };
        app.spawn_fetch(initial);
        app
    }

    /// Run a listing request on the tokio runtime; completion is delivered
    /// as an [`Event::Listing`] on the event channel.
    fn spawn_fetch(&mut self, request: FetchRequest) {
        self.loading = true;
        let client = self.client.clone();
        let events = self.events.clone();
        tokio::spawn(async move {
            let result = client.fetch(&request.path, request.order).await;
            let _ = events.send(Event::Listing(ListingUpdate {
                seq: request.seq,
                path: request.path,
                result,
            }));
        });
    }

    /// Apply a completed fetch. Stale responses are dropped; failed fetches
    /// are logged and reported in the status bar, leaving the currently
    /// displayed listing untouched.
    pub fn handle_listing(&mut self, update: ListingUpdate) {
        if !self.navigator.accept(update.seq) {
            tracing::debug!(seq = update.seq, path = %update.path, "dropping stale listing response");
            return;
        }
        self.loading = false;
        match update.result {
            Ok(entries) => {
                tracing::info!(path = %update.path, count = entries.len(), "listing loaded");
                self.entries = entries;
                self.selected_index = 0;
                self.scroll_offset = 0;
            }
            Err(e) => {
                tracing::error!(path = %update.path, error = %e, "listing fetch failed");
                self.set_status_message(format!("Fetch failed for {}: {}", update.path, e));
            }
        }
    }

    /// Activate the selected row: directories are entered, files ignored.
    pub fn open_selected(&mut self) {
        let path = match self.entries.get(self.selected_index) {
            Some(entry) if entry.is_dir => entry.path.clone(),
            _ => return,
        };
        let request = self.navigator.navigate_to(&path);
        self.spawn_fetch(request);
    }

    /// Re-request the current path with the given sort order.
    pub fn sort(&mut self, order: SortOrder) {
        let request = self.navigator.set_sort_order(order);
        self.spawn_fetch(request);
    }

    /// Go up one level; silently does nothing at the root.
    pub fn go_to_parent(&mut self) {
        if let Some(request) = self.navigator.go_to_parent() {
            self.spawn_fetch(request);
        }
    }

    /// Traverse history backward, replaying the entry's path.
    pub fn history_back(&mut self) {
        if let Some(request) = self.navigator.history_back() {
            self.spawn_fetch(request);
        }
    }

    /// Traverse history forward, replaying the entry's path.
    pub fn history_forward(&mut self) {
        if let Some(request) = self.navigator.history_forward() {
            self.spawn_fetch(request);
        }
    }

    /// Handle a left click at screen coordinates: select the hit row, and
    /// enter it when it is a directory.
    pub fn click_at(&mut self, column: u16, row: u16) {
        let area = self.listing_area;
        if area.width < 3 || area.height < 3 {
            return;
        }
        // Only hits inside the border count.
        let inside_x = column > area.x && column < area.x + area.width - 1;
        let inside_y = row > area.y && row < area.y + area.height - 1;
        if !inside_x || !inside_y {
            return;
        }
        let index = self.scroll_offset + (row - area.y - 1) as usize;
        if index >= self.entries.len() {
            return;
        }
        self.selected_index = index;
        self.open_selected();
    }

    /// Quit the application.
    pub fn quit(&mut self) {
        self.should_quit = true;
    }

    /// Move selection down by one item.
    pub fn select_next(&mut self) {
        let len = self.entries.len();
        if len > 0 && self.selected_index < len - 1 {
            self.selected_index += 1;
        }
    }

    /// Move selection up by one item.
    pub fn select_previous(&mut self) {
        if self.selected_index > 0 {
            self.selected_index -= 1;
        }
    }

    /// Jump to the first item.
    pub fn select_first(&mut self) {
        self.selected_index = 0;
    }

    /// Jump to the last item.
    pub fn select_last(&mut self) {
        let len = self.entries.len();
        if len > 0 {
            self.selected_index = len - 1;
        }
    }

    /// Keep the selected row inside the visible window.
    pub fn update_scroll(&mut self, visible_height: usize) {
        if visible_height == 0 {
            return;
        }
        if self.selected_index < self.scroll_offset {
            self.scroll_offset = self.selected_index;
        } else if self.selected_index >= self.scroll_offset + visible_height {
            self.scroll_offset = self.selected_index + 1 - visible_height;
        }
    }

    /// Set a status message with current timestamp.
    pub fn set_status_message(&mut self, msg: String) {
        self.status_message = Some((msg, Instant::now()));
    }

    /// Clear the status message if it has been displayed for more than 5 seconds.
    pub fn clear_expired_status(&mut self) {
        if let Some((_, ref created)) = self.status_message {
            if created.elapsed().as_secs() > 5 {
                self.status_message = None;
            }
        }
    }
}
