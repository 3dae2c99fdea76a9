use ratatui::{
    layout::{Constraint, Layout},
    style::Style,
    widgets::{Block, Borders},
    Frame,
};

use crate::app::App;
use crate::components::listing::ListingWidget;
use crate::components::status_bar::StatusBarWidget;

/// Render the application UI: the listing grid with a one-line status bar
/// underneath.
pub fn render(app: &mut App, frame: &mut Frame) {
    let chunks = Layout::vertical([Constraint::Min(1), Constraint::Length(1)])
        .split(frame.area());

    // Remember where the grid is for mouse hit testing, and keep the
    // selection visible (border takes two rows).
    app.listing_area = chunks[0];
    let visible_height = chunks[0].height.saturating_sub(2) as usize;
    app.update_scroll(visible_height);

    let block = Block::default()
        .title(format!(" {} ", app.navigator.current_path()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.border_fg));

    let listing = ListingWidget::new(
        &app.entries,
        app.selected_index,
        app.scroll_offset,
        &app.labels,
        &app.theme,
    )
    .block(block);
    frame.render_widget(listing, chunks[0]);

    let info = format!(
        "sort: {} | {} entries",
        app.navigator.sort_order().as_str(),
        app.entries.len()
    );
    // The status bar's left side plays the address bar: it shows the query
    // mirror of the current history entry.
    let mut status_bar =
        StatusBarWidget::new(app.navigator.history().current_query(), &info, &app.theme)
            .loading(app.loading);
    if let Some((msg, _)) = &app.status_message {
        status_bar = status_bar.status_message(msg, true);
    }
    frame.render_widget(status_bar, chunks[1]);
}
