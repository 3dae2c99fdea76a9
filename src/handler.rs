use crossterm::event::{KeyCode, KeyEvent, KeyModifiers, MouseButton, MouseEvent, MouseEventKind};

use crate::api::SortOrder;
use crate::app::App;

/// Handle a key event.
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Char('j') | KeyCode::Down => app.select_next(),
        KeyCode::Char('k') | KeyCode::Up => app.select_previous(),
        KeyCode::Char('g') | KeyCode::Home => app.select_first(),
        KeyCode::Char('G') | KeyCode::End => app.select_last(),

        KeyCode::Enter | KeyCode::Char('l') => app.open_selected(),
        KeyCode::Backspace | KeyCode::Char('h') | KeyCode::Char('u') => app.go_to_parent(),

        KeyCode::Char('a') => app.sort(SortOrder::Asc),
        KeyCode::Char('d') => app.sort(SortOrder::Desc),

        KeyCode::Char('[') | KeyCode::Left => app.history_back(),
        KeyCode::Char(']') | KeyCode::Right => app.history_forward(),

        _ => {}
    }
}

/// Handle a mouse event: left click selects/enters a row, the wheel moves
/// the selection.
pub fn handle_mouse_event(app: &mut App, mouse: MouseEvent) {
    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => app.click_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.select_next(),
        MouseEventKind::ScrollUp => app.select_previous(),
        _ => {}
    }
}
