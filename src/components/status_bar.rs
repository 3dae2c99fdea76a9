use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Widget,
};

use crate::theme::ThemeColors;

/// Status bar widget: current server path, listing info, key hints, or a
/// transient status message.
pub struct StatusBarWidget<'a> {
    path_str: &'a str,
    listing_info: &'a str,
    theme: &'a ThemeColors,
    status_message: Option<&'a str>,
    is_error: bool,
    loading: bool,
}

impl<'a> StatusBarWidget<'a> {
    pub fn new(path_str: &'a str, listing_info: &'a str, theme: &'a ThemeColors) -> Self {
        Self {
            path_str,
            listing_info,
            theme,
            status_message: None,
            is_error: false,
            loading: false,
        }
    }

    pub fn status_message(mut self, msg: &'a str, is_error: bool) -> Self {
        self.status_message = Some(msg);
        self.is_error = is_error;
        self
    }

    pub fn loading(mut self, loading: bool) -> Self {
        self.loading = loading;
        self
    }
}

impl<'a> Widget for StatusBarWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let width = area.width as usize;

        if let Some(msg) = self.status_message {
            let style = if self.is_error {
                Style::default()
                    .bg(self.theme.error_fg)
                    .fg(self.theme.status_fg)
            } else {
                Style::default().fg(self.theme.success_fg)
            };

            // Pad or truncate message to fill full width
            let display: String = if msg.chars().count() >= width {
                msg.chars().take(width).collect()
            } else {
                format!("{:<width$}", msg, width = width)
            };

            let line = Line::from(Span::styled(display, style));
            buf.set_line(area.x, area.y, &line, area.width);
            return;
        }

        // Normal bar: [path] [listing_info] [key_hints]
        let key_hints = " Enter:open  Bksp:up  a/d:sort  [ ]:hist  q:quit ";
        let hints_len = key_hints.len();

        let spinner = if self.loading { "… " } else { "" };

        // Reserve space for hints on the right
        let remaining = width.saturating_sub(hints_len);

        let info_len = self.listing_info.chars().count() + spinner.chars().count();
        let path_budget = remaining.saturating_sub(info_len).saturating_sub(1);

        let path_chars: Vec<char> = self.path_str.chars().collect();
        let path_display = if path_chars.len() > path_budget {
            if path_budget > 3 {
                let tail: String = path_chars[path_chars.len() - (path_budget - 3)..]
                    .iter()
                    .collect();
                format!("...{tail}")
            } else {
                path_chars.iter().take(path_budget).collect()
            }
        } else {
            self.path_str.to_string()
        };

        // Push the listing info toward the right, before the hints.
        let gap = remaining
            .saturating_sub(path_display.chars().count())
            .saturating_sub(info_len);

        let path_style = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.status_fg);
        let info_style = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.info_fg);
        let hints_style = Style::default()
            .bg(self.theme.status_bg)
            .fg(self.theme.dim_fg)
            .add_modifier(Modifier::DIM);

        let spans = vec![
            Span::styled(path_display, path_style),
            Span::styled(" ".repeat(gap), path_style),
            Span::styled(spinner.to_string(), info_style),
            Span::styled(self.listing_info.to_string(), info_style),
            Span::styled(key_hints, hints_style),
        ];

        let line = Line::from(spans);
        buf.set_line(area.x, area.y, &line, area.width);
    }
}
