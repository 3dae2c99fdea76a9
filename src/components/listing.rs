use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Widget},
};

use crate::api::DirectoryEntry;
use crate::config::TypeLabels;
use crate::theme::ThemeColors;

/// Minimum width of the size column.
const MIN_SIZE_COL: usize = 6;
/// Gap between columns.
const COL_GAP: usize = 2;

/// Grid widget rendering one row per directory entry, three cells each:
/// path, size in bytes, and the localized type label.
///
/// Rows keep the server's order. Directory paths get the interactive style
/// (bold, dir color); file paths are plain.
pub struct ListingWidget<'a> {
    entries: &'a [DirectoryEntry],
    selected: usize,
    scroll: usize,
    labels: &'a TypeLabels,
    theme: &'a ThemeColors,
    block: Option<Block<'a>>,
}

impl<'a> ListingWidget<'a> {
    pub fn new(
        entries: &'a [DirectoryEntry],
        selected: usize,
        scroll: usize,
        labels: &'a TypeLabels,
        theme: &'a ThemeColors,
    ) -> Self {
        Self {
            entries,
            selected,
            scroll,
            labels,
            theme,
            block: None,
        }
    }

    pub fn block(mut self, block: Block<'a>) -> Self {
        self.block = block.into();
        self
    }

    /// Width of the size column: the widest visible size, at least
    /// `MIN_SIZE_COL`.
    fn size_column_width(&self) -> usize {
        self.entries
            .iter()
            .map(|e| e.size.to_string().len())
            .max()
            .unwrap_or(0)
            .max(MIN_SIZE_COL)
    }

    /// Width of the type column: the wider of the two labels.
    fn type_column_width(&self) -> usize {
        self.labels
            .dir
            .chars()
            .count()
            .max(self.labels.file.chars().count())
    }

    /// Truncate a path to `budget` display columns, keeping the tail.
    fn fit_path(path: &str, budget: usize) -> String {
        let chars: Vec<char> = path.chars().collect();
        if chars.len() <= budget {
            return path.to_string();
        }
        if budget <= 3 {
            return chars[chars.len() - budget..].iter().collect();
        }
        let tail: String = chars[chars.len() - (budget - 3)..].iter().collect();
        format!("...{tail}")
    }
}

impl<'a> Widget for ListingWidget<'a> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let inner_area = if let Some(block) = &self.block {
            let inner = block.inner(area);
            block.clone().render(area, buf);
            inner
        } else {
            area
        };

        let visible_height = inner_area.height as usize;
        if self.entries.is_empty() || visible_height == 0 || inner_area.width == 0 {
            return;
        }

        let size_w = self.size_column_width();
        let type_w = self.type_column_width();
        let width = inner_area.width as usize;
        let path_w = width.saturating_sub(size_w + type_w + 2 * COL_GAP).max(1);

        let visible = self
            .entries
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(visible_height);

        for (i, (idx, entry)) in visible.enumerate() {
            let y = inner_area.y + i as u16;

            let is_selected = idx == self.selected;
            let row_bg = if is_selected {
                Style::default()
                    .bg(self.theme.list_selected_bg)
                    .fg(self.theme.list_selected_fg)
            } else {
                Style::default().bg(self.theme.list_bg).fg(self.theme.list_fg)
            };

            // The path cell carries the interactive marker: directories are
            // bold in the dir color, files stay plain.
            let path_style = if entry.is_dir {
                row_bg.fg(if is_selected {
                    self.theme.list_selected_fg
                } else {
                    self.theme.dir_fg
                })
                .add_modifier(Modifier::BOLD)
            } else {
                row_bg.fg(if is_selected {
                    self.theme.list_selected_fg
                } else {
                    self.theme.file_fg
                })
            };

            let path_cell = format!(
                "{:<path_w$}",
                Self::fit_path(&entry.path, path_w),
                path_w = path_w
            );
            let size_cell = format!("{:>size_w$}", entry.size, size_w = size_w);
            let label = if entry.is_dir {
                &self.labels.dir
            } else {
                &self.labels.file
            };
            let type_cell = format!("{:<type_w$}", label, type_w = type_w);

            let line = Line::from(vec![
                Span::styled(path_cell, path_style),
                Span::styled(" ".repeat(COL_GAP), row_bg),
                Span::styled(size_cell, row_bg),
                Span::styled(" ".repeat(COL_GAP), row_bg),
                Span::styled(type_cell, row_bg),
            ]);
            buf.set_line(inner_area.x, y, &line, inner_area.width);
        }
    }
}
