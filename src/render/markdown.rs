//! Markdown table rendering.

use crate::error::{Error, Result};
use crate::model::TableGrid;

use super::MarkdownTableOptions;

/// Render a grid as a pipe table.
///
/// Row 0 is the header and fixes the column count; shorter rows are padded
/// with empty cells and longer rows are truncated. Every line, including the
/// last, ends with `\n`. An empty grid renders as the empty string.
///
/// # Example
///
/// ```
/// use pdfscope::model::TableGrid;
/// use pdfscope::render::{to_markdown_table, MarkdownTableOptions};
///
/// let grid = TableGrid::from_strings([vec!["H1", "H2"]]);
/// let md = to_markdown_table(&grid, &MarkdownTableOptions::default()).unwrap();
/// assert_eq!(md, "|H1|H2|\n|---|---|\n");
/// ```
pub fn to_markdown_table(grid: &TableGrid, options: &MarkdownTableOptions) -> Result<String> {
    let renderer = MarkdownTableRenderer::new(options.clone());
    renderer.render(grid)
}

/// Markdown table renderer.
#[derive(Debug, Clone, Default)]
pub struct MarkdownTableRenderer {
    options: MarkdownTableOptions,
}

impl MarkdownTableRenderer {
    /// Create a new renderer.
    pub fn new(options: MarkdownTableOptions) -> Self {
        Self { options }
    }

    /// Render a grid.
    pub fn render(&self, grid: &TableGrid) -> Result<String> {
        let Some((header, body)) = grid.rows().split_first() else {
            return Ok(String::new());
        };

        let col_count = header.len();
        if col_count == 0 {
            // A header with no columns cannot carry body cells
            if let Some(row) = body.iter().position(|r| !r.is_empty()) {
                return Err(Error::Serialization(format!(
                    "header row has no columns but row {} has {} cells",
                    row + 1,
                    body[row].len()
                )));
            }
            return Ok(String::new());
        }

        let mut output = String::new();
        self.render_row(&mut output, header, col_count);

        output.push('|');
        for _ in 0..col_count {
            output.push_str("---|");
        }
        output.push('\n');

        for row in body {
            self.render_row(&mut output, row, col_count);
        }

        Ok(output)
    }

    fn render_row(&self, output: &mut String, row: &[Option<String>], col_count: usize) {
        output.push('|');
        for col in 0..col_count {
            if let Some(Some(text)) = row.get(col) {
                output.push_str(&self.sanitize_cell(text));
            }
            output.push('|');
        }
        output.push('\n');
    }

    /// Collapse line breaks to single spaces, optionally escaping pipes.
    fn sanitize_cell(&self, text: &str) -> String {
        let mut result = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '\r' => {
                    chars.next_if_eq(&'\n');
                    result.push(' ');
                }
                '\n' => result.push(' '),
                '|' if self.options.escape_pipes => result.push_str("\\|"),
                _ => result.push(c),
            }
        }
        result
    }
}
