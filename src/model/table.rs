//! Table types.

use serde::{Deserialize, Serialize};

use super::BoundingBox;

/// A row/column matrix of optional cell strings.
///
/// `None` means the parser found no text in that cell, which stays distinct
/// from `Some("")` until the grid is serialized. Rows may be ragged.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TableGrid {
    rows: Vec<Vec<Option<String>>>,
}

impl TableGrid {
    /// Create an empty grid.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a grid from rows of optional cells.
    pub fn from_rows(rows: Vec<Vec<Option<String>>>) -> Self {
        Self { rows }
    }

    /// Create a grid where every cell is present.
    pub fn from_strings<R, S>(rows: impl IntoIterator<Item = R>) -> Self
    where
        R: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.into_iter().map(|cell| Some(cell.into())).collect())
                .collect(),
        }
    }

    /// Append a row.
    pub fn push_row(&mut self, row: Vec<Option<String>>) {
        self.rows.push(row);
    }

    /// The rows of the grid.
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Consume the grid and return its rows.
    pub fn into_rows(self) -> Vec<Vec<Option<String>>> {
        self.rows
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on the first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    /// Check if the grid has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get a cell's text, if the cell exists and has text.
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row)?.get(col)?.as_deref()
    }
}

impl From<Vec<Vec<Option<String>>>> for TableGrid {
    fn from(rows: Vec<Vec<Option<String>>>) -> Self {
        Self::from_rows(rows)
    }
}

/// A table region proposed by the parser, before selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TableCandidate {
    /// Region the table occupies
    pub bbox: BoundingBox,
    /// Cell contents, row-major
    pub grid: TableGrid,
}

impl TableCandidate {
    /// Create a new candidate.
    pub fn new(bbox: BoundingBox, grid: TableGrid) -> Self {
        Self { bbox, grid }
    }
}
