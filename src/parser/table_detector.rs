//! Ruling-free table detection.
//!
//! Tables are found from where text starts, not from drawn lines: spans are
//! bucketed into rows by their vertical center, left edges shared by enough
//! rows become columns, and runs of aligned rows become candidates. Works in
//! page space (y down), so candidates and their rows come out top to bottom.

use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

use regex::Regex;

use crate::model::{BoundingBox, TableCandidate, TableGrid, TextSpanPrimitive};

/// A row of text spans grouped by vertical position.
#[derive(Debug, Clone)]
struct RowData<'a> {
    /// Mean vertical center of the row's spans
    y: f32,
    /// Left to right
    spans: Vec<&'a TextSpanPrimitive>,
}

impl RowData<'_> {
    fn font_size(&self) -> f32 {
        self.spans.first().map(|s| s.font_size).unwrap_or(0.0)
    }
}

/// Thresholds for [`TableDetector`].
#[derive(Debug, Clone, PartialEq)]
pub struct TableDetectorConfig {
    /// Fewest rows a candidate may have
    pub min_rows: usize,
    /// Fewest columns a candidate may have
    pub min_columns: usize,
    /// Most columns a candidate may have; wider regions are usually prose split word by word
    pub max_columns: usize,
    /// Vertical distance, in font sizes, within which spans share a row
    pub y_tolerance_factor: f32,
    /// Share of a row's spans (0.0-1.0) that must start on a column
    pub min_alignment_ratio: f32,
    /// Column edges closer than this (points) are merged
    pub min_column_gap: f32,
    /// Width of the buckets left edges are snapped to (points)
    pub bucket_size: f32,
    /// How far a span's left edge may sit from a column edge (points)
    pub alignment_tolerance: f32,
    /// Largest gap, in font sizes, that lets a single-cell row join the table above it
    pub max_row_gap_factor: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
            bucket_size: 5.0,
            alignment_tolerance: 5.0,
            max_row_gap_factor: 2.5,
        }
    }
}

/// Finds table candidates among a page's text spans.
#[derive(Debug, Clone, Default)]
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Detector with default thresholds.
    pub fn new() -> Self {
        Self::default()
    }

    /// Detector with the given thresholds.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables in the given spans, top to bottom.
    pub fn detect(&self, spans: &[TextSpanPrimitive]) -> Vec<TableCandidate> {
        log::debug!("TableDetector: starting with {} spans", spans.len());

        if spans.len() < self.config.min_rows * self.config.min_columns {
            log::debug!(
                "TableDetector: only {} spans, need {}",
                spans.len(),
                self.config.min_rows * self.config.min_columns
            );
            return vec![];
        }

        // Rows by vertical center
        let rows = self.group_into_rows(spans);
        if rows.len() < self.config.min_rows {
            log::debug!(
                "TableDetector: only {} rows, need {}",
                rows.len(),
                self.config.min_rows
            );
            return vec![];
        }

        // Page-wide columns, used only to find regions
        let columns = self.detect_columns(&rows);
        log::debug!(
            "TableDetector: page-wide column edges {:?} ({})",
            columns,
            columns.len()
        );
        if columns.len() < self.config.min_columns {
            return vec![];
        }

        let regions = self.find_table_regions(&rows, &columns);
        log::debug!("TableDetector: found {} table regions", regions.len());

        let mut candidates = Vec::new();
        for (start_row, end_row) in regions {
            let table_rows = &rows[start_row..=end_row];

            // A region's own columns can differ from the page-wide set
            let table_columns = self.detect_columns(table_rows);
            if table_columns.len() < self.config.min_columns {
                continue;
            }

            if table_columns.len() > self.config.max_columns {
                log::debug!(
                    "TableDetector: skipping region, too many columns ({} > {})",
                    table_columns.len(),
                    self.config.max_columns
                );
                continue;
            }

            if self.is_list_pattern(table_rows, &table_columns) {
                log::debug!("TableDetector: skipping region, detected as list pattern");
                continue;
            }

            if let Some(candidate) = self.build_candidate(table_rows, &table_columns) {
                candidates.push(candidate);
            }
        }

        candidates
    }

    /// Group spans into rows by vertical center.
    fn group_into_rows<'a>(&self, spans: &'a [TextSpanPrimitive]) -> Vec<RowData<'a>> {
        let mut sorted: Vec<&TextSpanPrimitive> = spans.iter().collect();
        sorted.sort_by(|a, b| {
            a.bbox
                .center()
                .1
                .total_cmp(&b.bbox.center().1)
                .then(a.bbox.x0().total_cmp(&b.bbox.x0()))
        });

        let mut rows: Vec<RowData<'a>> = Vec::new();
        let mut current: Vec<&TextSpanPrimitive> = Vec::new();
        let mut current_y: Option<f32> = None;

        for span in sorted {
            let y = span.bbox.center().1;
            let y_tolerance = span.font_size * self.config.y_tolerance_factor;

            match current_y {
                Some(row_y) if (y - row_y).abs() <= y_tolerance => current.push(span),
                _ => {
                    if !current.is_empty() {
                        rows.push(make_row(std::mem::take(&mut current)));
                    }
                    current_y = Some(y);
                    current.push(span);
                }
            }
        }

        if !current.is_empty() {
            rows.push(make_row(current));
        }

        rows
    }

    /// Column edges shared by enough rows.
    ///
    /// Left edges are snapped to buckets; buckets seen in enough multi-span
    /// rows become columns. Falls back to counting every row when too few
    /// rows have more than one span.
    fn detect_columns(&self, rows: &[RowData<'_>]) -> Vec<f32> {
        if rows.is_empty() {
            return vec![];
        }

        let multi_span_rows: Vec<&RowData<'_>> =
            rows.iter().filter(|r| r.spans.len() >= 2).collect();

        if multi_span_rows.len() < self.config.min_rows {
            return self.detect_columns_simple(rows);
        }

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &multi_span_rows {
            // Count each bucket only once per row
            let row_buckets: HashSet<i32> =
                row.spans.iter().map(|s| self.bucket(s.bbox.x0())).collect();
            for bucket in row_buckets {
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let min_occurrences =
            ((multi_span_rows.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        self.merge_edges(&edge_counts, min_occurrences)
    }

    /// Column edges counted over every span, for regions with few multi-span rows.
    fn detect_columns_simple(&self, rows: &[RowData<'_>]) -> Vec<f32> {
        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for span in rows.iter().flat_map(|r| r.spans.iter()) {
            *edge_counts.entry(self.bucket(span.bbox.x0())).or_insert(0) += 1;
        }

        let min_occurrences =
            ((rows.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        self.merge_edges(&edge_counts, min_occurrences)
    }

    fn bucket(&self, x: f32) -> i32 {
        (x / self.config.bucket_size).round() as i32
    }

    /// Keep frequent edges, dropping any closer than `min_column_gap` to the previous one.
    fn merge_edges(&self, edge_counts: &HashMap<i32, usize>, min_occurrences: usize) -> Vec<f32> {
        let mut column_edges: Vec<f32> = edge_counts
            .iter()
            .filter(|(_, count)| **count >= min_occurrences)
            .map(|(bucket, _)| *bucket as f32 * self.config.bucket_size)
            .collect();
        column_edges.sort_by(f32::total_cmp);

        let mut merged: Vec<f32> = Vec::new();
        for edge in column_edges {
            match merged.last() {
                Some(last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Inclusive row ranges that form tables.
    ///
    /// A region opens on an aligned row with at least two spans. Aligned
    /// single-span rows (a row whose other cells are empty) extend an open
    /// region only when they sit close below the previous row; they never
    /// open one.
    fn find_table_regions(&self, rows: &[RowData<'_>], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions = Vec::new();
        let mut open: Option<(usize, usize)> = None;

        for (i, row) in rows.iter().enumerate() {
            let aligned = self.alignment_score(row, columns) >= self.config.min_alignment_ratio;
            let multi = row.spans.len() >= 2;

            open = match open {
                None if aligned && multi => Some((i, i)),
                None => None,
                Some((start, end)) if aligned && (multi || self.is_close_below(&rows[end], row)) => {
                    Some((start, i))
                }
                Some(region) => {
                    self.close_region(region, &mut regions);
                    (aligned && multi).then_some((i, i))
                }
            };
        }

        if let Some(region) = open {
            self.close_region(region, &mut regions);
        }

        regions
    }

    fn close_region(&self, (start, end): (usize, usize), regions: &mut Vec<(usize, usize)>) {
        if end - start + 1 >= self.config.min_rows {
            regions.push((start, end));
        }
    }

    fn is_close_below(&self, previous: &RowData<'_>, row: &RowData<'_>) -> bool {
        row.y - previous.y <= row.font_size() * self.config.max_row_gap_factor
    }

    /// Fraction of a row's spans that start on a column edge.
    fn alignment_score(&self, row: &RowData<'_>, columns: &[f32]) -> f32 {
        if row.spans.is_empty() || columns.is_empty() {
            return 0.0;
        }

        let aligned_spans = row
            .spans
            .iter()
            .filter(|span| {
                columns
                    .iter()
                    .any(|col| (span.bbox.x0() - col).abs() <= self.config.alignment_tolerance)
            })
            .count();

        aligned_spans as f32 / row.spans.len() as f32
    }

    /// Lay a region's spans out on its columns. Cells nothing landed in are `None`.
    fn build_candidate(&self, rows: &[RowData<'_>], columns: &[f32]) -> Option<TableCandidate> {
        let bbox = rows
            .iter()
            .flat_map(|r| r.spans.iter().map(|s| s.bbox))
            .reduce(|acc, b| acc.union(&b))?;

        let mut grid = TableGrid::new();
        for row in rows {
            let mut cell_contents: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];

            for span in &row.spans {
                let col_idx = self.find_column_for_span(span.bbox.x0(), columns, bbox.x1());
                if let Some(cell) = cell_contents.get_mut(col_idx) {
                    let text = span.text.trim();
                    if !text.is_empty() {
                        cell.push(text);
                    }
                }
            }

            grid.push_row(
                cell_contents
                    .into_iter()
                    .map(|contents| (!contents.is_empty()).then(|| contents.join(" ")))
                    .collect(),
            );
        }

        Some(TableCandidate::new(bbox, grid))
    }

    /// Column index for a span starting at `span_x`.
    fn find_column_for_span(&self, span_x: f32, columns: &[f32], right_x: f32) -> usize {
        // Spans may start up to 10pt left of their column
        for (i, &col_start) in columns.iter().enumerate() {
            let col_end = columns.get(i + 1).copied().unwrap_or(right_x + 100.0);
            if span_x >= col_start - 10.0 && span_x < col_end - 10.0 {
                return i;
            }
        }

        // Otherwise the nearest edge wins
        columns
            .iter()
            .enumerate()
            .min_by(|(_, a), (_, b)| (span_x - **a).abs().total_cmp(&(span_x - **b).abs()))
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    /// Whether a region is really a bulleted or numbered list.
    ///
    /// A marker drawn apart from its item text ("1." then "Item") forms a
    /// column of its own, so lists pass every alignment check.
    fn is_list_pattern(&self, rows: &[RowData<'_>], columns: &[f32]) -> bool {
        if columns.len() < 2 || rows.is_empty() {
            return false;
        }

        let mut bullet_count = 0;
        let mut number_count = 0;

        for row in rows {
            // Spans are sorted by X, so the first one is the leftmost
            if let Some(span) = row.spans.first() {
                let text = span.text.trim();
                if is_bullet_marker(text) {
                    bullet_count += 1;
                } else if is_number_marker(text) {
                    number_count += 1;
                }
            }
        }

        let bullet_ratio = bullet_count as f32 / rows.len() as f32;
        let total_ratio = (bullet_count + number_count) as f32 / rows.len() as f32;
        log::debug!(
            "TableDetector: list markers: bullets={}, numbers={}, total rows={}",
            bullet_count,
            number_count,
            rows.len()
        );

        // Bullet markers are almost never real table data
        if bullet_ratio >= 0.5 {
            return true;
        }

        // Numbered first columns only count against 2-column regions
        columns.len() == 2 && total_ratio >= 0.5
    }
}

fn make_row(mut spans: Vec<&TextSpanPrimitive>) -> RowData<'_> {
    spans.sort_by(|a, b| a.bbox.x0().total_cmp(&b.bbox.x0()));
    let y = spans.iter().map(|s| s.bbox.center().1).sum::<f32>() / spans.len() as f32;
    RowData { y, spans }
}

const BULLET_MARKERS: &[&str] = &[
    "-", "\u{2013}", "\u{2014}", "\u{2022}", "\u{b7}", "*", "\u{25cb}", "\u{25aa}", "\u{25e6}",
    "\u{25b8}", "\u{25b9}", "\u{25ba}", "\u{25a0}", "\u{25cf}", "\u{203b}", "\u{25a1}",
    "\u{25c6}", "\u{25c7}", "\u{25b6}", "\u{25b7}", "\u{261e}", "\u{27a4}", "\u{279c}",
];

fn is_bullet_marker(text: &str) -> bool {
    BULLET_MARKERS.contains(&text.trim())
}

/// Number or letter list marker: `1.`, `2)`, `a.`, or a bare `3`.
fn is_number_marker(text: &str) -> bool {
    static MARKER: OnceLock<Option<Regex>> = OnceLock::new();

    // Internal whitespace is ignored ("1 ." is a marker)
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    MARKER
        .get_or_init(|| Regex::new(r"^(?:\d+[.)]?|\p{L}[.)])$").ok())
        .as_ref()
        .map(|re| re.is_match(&cleaned))
        .unwrap_or(false)
}
