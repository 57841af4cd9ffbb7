//! Clip-region table extraction.

use crate::error::{Error, Result};
use crate::model::{BoundingBox, TableCandidate};
use crate::parser::PageSource;

use super::TableSelection;

/// The candidate chosen for a clip, and how many there were.
#[derive(Debug, Clone, PartialEq)]
pub struct GridSelection {
    /// The selected table, grid unchanged from the parser
    pub candidate: TableCandidate,
    /// Number of candidates the clip produced
    pub candidate_count: usize,
}

/// Re-run table detection inside `clip` and pick one candidate.
pub fn extract_grid<P>(
    page: &P,
    clip: &BoundingBox,
    selection: TableSelection,
) -> Result<GridSelection>
where
    P: PageSource + ?Sized,
{
    if !clip.is_finite() {
        return Err(Error::InvalidClip(format!(
            "coordinates must be finite, got {}",
            clip
        )));
    }

    let candidates = page.find_tables(Some(clip))?;
    let candidate_count = candidates.len();
    if candidate_count > 1 {
        log::debug!(
            "Clip {} on page {} produced {} tables, selecting {:?}",
            clip,
            page.index(),
            candidate_count,
            selection
        );
    }

    Ok(GridSelection {
        candidate: select_candidate(candidates, selection)?,
        candidate_count,
    })
}

/// Choose one candidate according to `selection`.
pub fn select_candidate(
    candidates: Vec<TableCandidate>,
    selection: TableSelection,
) -> Result<TableCandidate> {
    let count = candidates.len();
    if count == 0 {
        return Err(Error::NoTableFound);
    }

    let index = match selection {
        TableSelection::First => 0,
        TableSelection::RequireSingle if count > 1 => {
            return Err(Error::MultipleTables { count });
        }
        TableSelection::RequireSingle => 0,
        TableSelection::Largest => {
            let mut best = 0;
            for (i, candidate) in candidates.iter().enumerate().skip(1) {
                if candidate.bbox.area() > candidates[best].bbox.area() {
                    best = i;
                }
            }
            best
        }
    };

    candidates
        .into_iter()
        .nth(index)
        .ok_or(Error::NoTableFound)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inspect::tests::StubPage;
    use crate::model::TableGrid;

    fn candidate(label: &str, size: f32) -> TableCandidate {
        TableCandidate::new(
            BoundingBox::new(0.0, 0.0, size, size),
            TableGrid::from_strings([vec![label]]),
        )
    }

    fn label(c: &TableCandidate) -> Option<&str> {
        c.grid.cell(0, 0)
    }

    #[test]
    fn test_no_candidates() {
        assert!(matches!(
            select_candidate(vec![], TableSelection::First),
            Err(Error::NoTableFound)
        ));
    }

    #[test]
    fn test_first_wins() {
        let picked = select_candidate(
            vec![candidate("a", 10.0), candidate("b", 50.0)],
            TableSelection::First,
        )
        .unwrap();
        assert_eq!(label(&picked), Some("a"));
    }

    #[test]
    fn test_largest_wins_and_ties_go_earliest() {
        let picked = select_candidate(
            vec![candidate("a", 10.0), candidate("b", 50.0), candidate("c", 50.0)],
            TableSelection::Largest,
        )
        .unwrap();
        assert_eq!(label(&picked), Some("b"));
    }

    #[test]
    fn test_require_single() {
        let picked =
            select_candidate(vec![candidate("only", 5.0)], TableSelection::RequireSingle).unwrap();
        assert_eq!(label(&picked), Some("only"));

        assert!(matches!(
            select_candidate(
                vec![candidate("a", 1.0), candidate("b", 1.0)],
                TableSelection::RequireSingle
            ),
            Err(Error::MultipleTables { count: 2 })
        ));
    }

    #[test]
    fn test_extract_grid_returns_ragged_grid_unchanged() {
        let ragged = TableGrid::from_rows(vec![
            vec![Some("A".into()), Some("B".into()), Some("C".into())],
            vec![Some("1".into()), None],
        ]);
        let page = StubPage::new()
            .with_table(TableCandidate::new(
                BoundingBox::new(0.0, 0.0, 10.0, 10.0),
                ragged.clone(),
            ))
            .with_table(candidate("second", 20.0));

        let selection = extract_grid(
            &page,
            &BoundingBox::new(0.0, 0.0, 100.0, 100.0),
            TableSelection::First,
        )
        .unwrap();
        assert_eq!(selection.candidate.grid, ragged);
        assert_eq!(selection.candidate_count, 2);
        assert_eq!(
            page.last_clip(),
            Some(BoundingBox::new(0.0, 0.0, 100.0, 100.0))
        );
    }

    #[test]
    fn test_extract_grid_no_table() {
        let page = StubPage::new();
        assert!(matches!(
            extract_grid(&page, &BoundingBox::new(0.0, 0.0, 1.0, 1.0), TableSelection::First),
            Err(Error::NoTableFound)
        ));
    }

    #[test]
    fn test_non_finite_clip_rejected() {
        let page = StubPage::new().with_table(candidate("a", 1.0));
        let clip = BoundingBox::new(0.0, 0.0, f32::NAN, 10.0);
        assert!(matches!(
            extract_grid(&page, &clip, TableSelection::First),
            Err(Error::InvalidClip(_))
        ));
    }
}
