//! Axis-aligned bounding boxes in page space.

use serde::{Deserialize, Serialize};

/// An axis-aligned rectangle in page coordinates.
///
/// Page space has its origin at the top-left corner of the page's visible box,
/// with y growing downward and units in points (1/72 inch). The corners are
/// always ordered so that `x0 <= x1` and `y0 <= y1`.
///
/// On the wire a bounding box is the 4-tuple `[x0, y0, x1, y1]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(from = "[f32; 4]", into = "[f32; 4]")]
pub struct BoundingBox {
    x0: f32,
    y0: f32,
    x1: f32,
    y1: f32,
}

impl BoundingBox {
    /// Create a bounding box from two opposite corners.
    ///
    /// Swapped coordinates are reordered.
    pub fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        // Plain comparisons keep NaN visible to `is_finite` (f32::min would drop it).
        let (x0, x1) = if x0 <= x1 { (x0, x1) } else { (x1, x0) };
        let (y0, y1) = if y0 <= y1 { (y0, y1) } else { (y1, y0) };
        Self { x0, y0, x1, y1 }
    }

    /// Smallest box containing all the given points.
    ///
    /// Returns `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = (f32, f32)>) -> Option<Self> {
        let mut iter = points.into_iter();
        let (x, y) = iter.next()?;
        let mut bbox = Self::new(x, y, x, y);
        for (x, y) in iter {
            bbox = bbox.union(&Self::new(x, y, x, y));
        }
        Some(bbox)
    }

    /// Left edge.
    pub fn x0(&self) -> f32 {
        self.x0
    }

    /// Top edge.
    pub fn y0(&self) -> f32 {
        self.y0
    }

    /// Right edge.
    pub fn x1(&self) -> f32 {
        self.x1
    }

    /// Bottom edge.
    pub fn y1(&self) -> f32 {
        self.y1
    }

    /// Width of the box.
    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    /// Height of the box.
    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Area of the box.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Center point `(x, y)`.
    pub fn center(&self) -> (f32, f32) {
        ((self.x0 + self.x1) / 2.0, (self.y0 + self.y1) / 2.0)
    }

    /// Whether all four coordinates are finite numbers.
    pub fn is_finite(&self) -> bool {
        self.x0.is_finite() && self.y0.is_finite() && self.x1.is_finite() && self.y1.is_finite()
    }

    /// Check if a point lies inside the box (edges inclusive).
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        x >= self.x0 && x <= self.x1 && y >= self.y0 && y <= self.y1
    }

    /// Check if `other` lies entirely inside this box.
    pub fn contains(&self, other: &BoundingBox) -> bool {
        other.x0 >= self.x0 && other.x1 <= self.x1 && other.y0 >= self.y0 && other.y1 <= self.y1
    }

    /// Check if the two boxes overlap (touching edges count).
    pub fn intersects(&self, other: &BoundingBox) -> bool {
        self.x0 <= other.x1 && other.x0 <= self.x1 && self.y0 <= other.y1 && other.y0 <= self.y1
    }

    /// Smallest box containing both boxes.
    pub fn union(&self, other: &BoundingBox) -> BoundingBox {
        BoundingBox {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    /// Coordinates as `[x0, y0, x1, y1]`.
    pub fn to_array(&self) -> [f32; 4] {
        [self.x0, self.y0, self.x1, self.y1]
    }
}

impl From<[f32; 4]> for BoundingBox {
    fn from([x0, y0, x1, y1]: [f32; 4]) -> Self {
        Self::new(x0, y0, x1, y1)
    }
}

impl From<BoundingBox> for [f32; 4] {
    fn from(bbox: BoundingBox) -> Self {
        bbox.to_array()
    }
}

impl std::fmt::Display for BoundingBox {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[{:.1}, {:.1}, {:.1}, {:.1}]",
            self.x0, self.y0, self.x1, self.y1
        )
    }
}

impl std::str::FromStr for BoundingBox {
    type Err = String;

    /// Parse `"x0,y0,x1,y1"` (whitespace around the numbers is ignored).
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let values: Vec<f32> = s
            .split(',')
            .map(|part| {
                part.trim()
                    .parse::<f32>()
                    .map_err(|e| format!("invalid coordinate '{}': {}", part.trim(), e))
            })
            .collect::<std::result::Result<_, _>>()?;

        match values.as_slice() {
            [x0, y0, x1, y1] => Ok(Self::new(*x0, *y0, *x1, *y1)),
            _ => Err(format!("expected 4 coordinates, got {}", values.len())),
        }
    }
}
