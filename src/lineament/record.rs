use crate::error::GeometryError;
use crate::math::{orientation, Orientation, Point2, TOLERANCE};

slotmap::new_key_type! {
    /// Unique identifier for a lineament in the lineament store.
    pub struct LineamentId;
}

/// Classification attributes persisted alongside a lineament.
///
/// These mirror the fields written back to the vector layer. A lineament
/// that has never been classified, or whose classification was superseded,
/// carries [`Attributes::cleared`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attributes {
    /// Classification label, 0 when unclassified.
    pub label: i64,
    /// Generation at which the lineament was recruited.
    pub order: u32,
    /// Whether the lineament was expanded as a seed.
    pub seed: bool,
    /// Global id of the seed that recruited this lineament.
    pub source: Option<i64>,
    /// Segment length at classification time.
    pub length: f64,
    /// Complementary orientation at classification time.
    pub oe: f64,
    /// Orientation at classification time.
    pub on: f64,
}

impl Attributes {
    /// Attributes of an unclassified lineament.
    #[must_use]
    pub fn cleared() -> Self {
        Self::default()
    }

    /// Attributes of a freshly ingested lineament carrying `label`.
    #[must_use]
    pub fn with_label(label: i64) -> Self {
        Self {
            label,
            ..Self::default()
        }
    }
}

/// A two-point line segment and its derived geometry.
#[derive(Debug, Clone)]
pub struct Lineament {
    /// Stable global id supplied by the caller.
    pub fid: i64,
    /// First endpoint.
    pub start: Point2,
    /// Second endpoint.
    pub end: Point2,
    /// Midpoint of the segment.
    pub centroid: Point2,
    /// Euclidean length, strictly positive.
    pub length: f64,
    /// Axial trend of the segment.
    pub orientation: Orientation,
    /// Persisted classification attributes.
    pub attributes: Attributes,
}

impl Lineament {
    /// Creates a lineament from its endpoints.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::NonFinite`] if any coordinate is NaN or
    /// infinite, and [`GeometryError::ZeroLength`] if the endpoints coincide.
    pub fn new(fid: i64, start: Point2, end: Point2, label: i64) -> Result<Self, GeometryError> {
        let finite = [start.x, start.y, end.x, end.y]
            .iter()
            .all(|c| c.is_finite());
        if !finite {
            return Err(GeometryError::NonFinite { fid });
        }

        let length = (end - start).norm();
        if length < TOLERANCE {
            return Err(GeometryError::ZeroLength { fid });
        }

        Ok(Self {
            fid,
            start,
            end,
            centroid: nalgebra::center(&start, &end),
            length,
            orientation: orientation(&start, &end),
            attributes: Attributes::with_label(label),
        })
    }

    /// Returns the current classification label.
    #[must_use]
    pub fn label(&self) -> i64 {
        self.attributes.label
    }
}
