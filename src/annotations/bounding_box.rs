use crate::error::PredictError;
use tracing::debug;

/// A struct representing a bounding box.
///
/// A bounding box is the smallest rectangle that totally contains a detected object, along
/// with the category of that object. Detection models output boxes like these together with a
/// confidence score (see [`crate::annotations::detection::Detection`]).
///
/// This project uses the standard convention of the left side of the image being x=0 and the top
/// of the image being y=0. Coordinates are in pixels of the original, unresized image.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundingBox {
    left: f32,
    top: f32,
    right: f32,
    bottom: f32,
    category: String,
}

impl BoundingBox {
    /// Checks if a box has valid parameters before constructing.
    pub fn new(
        left: f32,
        top: f32,
        right: f32,
        bottom: f32,
        category: String,
    ) -> Result<Self, PredictError> {
        if left.is_nan() || top.is_nan() || right.is_nan() || bottom.is_nan() {
            Err(PredictError::InvalidBox(format!(
                "coordinates must be numbers, got ({}, {}, {}, {}).",
                left, top, right, bottom
            )))
        } else if left > right {
            Err(PredictError::InvalidBox(format!(
                "value for left > value for right ({} > {}).",
                left, right
            )))
        } else if top > bottom {
            Err(PredictError::InvalidBox(format!(
                "value for top > value for bottom ({} > {}).",
                top, bottom
            )))
        } else {
            Ok(BoundingBox {
                left,
                top,
                right,
                bottom,
                category,
            })
        }
    }

    /// Builds a box from two corners predicted by a network, in any order.
    ///
    /// Box regression can swap corners, the corners are sorted instead of rejected. Coordinates
    /// are not otherwise checked.
    pub fn from_corners(x1: f32, y1: f32, x2: f32, y2: f32, category: String) -> Self {
        if x1 > x2 || y1 > y2 {
            debug!(x1, y1, x2, y2, %category, "reordering swapped box corners");
        }
        BoundingBox {
            left: x1.min(x2),
            top: y1.min(y2),
            right: x1.max(x2),
            bottom: y1.max(y2),
            category,
        }
    }
}

/// Read access to the geometry of anything that carries a box.
pub trait BoundingBoxGeometry {
    fn left(&self) -> f32;
    fn top(&self) -> f32;
    fn right(&self) -> f32;
    fn bottom(&self) -> f32;
    fn category(&self) -> &str;

    fn as_xyxy(&self) -> (f32, f32, f32, f32) {
        (self.left(), self.top(), self.right(), self.bottom())
    }
}

impl BoundingBoxGeometry for BoundingBox {
    fn left(&self) -> f32 {
        self.left
    }

    fn top(&self) -> f32 {
        self.top
    }

    fn right(&self) -> f32 {
        self.right
    }

    fn bottom(&self) -> f32 {
        self.bottom
    }

    fn category(&self) -> &str {
        &self.category
    }
}
