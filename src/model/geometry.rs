//! Rectangles and page rotation.
//!
//! Every rectangle handed to the pipeline is mapped into the frame of the
//! page as displayed (after its `/Rotate` is applied) before any geometric
//! comparison takes place.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Axis-aligned bounding box `(x0, y0, x1, y1)` with the origin at the top left.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct BBox {
    pub x0: f32,
    pub y0: f32,
    pub x1: f32,
    pub y1: f32,
}

impl BBox {
    /// Create a new bounding box.
    pub const fn new(x0: f32, y0: f32, x1: f32, y1: f32) -> Self {
        Self { x0, y0, x1, y1 }
    }

    /// Create a bounding box from an `[x0, y0, x1, y1]` array.
    pub fn from_array(coords: [f32; 4]) -> Self {
        Self::new(coords[0], coords[1], coords[2], coords[3])
    }

    pub fn width(&self) -> f32 {
        self.x1 - self.x0
    }

    pub fn height(&self) -> f32 {
        self.y1 - self.y0
    }

    /// Width times height. Negative or zero for degenerate boxes.
    pub fn area(&self) -> f32 {
        self.width() * self.height()
    }

    /// Check whether the box has a strictly positive extent in both axes.
    pub fn is_empty(&self) -> bool {
        self.x1 <= self.x0 || self.y1 <= self.y0
    }

    /// Intersection of two boxes, or `None` when they do not overlap with
    /// positive area.
    pub fn intersection(&self, other: &BBox) -> Option<BBox> {
        let rect = BBox::new(
            self.x0.max(other.x0),
            self.y0.max(other.y0),
            self.x1.min(other.x1),
            self.y1.min(other.y1),
        );
        if rect.is_empty() {
            None
        } else {
            Some(rect)
        }
    }

    /// Area of the overlap with `other` (0.0 when disjoint or touching).
    pub fn intersection_area(&self, other: &BBox) -> f32 {
        self.intersection(other).map(|r| r.area()).unwrap_or(0.0)
    }

    pub fn intersects(&self, other: &BBox) -> bool {
        self.intersection(other).is_some()
    }
}

impl From<[f32; 4]> for BBox {
    fn from(coords: [f32; 4]) -> Self {
        Self::from_array(coords)
    }
}

/// Page rotation, restricted to the four right angles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub enum Rotation {
    #[default]
    None,
    Clockwise90,
    Clockwise180,
    Clockwise270,
}

impl Rotation {
    /// Parse a rotation in degrees. Values are reduced modulo 360, so `-90`
    /// is accepted as `270`.
    pub fn from_degrees(degrees: i32) -> Result<Self> {
        match degrees.rem_euclid(360) {
            0 => Ok(Rotation::None),
            90 => Ok(Rotation::Clockwise90),
            180 => Ok(Rotation::Clockwise180),
            270 => Ok(Rotation::Clockwise270),
            _ => Err(Error::InvalidRotation(degrees)),
        }
    }

    pub fn degrees(self) -> i32 {
        match self {
            Rotation::None => 0,
            Rotation::Clockwise90 => 90,
            Rotation::Clockwise180 => 180,
            Rotation::Clockwise270 => 270,
        }
    }

    pub fn is_rotated(self) -> bool {
        self != Rotation::None
    }

    /// Map a rectangle given in unrotated page space into the displayed
    /// page frame.
    ///
    /// `width` and `height` are the dimensions of the unrotated page
    /// (its media box). The result is always a normalized rectangle.
    pub fn apply(self, bbox: BBox, width: f32, height: f32) -> BBox {
        let BBox { x0, y0, x1, y1 } = bbox;
        match self {
            Rotation::None => bbox,
            Rotation::Clockwise90 => BBox::new(height - y1, x0, height - y0, x1),
            Rotation::Clockwise180 => BBox::new(width - x1, height - y1, width - x0, height - y0),
            Rotation::Clockwise270 => BBox::new(y0, width - x1, y1, width - x0),
        }
    }

    /// The displayed page rectangle for an unrotated page of the given size.
    pub fn page_bbox(self, width: f32, height: f32) -> BBox {
        self.apply(BBox::new(0.0, 0.0, width, height), width, height)
    }
}

impl TryFrom<i32> for Rotation {
    type Error = Error;

    fn try_from(degrees: i32) -> Result<Self> {
        Rotation::from_degrees(degrees)
    }
}

impl From<Rotation> for i32 {
    fn from(rotation: Rotation) -> Self {
        rotation.degrees()
    }
}

impl std::fmt::Display for Rotation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}°", self.degrees())
    }
}
