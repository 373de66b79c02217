//! Bounding box types and geometry.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Tag;

/// Minimum width and height (exclusive, in pixels) for a drawn box to be kept.
pub const MIN_BOX_SIZE: f32 = 10.0;

/// A 2D point in displayed image coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// An axis-aligned rectangle anchored at its top-left corner.
///
/// While a box is being drawn the width and height may be negative, reflecting
/// the drag direction. [`Rect::normalize`] turns such a draft into a rectangle
/// with non-negative extent covering the same area.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Create a zero-size rectangle at a point.
    pub fn at(point: Point) -> Self {
        Self::new(point.x, point.y, 0.0, 0.0)
    }

    /// Move the top-left corner onto the smaller coordinate and make the extent
    /// non-negative.
    pub fn normalize(&self) -> Self {
        let (x, width) = if self.width < 0.0 {
            (self.x + self.width, -self.width)
        } else {
            (self.x, self.width)
        };
        let (y, height) = if self.height < 0.0 {
            (self.y + self.height, -self.height)
        } else {
            (self.y, self.height)
        };
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Inclusive hit test against the rectangle's edges.
    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.x
            && point.x <= self.x + self.width
            && point.y >= self.y
            && point.y <= self.y + self.height
    }

    /// Get the area of the rectangle.
    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Whether the rectangle is large enough to be committed as a box.
    pub fn exceeds_min_size(&self) -> bool {
        self.width > MIN_BOX_SIZE && self.height > MIN_BOX_SIZE
    }
}

/// Unique identifier for a bounding box within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BoxId(u64);

impl BoxId {
    /// Wrap a raw id. Only the generator should mint ids for new boxes.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for BoxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Monotonic id source.
///
/// Every id returned by [`BoxIdGenerator::next_id`] is strictly greater than all
/// ids it returned before, so ids never repeat within one generator's lifetime.
#[derive(Debug, Clone)]
pub struct BoxIdGenerator {
    next: u64,
}

impl BoxIdGenerator {
    pub fn new() -> Self {
        Self { next: 1 }
    }

    /// Mint a fresh id.
    pub fn next_id(&mut self) -> BoxId {
        let id = BoxId(self.next);
        self.next += 1;
        id
    }
}

impl Default for BoxIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// A committed, tagged bounding box.
///
/// The color is not stored: it is always derived from the tag, so changing the
/// tag changes the color with it. Serialized documents still carry a `color`
/// field for consumers; it is ignored when reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "BoxRecord", from = "BoxRecord")]
pub struct BoundingBox {
    pub id: BoxId,
    /// Top-left corner X coordinate
    pub x: f32,
    /// Top-left corner Y coordinate
    pub y: f32,
    /// Width of the box (non-negative)
    pub width: f32,
    /// Height of the box (non-negative)
    pub height: f32,
    pub tag: Tag,
}

impl BoundingBox {
    /// Create a box from a rectangle, normalizing it first.
    pub fn new(id: BoxId, rect: Rect, tag: Tag) -> Self {
        let rect = rect.normalize();
        Self {
            id,
            x: rect.x,
            y: rect.y,
            width: rect.width,
            height: rect.height,
            tag,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn color(&self) -> [u8; 3] {
        self.tag.color()
    }

    pub fn contains_point(&self, point: Point) -> bool {
        self.rect().contains_point(point)
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }
}

/// Wire shape of a [`BoundingBox`].
#[derive(Serialize, Deserialize)]
struct BoxRecord {
    id: BoxId,
    x: f32,
    y: f32,
    width: f32,
    height: f32,
    tag: Tag,
    #[serde(default, skip_deserializing)]
    color: String,
}

impl From<BoundingBox> for BoxRecord {
    fn from(b: BoundingBox) -> Self {
        Self {
            id: b.id,
            x: b.x,
            y: b.y,
            width: b.width,
            height: b.height,
            tag: b.tag,
            color: b.tag.hex_color(),
        }
    }
}

impl From<BoxRecord> for BoundingBox {
    fn from(r: BoxRecord) -> Self {
        Self {
            id: r.id,
            x: r.x,
            y: r.y,
            width: r.width,
            height: r.height,
            tag: r.tag,
        }
    }
}
