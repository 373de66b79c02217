//! Data models for UIAT.

mod annotation;
mod image;
mod tag;

pub use annotation::{BoundingBox, BoxId, BoxIdGenerator, MIN_BOX_SIZE, Point, Rect};
pub use image::{ImageRecord, ImageSource, name_stem};
pub use tag::{Tag, color_for_tag};
