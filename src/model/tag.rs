//! Tag vocabulary for UI component annotations.
//!
//! Every bounding box carries exactly one tag from a closed set. The tag fixes
//! the box color and the COCO category the box is exported under, so neither
//! is stored separately.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::AnnotationError;

/// A UI component kind that a box can be tagged with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tag {
    /// Clickable button
    #[default]
    Button,
    /// Text input field
    Input,
    /// Radio button
    Radio,
    /// Dropdown / select
    Dropdown,
}

impl Tag {
    /// Get the display name for this tag.
    pub fn name(&self) -> &'static str {
        match self {
            Tag::Button => "Button",
            Tag::Input => "Input",
            Tag::Radio => "Radio",
            Tag::Dropdown => "Dropdown",
        }
    }

    /// Get all tags in vocabulary order.
    pub fn all() -> &'static [Tag] {
        &[Tag::Button, Tag::Input, Tag::Radio, Tag::Dropdown]
    }

    /// RGB color used to draw boxes with this tag.
    pub fn color(&self) -> [u8; 3] {
        match self {
            Tag::Button => [0xef, 0x44, 0x44],
            Tag::Input => [0x3b, 0x82, 0xf6],
            Tag::Radio => [0x10, 0xb9, 0x81],
            Tag::Dropdown => [0xf5, 0x9e, 0x0b],
        }
    }

    /// Color as a `#rrggbb` string.
    pub fn hex_color(&self) -> String {
        let [r, g, b] = self.color();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    /// COCO category id for this tag (0 is reserved for the "objects" root).
    pub fn category_id(&self) -> u32 {
        match self {
            Tag::Button => 1,
            Tag::Input => 2,
            Tag::Radio => 3,
            Tag::Dropdown => 4,
        }
    }
}

/// Look up the color for a tag given by name.
///
/// Fails with [`AnnotationError::UnknownTag`] for names outside the vocabulary.
pub fn color_for_tag(name: &str) -> Result<[u8; 3], AnnotationError> {
    name.parse::<Tag>().map(|tag| tag.color())
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Tag {
    type Err = AnnotationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Tag::all()
            .iter()
            .copied()
            .find(|tag| tag.name() == s)
            .ok_or_else(|| AnnotationError::UnknownTag(s.to_string()))
    }
}

impl Serialize for Tag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for Tag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(serde::de::Error::custom)
    }
}
