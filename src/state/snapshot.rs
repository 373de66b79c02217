//! Immutable view of session state handed to the rendering side.

use crate::model::{BoundingBox, BoxId, Rect, Tag};

/// Snapshot of what the renderer needs after each mutation.
///
/// This is an owned copy: holding it never aliases the live store, and the
/// renderer has no way to mutate session state through it.
#[derive(Debug, Clone, PartialEq)]
pub struct Snapshot {
    /// Name of the active image, if any image is loaded
    pub image_name: Option<String>,
    /// Display URL of the active image
    pub image_url: Option<String>,
    /// Index of the active image
    pub image_index: usize,
    /// Number of loaded images
    pub image_count: usize,
    /// Ground-truth boxes of the active image, in insertion order
    pub boxes: Vec<BoundingBox>,
    /// In-progress draft (un-normalized), if drawing
    pub draft: Option<Rect>,
    /// Selected box, for highlight styling
    pub selected: Option<BoxId>,
    /// Whether boxes should be drawn
    pub show_boxes: bool,
    /// Tag that new boxes will receive
    pub active_tag: Tag,
}

impl Snapshot {
    /// Progress string like "3/15".
    pub fn progress(&self) -> String {
        if self.image_count == 0 {
            return "0/0".to_string();
        }
        format!("{}/{}", self.image_index + 1, self.image_count)
    }

    /// The selected box, if it is among the snapshot's boxes.
    pub fn selected_box(&self) -> Option<&BoundingBox> {
        let id = self.selected?;
        self.boxes.iter().find(|b| b.id == id)
    }
}
