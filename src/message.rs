//! Session message types for UIAT.
//!
//! Every user gesture that changes session state is represented as a message
//! passed to [`Session::update`](crate::session::Session::update).

use crate::model::{ImageRecord, Point, Tag};
use crate::state::Direction;

/// Messages that can be sent to update session state.
#[derive(Debug, Clone)]
pub enum Message {
    // Upload
    /// Replace the loaded batch
    Load(Vec<ImageRecord>),

    // Drawing surface
    /// Pointer pressed at a position in image coordinates
    PointerDown(Point),
    /// Pointer moved
    PointerMove(Point),
    /// Pointer released
    PointerUp,
    /// Pointer left the drawing surface
    PointerLeave,

    // Navigation
    /// Move to the previous or next image
    Navigate(Direction),

    // Tags and editing
    /// Choose the tag for new boxes
    SelectTag(Tag),
    /// Change the tag of the selected box
    RetagSelected(Tag),
    /// Delete the selected box
    DeleteSelected,
    /// Show or hide boxes
    ToggleBoxes,
}
