//! Pointer-driven interaction state machine.
//!
//! Turns pointer gestures on the drawing surface into selections and new box
//! rectangles. The machine never touches the annotation store itself; the
//! session commits what [`InteractionState::pointer_up`] returns.

use crate::model::{BoundingBox, BoxId, Point, Rect, Tag};

/// Current interaction mode.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Mode {
    /// Nothing in progress.
    #[default]
    Idle,
    /// A drag is in progress. `anchor` is the pointer-down position and stays
    /// fixed; `draft` may have negative extent.
    Drawing { anchor: Point, draft: Rect },
    /// A box on the active image is selected.
    Selected(BoxId),
}

/// Direction for image navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Prev,
    Next,
}

/// Transient interaction state. Never persisted.
#[derive(Debug, Clone)]
pub struct InteractionState {
    mode: Mode,
    active_index: usize,
    /// Tag assigned to newly drawn boxes
    pub active_tag: Tag,
    /// Whether the renderer should draw boxes at all
    pub show_boxes: bool,
}

impl Default for InteractionState {
    fn default() -> Self {
        Self::new(Tag::default(), true)
    }
}

impl InteractionState {
    pub fn new(active_tag: Tag, show_boxes: bool) -> Self {
        Self {
            mode: Mode::Idle,
            active_index: 0,
            active_tag,
            show_boxes,
        }
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn active_index(&self) -> usize {
        self.active_index
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.mode, Mode::Drawing { .. })
    }

    /// Selected box id, if any.
    pub fn selected(&self) -> Option<BoxId> {
        match self.mode {
            Mode::Selected(id) => Some(id),
            _ => None,
        }
    }

    /// In-progress draft rectangle (un-normalized), if drawing.
    pub fn draft(&self) -> Option<Rect> {
        match self.mode {
            Mode::Drawing { draft, .. } => Some(draft),
            _ => None,
        }
    }

    /// Pointer pressed. Selects the first box under the pointer in insertion
    /// order, otherwise starts a new draft. Any prior selection or draft is
    /// dropped either way.
    pub fn pointer_down(&mut self, point: Point, boxes: &[BoundingBox]) {
        match boxes.iter().find(|b| b.contains_point(point)) {
            Some(hit) => {
                log::debug!("Selected box {} at ({:.1}, {:.1})", hit.id, point.x, point.y);
                self.mode = Mode::Selected(hit.id);
            }
            None => {
                log::debug!("Started drawing at ({:.1}, {:.1})", point.x, point.y);
                self.mode = Mode::Drawing {
                    anchor: point,
                    draft: Rect::at(point),
                };
            }
        }
    }

    /// Pointer moved. Only affects an in-progress draft.
    pub fn pointer_move(&mut self, point: Point) {
        if let Mode::Drawing { anchor, draft } = &mut self.mode {
            draft.width = point.x - anchor.x;
            draft.height = point.y - anchor.y;
            log::trace!("Draft size {:.1}x{:.1}", draft.width, draft.height);
        }
    }

    /// Pointer released. Ends a drag and returns the normalized rectangle when
    /// it is strictly larger than the minimum box size in both dimensions.
    pub fn pointer_up(&mut self) -> Option<Rect> {
        let Mode::Drawing { draft, .. } = self.mode else {
            return None;
        };
        self.mode = Mode::Idle;

        let rect = draft.normalize();
        if rect.exceeds_min_size() {
            Some(rect)
        } else {
            log::debug!(
                "Discarded draft {:.1}x{:.1} below minimum size",
                rect.width,
                rect.height
            );
            None
        }
    }

    /// Pointer left the drawing surface. Cancels a drag without committing.
    pub fn pointer_leave(&mut self) {
        if self.is_drawing() {
            log::debug!("Drawing cancelled: pointer left surface");
            self.mode = Mode::Idle;
        }
    }

    /// Drop the selection (or draft) and return to idle.
    pub fn clear(&mut self) {
        self.mode = Mode::Idle;
    }

    /// Clear the selection if it no longer refers to one of `boxes`.
    pub fn retain_selection(&mut self, boxes: &[BoundingBox]) {
        if let Some(id) = self.selected() {
            if !boxes.iter().any(|b| b.id == id) {
                log::debug!("Selection {} is stale, clearing", id);
                self.mode = Mode::Idle;
            }
        }
    }

    /// Move the active image index by one, clamped to `[0, image_count - 1]`.
    ///
    /// The interaction always resets to idle, even when the index cannot move.
    /// Returns whether the index changed.
    pub fn navigate(&mut self, direction: Direction, image_count: usize) -> bool {
        self.mode = Mode::Idle;

        let target = match direction {
            Direction::Prev => self.active_index.checked_sub(1),
            Direction::Next => Some(self.active_index + 1).filter(|&i| i < image_count),
        };
        match target {
            Some(index) => {
                log::debug!("Navigated to image {}/{}", index + 1, image_count);
                self.active_index = index;
                true
            }
            None => false,
        }
    }

    /// Reset for a freshly loaded batch.
    pub fn reset(&mut self) {
        self.mode = Mode::Idle;
        self.active_index = 0;
    }
}
