//! Annotation and interaction state.

mod interaction;
mod snapshot;
mod store;

pub use interaction::{Direction, InteractionState, Mode};
pub use snapshot::Snapshot;
pub use store::{AnnotationSet, Channel, ImageAnnotations};
