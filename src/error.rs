//! Error types for annotation state operations.

use thiserror::Error;

use crate::model::BoxId;

/// Errors raised by store and session mutations.
///
/// None of these are fatal: callers treat them as rejected no-op mutations.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnnotationError {
    /// Tag name outside the fixed vocabulary
    #[error("Unknown tag '{0}' (expected one of Button, Input, Radio, Dropdown)")]
    UnknownTag(String),

    /// Box id is not present in the image's ground truth
    #[error("Box {0} not found")]
    BoxNotFound(BoxId),

    /// Mutation targeted an image that is not loaded (or nothing is loaded)
    #[error("No active image: {0}")]
    NoActiveImage(String),
}
