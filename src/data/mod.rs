//! Image loading for annotation batches.
//!
//! This module provides:
//! - `load_paths`: discover image files from files and folders on disk
//! - `from_uploads`: wrap in-memory uploads
//! - `sort_batch`: the name ordering every loaded batch follows

mod loader;

pub use loader::{
    IMAGE_EXTENSIONS, LoaderError, from_uploads, is_image_filename, load_paths, sort_batch,
};
