//! Image discovery for a new upload batch.
//!
//! Accepts files and folders, keeps supported image files and returns them as
//! [`ImageRecord`]s sorted by name, which is the order the session loads them in.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;

use crate::model::ImageRecord;

/// Supported image extensions
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "bmp", "gif", "tiff", "tif", "webp"];

/// Errors that can occur while collecting images.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// Folder or file could not be read
    #[error("Failed to read {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Nothing usable was found
    #[error("No image files found")]
    NoImages,
}

/// Check if a filename (string) has a supported image extension.
/// Works with both full paths and just filenames.
pub fn is_image_filename(name: &str) -> bool {
    let lower = name.to_lowercase();
    IMAGE_EXTENSIONS
        .iter()
        .any(|ext| lower.ends_with(&format!(".{}", ext)))
}

fn is_image_file(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false)
}

/// Sort a decoded batch by name (lexicographic), as required before loading.
pub fn sort_batch(images: &mut [ImageRecord]) {
    images.sort_by(|a, b| a.name.cmp(&b.name));
}

/// Collect images from a list of files and/or folders.
///
/// Folders are scanned non-recursively. Unreadable entries inside a folder are
/// skipped with a warning; an unreadable top-level path is an error.
pub fn load_paths(paths: &[PathBuf]) -> Result<Vec<ImageRecord>, LoaderError> {
    let mut images = Vec::new();

    for path in paths {
        if path.is_dir() {
            let entries = std::fs::read_dir(path).map_err(|source| LoaderError::Io {
                path: path.clone(),
                source,
            })?;
            for entry in entries {
                match entry {
                    Ok(entry) => {
                        let file = entry.path();
                        if file.is_file() && is_image_file(&file) {
                            images.push(ImageRecord::from_path(file));
                        }
                    }
                    Err(e) => log::warn!("Skipping unreadable entry in {:?}: {}", path, e),
                }
            }
        } else if path.is_file() {
            if is_image_file(path) {
                images.push(ImageRecord::from_path(path.clone()));
            } else {
                log::debug!("Ignoring non-image file {:?}", path);
            }
        } else {
            return Err(LoaderError::Io {
                path: path.clone(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file or folder"),
            });
        }
    }

    if images.is_empty() {
        return Err(LoaderError::NoImages);
    }

    sort_batch(&mut images);
    log::info!("Collected {} images from {} paths", images.len(), paths.len());
    Ok(images)
}

/// Wrap uploaded `(name, bytes)` pairs as a sorted batch.
///
/// Names without a supported image extension are dropped.
pub fn from_uploads(uploads: Vec<(String, Vec<u8>)>) -> Result<Vec<ImageRecord>, LoaderError> {
    let mut images: Vec<ImageRecord> = uploads
        .into_iter()
        .filter(|(name, _)| {
            let keep = is_image_filename(name);
            if !keep {
                log::debug!("Ignoring upload '{}' with unsupported extension", name);
            }
            keep
        })
        .map(|(name, bytes)| {
            let bytes: Arc<[u8]> = bytes.into();
            ImageRecord::from_bytes(name.clone(), name, bytes)
        })
        .collect();

    if images.is_empty() {
        return Err(LoaderError::NoImages);
    }

    sort_batch(&mut images);
    Ok(images)
}
