//! Loaded image records.

use std::path::PathBuf;
use std::sync::Arc;

/// Strip the final extension from a file name.
///
/// A trailing dot with nothing after it is not an extension and is kept.
pub fn name_stem(name: &str) -> &str {
    match name.rfind('.') {
        Some(idx) if idx + 1 < name.len() && !name[idx..].contains('/') => &name[..idx],
        _ => name,
    }
}

/// Where the pixels of an image come from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Image file on disk
    Path(PathBuf),
    /// Encoded image bytes already in memory (e.g. an upload)
    Bytes(Arc<[u8]>),
}

/// An image in the loaded batch.
///
/// The name is the join key into the annotation set and is assumed unique
/// within one batch. Records are immutable once loaded.
#[derive(Debug, Clone)]
pub struct ImageRecord {
    /// File name used as identity and in exports
    pub name: String,
    /// Display URL or path handed to the rendering side and written to exports
    pub url: String,
    /// Original encoded data
    pub source: ImageSource,
}

impl ImageRecord {
    /// Create a record for an image file on disk.
    pub fn from_path(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let name = path
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or("unknown")
            .to_string();
        let url = path.to_string_lossy().replace('\\', "/");

        Self {
            name,
            url,
            source: ImageSource::Path(path),
        }
    }

    /// Create a record for in-memory image bytes.
    pub fn from_bytes(
        name: impl Into<String>,
        url: impl Into<String>,
        bytes: impl Into<Arc<[u8]>>,
    ) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
            source: ImageSource::Bytes(bytes.into()),
        }
    }
}
