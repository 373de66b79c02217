//! Per-image annotation documents.
//!
//! One JSON document per image, carrying the image reference, its ground-truth
//! boxes in insertion order and the export time.

use serde::{Deserialize, Serialize};

use crate::format::error::FormatError;
use crate::format::timestamp::Timestamp;
use crate::model::{BoundingBox, ImageRecord, name_stem};
use crate::state::AnnotationSet;

/// Annotations of one image as exported.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationDocument {
    pub image_url: String,
    pub image_name: String,
    pub annotations: Vec<BoundingBox>,
    /// ISO 8601 export time
    pub timestamp: String,
}

impl AnnotationDocument {
    /// File name this document is delivered under.
    pub fn file_name(&self) -> String {
        document_file_name(&self.image_name)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, FormatError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Parse a previously exported document.
    pub fn from_json(json: &str) -> Result<Self, FormatError> {
        Ok(serde_json::from_str(json)?)
    }
}

/// `annotations_<name without extension>.json`
pub fn document_file_name(image_name: &str) -> String {
    format!("annotations_{}.json", name_stem(image_name))
}

/// Build the document for one image, stamped with the current time.
pub fn export_single(image: &ImageRecord, boxes: &[BoundingBox]) -> AnnotationDocument {
    export_single_at(image, boxes, Timestamp::now())
}

/// Build the document for one image with an explicit timestamp.
pub fn export_single_at(
    image: &ImageRecord,
    boxes: &[BoundingBox],
    at: Timestamp,
) -> AnnotationDocument {
    AnnotationDocument {
        image_url: image.url.clone(),
        image_name: image.name.clone(),
        annotations: boxes.to_vec(),
        timestamp: at.to_iso8601(),
    }
}

/// Build one document per image that has ground truth, in load order.
///
/// Images without boxes produce no document at all.
pub fn export_all(images: &[ImageRecord], store: &AnnotationSet) -> Vec<AnnotationDocument> {
    let at = Timestamp::now();
    let documents: Vec<AnnotationDocument> = images
        .iter()
        .filter_map(|image| {
            let boxes = store.boxes(&image.name);
            (!boxes.is_empty()).then(|| export_single_at(image, boxes, at))
        })
        .collect();

    log::info!(
        "Prepared {} annotation documents for {} images",
        documents.len(),
        images.len()
    );
    documents
}
