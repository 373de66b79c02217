//! Annotation export.
//!
//! Three artifacts can be produced from the loaded batch:
//!
//! - **Annotation document**: one JSON file per image with its boxes
//! - **Batch export**: one annotation document per image that has boxes
//! - **COCO JSON**: a single dataset file for the whole batch
//!
//! Builders are pure over the image list and the annotation store, so exports
//! can run side by side. Writing the results out is left to an
//! [`ArtifactSink`].
//!
//! ## Usage
//!
//! ```rust,ignore
//! use uiat::format::{CocoOptions, DecodingProbe, export_coco};
//!
//! let options = CocoOptions::new().include_dimensions(true);
//! let dataset = pollster::block_on(export_coco(&images, &store, &options, &DecodingProbe));
//! let json = dataset.to_json()?;
//! ```

mod coco;
mod delivery;
mod document;
mod error;
mod probe;
mod timestamp;

#[cfg(test)]
mod tests;

pub use coco::{
    CocoAnnotation, CocoCategory, CocoDataset, CocoImage, CocoImageExtra, CocoInfo, CocoLicense,
    CocoOptions, ROOT_CATEGORY, categories, category_id, export_coco,
};
pub use delivery::{ArtifactSink, DeliveryReport, DirectorySink, MemorySink, deliver_staggered};
pub use document::{
    AnnotationDocument, document_file_name, export_all, export_single, export_single_at,
};
pub use error::FormatError;
pub use probe::{DecodingProbe, DimensionProbe, read_dimensions};
pub use timestamp::Timestamp;
