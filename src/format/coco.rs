//! COCO JSON dataset export.
//!
//! Implements the COCO (Common Objects in Context) object detection layout:
//! `info`, `licenses`, `categories`, `images` and `annotations` tables joined by
//! integer ids. Image ids are positions in the input order and annotation ids
//! count up across the whole dataset starting at 0.

use futures::stream::{self, StreamExt};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_IMAGE_HEIGHT, DEFAULT_IMAGE_WIDTH, MAX_CONCURRENT_DECODES};
use crate::format::probe::DimensionProbe;
use crate::format::timestamp::Timestamp;
use crate::model::{BoundingBox, ImageRecord, Tag};
use crate::state::AnnotationSet;

/// Name of the root category every tag category hangs under.
pub const ROOT_CATEGORY: &str = "objects";

/// Options for COCO export.
#[derive(Debug, Clone, Copy)]
pub struct CocoOptions {
    /// Decode each image for its real size instead of using the defaults.
    pub include_dimensions: bool,
    /// Width used when dimensions are not requested or cannot be read.
    pub default_width: u32,
    /// Height used when dimensions are not requested or cannot be read.
    pub default_height: u32,
}

impl Default for CocoOptions {
    fn default() -> Self {
        Self {
            include_dimensions: false,
            default_width: DEFAULT_IMAGE_WIDTH,
            default_height: DEFAULT_IMAGE_HEIGHT,
        }
    }
}

impl CocoOptions {
    /// Create options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request real image dimensions.
    pub fn include_dimensions(mut self, include: bool) -> Self {
        self.include_dimensions = include;
        self
    }

    /// Set the fallback dimensions.
    pub fn default_dimensions(mut self, width: u32, height: u32) -> Self {
        self.default_width = width;
        self.default_height = height;
        self
    }
}

/// Fixed category table: the root plus one entry per tag.
pub fn categories() -> Vec<CocoCategory> {
    let mut categories = vec![CocoCategory {
        id: 0,
        name: ROOT_CATEGORY.to_string(),
        supercategory: "none".to_string(),
    }];
    categories.extend(Tag::all().iter().map(|tag| CocoCategory {
        id: tag.category_id(),
        name: tag.name().to_string(),
        supercategory: ROOT_CATEGORY.to_string(),
    }));
    categories
}

/// Look up a tag category id by name in the fixed table.
///
/// The root category is not a valid annotation target and yields `None`.
pub fn category_id(name: &str) -> Option<u32> {
    Tag::all()
        .iter()
        .find(|tag| tag.name() == name)
        .map(Tag::category_id)
}

/// Build a COCO dataset for a batch of images.
///
/// With `include_dimensions`, images are probed concurrently, at most
/// [`MAX_CONCURRENT_DECODES`] at a time, and the call resolves once all probes
/// have settled. A failed probe only affects its own
/// image, which falls back to the default dimensions. Output order always
/// follows `images`.
pub async fn export_coco(
    images: &[ImageRecord],
    store: &AnnotationSet,
    options: &CocoOptions,
    probe: &dyn DimensionProbe,
) -> CocoDataset {
    let defaults = (options.default_width, options.default_height);

    let dimensions: Vec<(u32, u32)> = if options.include_dimensions {
        // At most MAX_CONCURRENT_DECODES in flight, results in input order
        let results: Vec<_> = stream::iter(images)
            .map(|image| probe.probe(image))
            .buffered(MAX_CONCURRENT_DECODES)
            .collect()
            .await;
        results
            .into_iter()
            .map(|result| {
                result.unwrap_or_else(|e| {
                    log::warn!("{}; using {}x{}", e, defaults.0, defaults.1);
                    defaults
                })
            })
            .collect()
    } else {
        vec![defaults; images.len()]
    };

    build_dataset(images, store, &dimensions, Timestamp::now())
}

/// Assemble the dataset once dimensions are known.
fn build_dataset(
    images: &[ImageRecord],
    store: &AnnotationSet,
    dimensions: &[(u32, u32)],
    at: Timestamp,
) -> CocoDataset {
    let created = at.to_iso8601();
    let mut dataset = CocoDataset::new(&at);
    let mut annotation_id = 0u64;

    for (image_id, (image, &(width, height))) in images.iter().zip(dimensions).enumerate() {
        let image_id = image_id as u64;
        dataset.images.push(CocoImage {
            id: image_id,
            license: 1,
            file_name: image.name.clone(),
            height,
            width,
            date_captured: created.clone(),
            extra: Some(CocoImageExtra {
                name: image.name.clone(),
            }),
        });

        for bbox in store.boxes(&image.name) {
            if let Some(annotation) = convert_box(bbox, image_id, annotation_id) {
                dataset.annotations.push(annotation);
                annotation_id += 1;
            } else {
                log::debug!("Dropping box {} with tag outside category table", bbox.id);
            }
        }
    }

    log::info!(
        "Built COCO dataset: {} images, {} annotations",
        dataset.images.len(),
        dataset.annotations.len()
    );
    dataset
}

fn convert_box(bbox: &BoundingBox, image_id: u64, annotation_id: u64) -> Option<CocoAnnotation> {
    let category_id = category_id(bbox.tag.name())?;
    Some(CocoAnnotation {
        id: annotation_id,
        image_id,
        category_id,
        bbox: [bbox.x, bbox.y, bbox.width, bbox.height],
        area: bbox.area(),
        segmentation: Vec::new(),
        iscrowd: 0,
    })
}

// COCO format structures

/// A complete COCO dataset document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoDataset {
    pub info: CocoInfo,
    pub licenses: Vec<CocoLicense>,
    pub categories: Vec<CocoCategory>,
    pub images: Vec<CocoImage>,
    pub annotations: Vec<CocoAnnotation>,
}

impl CocoDataset {
    fn new(at: &Timestamp) -> Self {
        Self {
            info: CocoInfo {
                year: at.year.to_string(),
                version: "1".to_string(),
                description: "Exported from UI Component Annotation Tool".to_string(),
                contributor: String::new(),
                url: String::new(),
                date_created: at.to_iso8601(),
            },
            licenses: vec![CocoLicense {
                id: 1,
                url: "https://creativecommons.org/licenses/by/4.0/".to_string(),
                name: "CC BY 4.0".to_string(),
            }],
            categories: categories(),
            images: Vec::new(),
            annotations: Vec::new(),
        }
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoInfo {
    pub year: String,
    pub version: String,
    pub description: String,
    pub contributor: String,
    pub url: String,
    pub date_created: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoLicense {
    pub id: u32,
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoCategory {
    pub id: u32,
    pub name: String,
    pub supercategory: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoImage {
    pub id: u64,
    pub license: u32,
    pub file_name: String,
    pub height: u32,
    pub width: u32,
    pub date_captured: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub extra: Option<CocoImageExtra>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoImageExtra {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CocoAnnotation {
    pub id: u64,
    pub image_id: u64,
    pub category_id: u32,
    /// `[x, y, width, height]`
    pub bbox: [f32; 4],
    pub area: f32,
    pub segmentation: Vec<Vec<f32>>,
    pub iscrowd: u8,
}
