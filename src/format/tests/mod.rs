//! Tests for the export builders.
//!
//! These cover document and COCO output for multi-image batches, including
//! concurrent dimension probing with per-image failures.

mod document_tests;

use crate::model::{BoundingBox, BoxIdGenerator, ImageRecord, Rect, Tag};
use crate::state::AnnotationSet;

/// Build records with in-memory sources named as given.
pub(super) fn records(names: &[&str]) -> Vec<ImageRecord> {
    names
        .iter()
        .map(|name| ImageRecord::from_bytes(*name, format!("blob:{}", name), Vec::<u8>::new()))
        .collect()
}

/// Store initialized for `images` with the given boxes per image name.
pub(super) fn store_with(
    images: &[ImageRecord],
    boxes: &[(&str, Rect, Tag)],
) -> AnnotationSet {
    let mut ids = BoxIdGenerator::new();
    let mut store = AnnotationSet::new();
    store.initialize(images);
    for (name, rect, tag) in boxes {
        store
            .add_box(name, BoundingBox::new(ids.next_id(), *rect, *tag))
            .unwrap();
    }
    store
}
