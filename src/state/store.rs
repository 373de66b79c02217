//! Per-image annotation storage.
//!
//! The [`AnnotationSet`] is the single source of truth for boxes. Each loaded
//! image owns one [`ImageAnnotations`] entry holding two ordered sequences:
//! user-confirmed ground truth and a reserved predictions channel.

use std::collections::HashMap;

use crate::error::AnnotationError;
use crate::model::{BoundingBox, BoxId, ImageRecord, Tag};

/// Boxes attached to a single image.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ImageAnnotations {
    /// User-drawn or accepted boxes, in insertion order
    pub ground_truth: Vec<BoundingBox>,
    /// Unconfirmed model output, in insertion order
    pub predictions: Vec<BoundingBox>,
}

/// Which sequence of an image's annotations a box is written to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Channel {
    GroundTruth,
    Predictions,
}

/// Annotations for every loaded image, keyed by image name.
///
/// Box ids are not checked for uniqueness here; they come from a
/// [`BoxIdGenerator`](crate::model::BoxIdGenerator), which never repeats.
#[derive(Debug, Clone, Default)]
pub struct AnnotationSet {
    entries: HashMap<String, ImageAnnotations>,
}

impl AnnotationSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace everything with one empty entry per image.
    pub fn initialize(&mut self, images: &[ImageRecord]) {
        self.entries = images
            .iter()
            .map(|image| (image.name.clone(), ImageAnnotations::default()))
            .collect();
        log::debug!("Annotation set initialized for {} images", self.entries.len());
    }

    /// Whether an entry exists for this image.
    pub fn contains(&self, image_name: &str) -> bool {
        self.entries.contains_key(image_name)
    }

    /// Number of images with an entry.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Full entry for an image.
    pub fn get(&self, image_name: &str) -> Option<&ImageAnnotations> {
        self.entries.get(image_name)
    }

    fn entry_mut(&mut self, image_name: &str) -> Result<&mut ImageAnnotations, AnnotationError> {
        self.entries
            .get_mut(image_name)
            .ok_or_else(|| AnnotationError::NoActiveImage(image_name.to_string()))
    }

    /// Append a box to an image's ground truth.
    pub fn add_box(&mut self, image_name: &str, bbox: BoundingBox) -> Result<(), AnnotationError> {
        self.add_to(image_name, Channel::GroundTruth, bbox)
    }

    /// Append a box to the chosen sequence of an image.
    pub fn add_to(
        &mut self,
        image_name: &str,
        channel: Channel,
        bbox: BoundingBox,
    ) -> Result<(), AnnotationError> {
        let entry = self.entry_mut(image_name)?;
        log::debug!(
            "Adding {} box {} to '{}' ({:?})",
            bbox.tag,
            bbox.id,
            image_name,
            channel
        );
        match channel {
            Channel::GroundTruth => entry.ground_truth.push(bbox),
            Channel::Predictions => entry.predictions.push(bbox),
        }
        Ok(())
    }

    /// Change the tag of a ground-truth box. The color follows the tag.
    pub fn update_box_tag(
        &mut self,
        image_name: &str,
        box_id: BoxId,
        tag: Tag,
    ) -> Result<(), AnnotationError> {
        let entry = self.entry_mut(image_name)?;
        let bbox = entry
            .ground_truth
            .iter_mut()
            .find(|b| b.id == box_id)
            .ok_or(AnnotationError::BoxNotFound(box_id))?;
        log::debug!("Retagging box {} on '{}': {} -> {}", box_id, image_name, bbox.tag, tag);
        bbox.tag = tag;
        Ok(())
    }

    /// Like [`AnnotationSet::update_box_tag`], with the tag given by name.
    pub fn update_box_tag_named(
        &mut self,
        image_name: &str,
        box_id: BoxId,
        tag_name: &str,
    ) -> Result<(), AnnotationError> {
        let tag: Tag = tag_name.parse()?;
        self.update_box_tag(image_name, box_id, tag)
    }

    /// Remove the first ground-truth box with this id.
    ///
    /// Returns the removed box, or `None` when no box matched.
    pub fn delete_box(
        &mut self,
        image_name: &str,
        box_id: BoxId,
    ) -> Result<Option<BoundingBox>, AnnotationError> {
        let entry = self.entry_mut(image_name)?;
        let removed = entry
            .ground_truth
            .iter()
            .position(|b| b.id == box_id)
            .map(|idx| entry.ground_truth.remove(idx));
        match &removed {
            Some(_) => log::debug!("Deleted box {} from '{}'", box_id, image_name),
            None => log::debug!("Delete of box {} on '{}' matched nothing", box_id, image_name),
        }
        Ok(removed)
    }

    /// Ground-truth boxes for an image, empty if the image is unknown.
    pub fn boxes(&self, image_name: &str) -> &[BoundingBox] {
        self.entries
            .get(image_name)
            .map(|e| e.ground_truth.as_slice())
            .unwrap_or(&[])
    }

    /// Prediction boxes for an image, empty if the image is unknown.
    pub fn predictions(&self, image_name: &str) -> &[BoundingBox] {
        self.entries
            .get(image_name)
            .map(|e| e.predictions.as_slice())
            .unwrap_or(&[])
    }

    /// Total ground-truth boxes across all images.
    pub fn total_boxes(&self) -> usize {
        self.entries.values().map(|e| e.ground_truth.len()).sum()
    }
}
