//! Tests for per-image annotation documents.

use super::{records, store_with};
use crate::format::{
    AnnotationDocument, Timestamp, document_file_name, export_all, export_single_at,
};
use crate::model::{BoundingBox, BoxId, Rect, Tag};

#[test]
fn test_document_file_name() {
    assert_eq!(document_file_name("login.png"), "annotations_login.json");
    assert_eq!(document_file_name("shot.v2.jpeg"), "annotations_shot.v2.json");
    assert_eq!(document_file_name("README"), "annotations_README.json");
}

#[test]
fn test_single_document_fields() {
    let images = records(&["login.png"]);
    let boxes = vec![
        BoundingBox::new(BoxId::from_raw(1), Rect::new(1.0, 2.0, 30.0, 40.0), Tag::Input),
        BoundingBox::new(BoxId::from_raw(2), Rect::new(5.0, 5.0, 20.0, 20.0), Tag::Button),
    ];
    let at = Timestamp::from_unix_millis(1_709_214_330_250);

    let doc = export_single_at(&images[0], &boxes, at);

    assert_eq!(doc.image_name, "login.png");
    assert_eq!(doc.image_url, "blob:login.png");
    assert_eq!(doc.timestamp, "2024-02-29T13:45:30.250Z");
    assert_eq!(doc.annotations, boxes);
    assert_eq!(doc.file_name(), "annotations_login.json");
}

#[test]
fn test_single_document_json_keys() {
    let images = records(&["login.png"]);
    let boxes = vec![BoundingBox::new(
        BoxId::from_raw(7),
        Rect::new(1.0, 2.0, 30.0, 40.0),
        Tag::Radio,
    )];
    let doc = export_single_at(&images[0], &boxes, Timestamp::from_unix_millis(0));

    let value: serde_json::Value = serde_json::from_str(&doc.to_json().unwrap()).unwrap();

    assert_eq!(value["imageUrl"], "blob:login.png");
    assert_eq!(value["imageName"], "login.png");
    assert_eq!(value["timestamp"], "1970-01-01T00:00:00.000Z");
    let entry = &value["annotations"][0];
    assert_eq!(entry["id"], 7);
    assert_eq!(entry["tag"], "Radio");
    assert_eq!(entry["color"], Tag::Radio.hex_color());
}

#[test]
fn test_document_round_trip() {
    let images = records(&["form.png"]);
    let boxes = vec![
        BoundingBox::new(BoxId::from_raw(3), Rect::new(10.0, 10.0, 50.0, 25.0), Tag::Dropdown),
        BoundingBox::new(BoxId::from_raw(4), Rect::new(70.0, 10.0, 15.0, 15.0), Tag::Button),
    ];
    let doc = export_single_at(&images[0], &boxes, Timestamp::from_unix_millis(86_400_000));

    let parsed = AnnotationDocument::from_json(&doc.to_json().unwrap()).unwrap();

    assert_eq!(parsed, doc);
    let tags: Vec<Tag> = parsed.annotations.iter().map(|b| b.tag).collect();
    assert_eq!(tags, vec![Tag::Dropdown, Tag::Button]);
}

#[test]
fn test_export_all_skips_images_without_boxes() {
    let images = records(&["a.png", "b.png", "c.png"]);
    let store = store_with(
        &images,
        &[
            ("c.png", Rect::new(0.0, 0.0, 20.0, 20.0), Tag::Button),
            ("a.png", Rect::new(0.0, 0.0, 20.0, 20.0), Tag::Input),
            ("a.png", Rect::new(30.0, 0.0, 20.0, 20.0), Tag::Radio),
        ],
    );

    let docs = export_all(&images, &store);

    let names: Vec<String> = docs.iter().map(AnnotationDocument::file_name).collect();
    assert_eq!(names, vec!["annotations_a.json", "annotations_c.json"]);
    assert_eq!(docs[0].annotations.len(), 2);
    assert_eq!(docs[1].annotations.len(), 1);
    // One timestamp for the whole batch
    assert_eq!(docs[0].timestamp, docs[1].timestamp);
}

#[test]
fn test_export_all_empty_store() {
    let images = records(&["a.png", "b.png"]);
    let store = store_with(&images, &[]);
    assert!(export_all(&images, &store).is_empty());
}
