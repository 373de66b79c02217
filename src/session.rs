//! The annotation session controller.
//!
//! [`Session`] owns the loaded images, the annotation store and the
//! interaction state. UI callers mutate it only through [`Session::update`]
//! and read it back through [`Session::snapshot`]; exports read the same
//! state and never mutate it.

use rand::Rng;

use crate::config::AppConfig;
use crate::error::AnnotationError;
use crate::format::{
    AnnotationDocument, ArtifactSink, CocoDataset, DeliveryReport, DimensionProbe, FormatError,
    deliver_staggered, export_coco,
};
use crate::handlers;
use crate::message::Message;
use crate::model::{BoundingBox, BoxIdGenerator, ImageRecord};
use crate::predict::StubPredictor;
use crate::state::{AnnotationSet, Channel, InteractionState, Snapshot};

/// Mutable state the message handlers operate on.
#[derive(Debug, Clone)]
pub struct Workspace {
    pub images: Vec<ImageRecord>,
    pub store: AnnotationSet,
    pub interaction: InteractionState,
    pub ids: BoxIdGenerator,
}

impl Workspace {
    fn new(interaction: InteractionState) -> Self {
        Self {
            images: Vec::new(),
            store: AnnotationSet::new(),
            interaction,
            ids: BoxIdGenerator::new(),
        }
    }

    /// The image at the active index, if any is loaded.
    pub fn active_image(&self) -> Option<&ImageRecord> {
        self.images.get(self.interaction.active_index())
    }

    pub(crate) fn require_active(&self) -> Result<&ImageRecord, AnnotationError> {
        self.active_image()
            .ok_or_else(|| AnnotationError::NoActiveImage("nothing loaded".to_string()))
    }

    /// Ground-truth boxes of the active image.
    pub fn active_boxes(&self) -> &[BoundingBox] {
        match self.active_image() {
            Some(image) => self.store.boxes(&image.name),
            None => &[],
        }
    }
}

/// A single-user annotation session.
#[derive(Debug, Clone)]
pub struct Session {
    ws: Workspace,
    config: AppConfig,
    predictor: StubPredictor,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

impl Session {
    pub fn new(config: AppConfig) -> Self {
        let interaction = InteractionState::new(
            config.preferences.default_tag,
            config.preferences.show_boxes,
        );
        Self {
            ws: Workspace::new(interaction),
            config,
            predictor: StubPredictor::new(),
        }
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn images(&self) -> &[ImageRecord] {
        &self.ws.images
    }

    pub fn store(&self) -> &AnnotationSet {
        &self.ws.store
    }

    pub fn interaction(&self) -> &InteractionState {
        &self.ws.interaction
    }

    pub fn active_image(&self) -> Option<&ImageRecord> {
        self.ws.active_image()
    }

    /// Replace the loaded batch. Shorthand for `update(Message::Load(..))`.
    pub fn load(&mut self, images: Vec<ImageRecord>) {
        handlers::handle_load(&mut self.ws, images);
    }

    /// Apply one message.
    ///
    /// Rejected mutations leave the state unchanged; the error is logged and
    /// returned for callers that want to surface it.
    pub fn update(&mut self, message: Message) -> Result<(), AnnotationError> {
        let result = match message {
            Message::Load(images) => {
                handlers::handle_load(&mut self.ws, images);
                Ok(())
            }
            Message::PointerDown(point) => handlers::handle_pointer_down(&mut self.ws, point),
            Message::PointerMove(point) => {
                handlers::handle_pointer_move(&mut self.ws, point);
                Ok(())
            }
            Message::PointerUp => handlers::handle_pointer_up(&mut self.ws),
            Message::PointerLeave => {
                handlers::handle_pointer_leave(&mut self.ws);
                Ok(())
            }
            Message::Navigate(direction) => {
                handlers::handle_navigation(&mut self.ws, direction);
                Ok(())
            }
            Message::SelectTag(tag) => {
                handlers::handle_select_tag(&mut self.ws, tag);
                Ok(())
            }
            Message::RetagSelected(tag) => handlers::handle_retag_selected(&mut self.ws, tag),
            Message::DeleteSelected => handlers::handle_delete_selected(&mut self.ws),
            Message::ToggleBoxes => {
                handlers::handle_toggle_boxes(&mut self.ws);
                Ok(())
            }
        };

        if let Err(e) = &result {
            log::warn!("Rejected update: {}", e);
        }
        result
    }

    /// Owned view of everything the renderer draws.
    pub fn snapshot(&self) -> Snapshot {
        let interaction = &self.ws.interaction;
        let image = self.ws.active_image();
        Snapshot {
            image_name: image.map(|i| i.name.clone()),
            image_url: image.map(|i| i.url.clone()),
            image_index: interaction.active_index(),
            image_count: self.ws.images.len(),
            boxes: self.ws.active_boxes().to_vec(),
            draft: interaction.draft(),
            selected: interaction.selected(),
            show_boxes: interaction.show_boxes,
            active_tag: interaction.active_tag,
        }
    }

    /// Run the stub predictor on the active image after the configured latency.
    ///
    /// Returns the number of boxes added.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn predict(&mut self) -> Result<usize, AnnotationError> {
        self.ws.require_active()?;
        let latency = self.config.prediction.latency();
        if !latency.is_zero() {
            log::debug!("Simulating model latency of {:?}", latency);
            std::thread::sleep(latency);
        }
        self.predict_with(&mut rand::rng())
    }

    /// Run the stub predictor immediately with the given random source.
    pub fn predict_with<R: Rng + ?Sized>(
        &mut self,
        rng: &mut R,
    ) -> Result<usize, AnnotationError> {
        let name = self.ws.require_active()?.name.clone();
        let channel: Channel = self.config.prediction.target.into();
        let boxes = self.predictor.predict(&mut self.ws.ids, rng);
        let count = boxes.len();
        for bbox in boxes {
            self.ws.store.add_to(&name, channel, bbox)?;
        }
        log::info!("Predicted {} boxes for '{}' ({:?})", count, name, channel);
        Ok(count)
    }

    /// Annotation document for the active image.
    pub fn export_current(&self) -> Result<AnnotationDocument, FormatError> {
        let image = self.ws.active_image().ok_or(FormatError::NoImages)?;
        Ok(crate::format::export_single(image, self.ws.store.boxes(&image.name)))
    }

    /// Annotation documents for every image with ground truth.
    pub fn export_all(&self) -> Vec<AnnotationDocument> {
        crate::format::export_all(&self.ws.images, &self.ws.store)
    }

    /// COCO dataset for the whole batch, probing with `probe`.
    pub async fn export_coco_async(&self, probe: &dyn DimensionProbe) -> CocoDataset {
        let options = self.config.export.coco_options();
        export_coco(&self.ws.images, &self.ws.store, &options, probe).await
    }

    /// COCO dataset for the whole batch, blocking until every probe settles.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn export_coco(&self) -> CocoDataset {
        pollster::block_on(self.export_coco_async(&crate::format::DecodingProbe))
    }

    /// Export the active image and hand it to `sink`.
    pub fn deliver_current<S: ArtifactSink + ?Sized>(
        &self,
        sink: &mut S,
    ) -> Result<DeliveryReport, FormatError> {
        let doc = self.export_current()?;
        let mut report = DeliveryReport::new();
        sink.deliver(&doc.file_name(), &doc.to_json()?)?;
        report.record(doc.file_name(), doc.annotations.len());
        Ok(report)
    }

    /// Export every annotated image and hand the documents to `sink`, spaced
    /// by the configured stagger.
    pub fn deliver_all<S: ArtifactSink + ?Sized>(
        &self,
        sink: &mut S,
    ) -> Result<DeliveryReport, FormatError> {
        let docs = self.export_all();
        let mut report = DeliveryReport::new();
        let mut artifacts = Vec::with_capacity(docs.len());
        for doc in &docs {
            artifacts.push((doc.file_name(), doc.to_json()?));
        }

        deliver_staggered(&artifacts, sink, self.config.export.stagger())?;
        for doc in &docs {
            report.record(doc.file_name(), doc.annotations.len());
        }
        Ok(report)
    }

    /// Export the COCO dataset and hand it to `sink`.
    #[cfg(not(target_arch = "wasm32"))]
    pub fn deliver_coco<S: ArtifactSink + ?Sized>(
        &self,
        sink: &mut S,
    ) -> Result<DeliveryReport, FormatError> {
        if self.ws.images.is_empty() {
            return Err(FormatError::NoImages);
        }
        let dataset = self.export_coco();
        let name = &self.config.export.coco_file_name;
        sink.deliver(name, &dataset.to_json()?)?;

        let mut report = DeliveryReport::new();
        report.record(name.clone(), dataset.annotations.len());
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PredictionTarget;
    use crate::format::MemorySink;
    use crate::model::{BoxId, Point, Rect, Tag};
    use crate::state::{Direction, Mode};
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn quick_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.export.stagger_ms = 0;
        config.export.include_dimensions = false;
        config.prediction.latency_ms = 0;
        config
    }

    fn session_with(names: &[&str]) -> Session {
        let mut session = Session::new(quick_config());
        let images = names
            .iter()
            .map(|n| ImageRecord::from_bytes(*n, format!("blob:{}", n), Vec::<u8>::new()))
            .collect();
        session.update(Message::Load(images)).unwrap();
        session
    }

    fn drag(session: &mut Session, from: (f32, f32), to: (f32, f32)) {
        session
            .update(Message::PointerDown(Point::new(from.0, from.1)))
            .unwrap();
        session
            .update(Message::PointerMove(Point::new(to.0, to.1)))
            .unwrap();
        session.update(Message::PointerUp).unwrap();
    }

    #[test]
    fn test_drag_commits_normalized_box() {
        let mut session = session_with(&["a.png"]);
        session.update(Message::SelectTag(Tag::Input)).unwrap();

        drag(&mut session, (100.0, 100.0), (40.0, 70.0));

        let snap = session.snapshot();
        assert_eq!(snap.boxes.len(), 1);
        let bbox = &snap.boxes[0];
        assert_eq!(bbox.rect(), Rect::new(40.0, 70.0, 60.0, 30.0));
        assert_eq!(bbox.tag, Tag::Input);
        assert_eq!(bbox.color(), Tag::Input.color());
        assert!(snap.draft.is_none());
    }

    #[test]
    fn test_small_drag_discarded() {
        let mut session = session_with(&["a.png"]);
        drag(&mut session, (0.0, 0.0), (10.0, 50.0));
        drag(&mut session, (0.0, 0.0), (50.0, 10.0));
        drag(&mut session, (0.0, 0.0), (-10.0, -10.0));
        assert!(session.snapshot().boxes.is_empty());
        assert_eq!(session.interaction().mode(), Mode::Idle);
    }

    #[test]
    fn test_pointer_leave_cancels_draft() {
        let mut session = session_with(&["a.png"]);
        session.update(Message::PointerDown(Point::new(5.0, 5.0))).unwrap();
        session.update(Message::PointerMove(Point::new(80.0, 80.0))).unwrap();
        assert!(session.snapshot().draft.is_some());

        session.update(Message::PointerLeave).unwrap();
        session.update(Message::PointerUp).unwrap();

        let snap = session.snapshot();
        assert!(snap.draft.is_none());
        assert!(snap.boxes.is_empty());
    }

    #[test]
    fn test_ids_unique_across_images() {
        let mut session = session_with(&["a.png", "b.png"]);
        drag(&mut session, (0.0, 0.0), (20.0, 20.0));
        drag(&mut session, (30.0, 30.0), (60.0, 60.0));
        session.update(Message::Navigate(Direction::Next)).unwrap();
        drag(&mut session, (0.0, 0.0), (20.0, 20.0));

        let mut ids: Vec<BoxId> = ["a.png", "b.png"]
            .iter()
            .flat_map(|n| session.store().boxes(n).iter().map(|b| b.id))
            .collect();
        let total = ids.len();
        ids.sort();
        ids.dedup();
        assert_eq!(total, 3);
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn test_click_selects_then_retag_and_delete() {
        let mut session = session_with(&["a.png"]);
        drag(&mut session, (10.0, 10.0), (60.0, 40.0));
        let id = session.snapshot().boxes[0].id;

        session.update(Message::PointerDown(Point::new(20.0, 20.0))).unwrap();
        session.update(Message::PointerUp).unwrap();
        assert_eq!(session.snapshot().selected, Some(id));

        session.update(Message::RetagSelected(Tag::Dropdown)).unwrap();
        let snap = session.snapshot();
        assert_eq!(snap.selected_box().map(|b| b.tag), Some(Tag::Dropdown));
        assert_eq!(snap.boxes[0].color(), Tag::Dropdown.color());

        session.update(Message::DeleteSelected).unwrap();
        let snap = session.snapshot();
        assert!(snap.boxes.is_empty());
        assert!(snap.selected.is_none());
    }

    #[test]
    fn test_retag_and_delete_without_selection_are_noops() {
        let mut session = session_with(&["a.png"]);
        drag(&mut session, (10.0, 10.0), (60.0, 40.0));

        session.update(Message::RetagSelected(Tag::Radio)).unwrap();
        session.update(Message::DeleteSelected).unwrap();

        let snap = session.snapshot();
        assert_eq!(snap.boxes.len(), 1);
        assert_eq!(snap.boxes[0].tag, Tag::Button);
    }

    #[test]
    fn test_stale_selection_dropped_before_edit() {
        let mut session = session_with(&["a.png"]);
        drag(&mut session, (10.0, 10.0), (60.0, 40.0));
        drag(&mut session, (100.0, 100.0), (150.0, 130.0));
        drag(&mut session, (200.0, 200.0), (250.0, 230.0));
        let snap = session.snapshot();
        let (first, second, third) = (snap.boxes[0].id, snap.boxes[1].id, snap.boxes[2].id);

        session.update(Message::PointerDown(Point::new(20.0, 20.0))).unwrap();
        session.update(Message::PointerUp).unwrap();
        assert_eq!(session.snapshot().selected, Some(first));

        // Boxes removed behind the selection's back
        session.ws.store.delete_box("a.png", first).unwrap();
        session.update(Message::RetagSelected(Tag::Radio)).unwrap();
        assert!(session.snapshot().selected.is_none());

        session.update(Message::PointerDown(Point::new(120.0, 120.0))).unwrap();
        session.update(Message::PointerUp).unwrap();
        assert_eq!(session.snapshot().selected, Some(second));

        session.ws.store.delete_box("a.png", second).unwrap();
        session.update(Message::DeleteSelected).unwrap();

        let snap = session.snapshot();
        assert!(snap.selected.is_none());
        assert_eq!(snap.boxes.len(), 1);
        assert_eq!(snap.boxes[0].id, third);
        assert_eq!(snap.boxes[0].tag, Tag::Button);
    }

    #[test]
    fn test_navigation_clamps_and_clears() {
        let mut session = session_with(&["a.png", "b.png"]);
        drag(&mut session, (10.0, 10.0), (60.0, 40.0));
        session.update(Message::PointerDown(Point::new(20.0, 20.0))).unwrap();
        assert!(session.snapshot().selected.is_some());

        session.update(Message::Navigate(Direction::Prev)).unwrap();
        let snap = session.snapshot();
        assert_eq!(snap.image_index, 0);
        assert!(snap.selected.is_none());

        session.update(Message::Navigate(Direction::Next)).unwrap();
        session.update(Message::PointerDown(Point::new(0.0, 0.0))).unwrap();
        assert!(session.interaction().is_drawing());
        session.update(Message::Navigate(Direction::Next)).unwrap();

        let snap = session.snapshot();
        assert_eq!(snap.image_index, 1);
        assert_eq!(snap.image_name.as_deref(), Some("b.png"));
        assert!(snap.draft.is_none());
        assert_eq!(snap.progress(), "2/2");
    }

    #[test]
    fn test_pointer_without_images_rejected() {
        let mut session = Session::new(quick_config());
        let result = session.update(Message::PointerDown(Point::new(1.0, 1.0)));
        assert!(matches!(result, Err(AnnotationError::NoActiveImage(_))));
        assert_eq!(session.interaction().mode(), Mode::Idle);
        assert_eq!(session.snapshot().progress(), "0/0");
    }

    #[test]
    fn test_load_replaces_batch() {
        let mut session = session_with(&["a.png", "b.png"]);
        session.update(Message::Navigate(Direction::Next)).unwrap();
        drag(&mut session, (10.0, 10.0), (60.0, 40.0));

        session.load(vec![ImageRecord::from_bytes("c.png", "", Vec::<u8>::new())]);

        assert_eq!(session.interaction().active_index(), 0);
        assert_eq!(session.store().len(), 1);
        assert!(!session.store().contains("b.png"));
        assert!(session.snapshot().boxes.is_empty());
    }

    #[test]
    fn test_toggle_boxes() {
        let mut session = session_with(&["a.png"]);
        assert!(session.snapshot().show_boxes);
        session.update(Message::ToggleBoxes).unwrap();
        assert!(!session.snapshot().show_boxes);
    }

    #[test]
    fn test_predict_writes_configured_channel() {
        let mut session = session_with(&["a.png"]);
        let mut rng = StdRng::seed_from_u64(3);
        assert_eq!(session.predict_with(&mut rng).unwrap(), 3);
        assert_eq!(session.store().boxes("a.png").len(), 3);

        let mut config = quick_config();
        config.prediction.target = PredictionTarget::Predictions;
        let mut session = Session::new(config);
        session.load(vec![ImageRecord::from_bytes("a.png", "", Vec::<u8>::new())]);
        session.predict_with(&mut rng).unwrap();
        assert!(session.store().boxes("a.png").is_empty());
        assert_eq!(session.store().predictions("a.png").len(), 3);
    }

    #[test]
    fn test_predict_requires_image() {
        let mut session = Session::new(quick_config());
        assert!(matches!(
            session.predict(),
            Err(AnnotationError::NoActiveImage(_))
        ));
    }

    #[test]
    fn test_deliver_all_and_coco() {
        let mut session = session_with(&["a.png", "b.png", "c.png"]);
        drag(&mut session, (1.0, 2.0), (21.0, 32.0));
        session.update(Message::Navigate(Direction::Next)).unwrap();
        session.update(Message::Navigate(Direction::Next)).unwrap();
        session.update(Message::SelectTag(Tag::Radio)).unwrap();
        drag(&mut session, (5.0, 5.0), (25.0, 25.0));

        let mut sink = MemorySink::new();
        let report = session.deliver_all(&mut sink).unwrap();
        assert_eq!(report.delivered, vec!["annotations_a.json", "annotations_c.json"]);
        assert_eq!(report.annotations, 2);

        let report = session.deliver_coco(&mut sink).unwrap();
        assert_eq!(report.delivered, vec!["_annotations.coco.json"]);

        let coco: CocoDataset =
            serde_json::from_str(sink.get("_annotations.coco.json").unwrap()).unwrap();
        assert_eq!(coco.images.len(), 3);
        assert!(coco.images.iter().all(|i| (i.width, i.height) == (1024, 768)));
        let cats: Vec<u32> = coco.annotations.iter().map(|a| a.category_id).collect();
        assert_eq!(cats, vec![1, 3]);
    }

    #[test]
    fn test_deliver_current() {
        let mut session = session_with(&["shot.v1.png"]);
        drag(&mut session, (0.0, 0.0), (30.0, 30.0));

        let mut sink = MemorySink::new();
        session.deliver_current(&mut sink).unwrap();

        let doc = AnnotationDocument::from_json(sink.get("annotations_shot.v1.json").unwrap())
            .unwrap();
        assert_eq!(doc.image_name, "shot.v1.png");
        assert_eq!(doc.annotations.len(), 1);
    }

    #[test]
    fn test_exports_without_images() {
        let session = Session::new(quick_config());
        assert!(matches!(session.export_current(), Err(FormatError::NoImages)));
        assert!(session.export_all().is_empty());
        assert!(matches!(
            session.deliver_coco(&mut MemorySink::new()),
            Err(FormatError::NoImages)
        ));
    }
}
