//! Stub box predictor.
//!
//! Stands in for a detection model: it fabricates a fixed set of boxes with a
//! little random jitter so repeated runs do not stack exactly on top of each
//! other.

use rand::Rng;

use crate::model::{BoundingBox, BoxIdGenerator, Rect, Tag};

/// Upper bound (exclusive) of the random offset added to each coordinate.
pub const JITTER: f32 = 50.0;

/// One fabricated box before jitter: tag, base position and size.
const TEMPLATE: [(Tag, f32, f32, f32, f32); 3] = [
    (Tag::Button, 100.0, 50.0, 80.0, 30.0),
    (Tag::Input, 50.0, 150.0, 200.0, 25.0),
    (Tag::Radio, 300.0, 100.0, 15.0, 15.0),
];

/// Fabricates prediction boxes from a fixed template.
#[derive(Debug, Clone, Copy, Default)]
pub struct StubPredictor;

impl StubPredictor {
    pub fn new() -> Self {
        Self
    }

    /// Produce one box per template entry with fresh ids, jittering each
    /// coordinate by a value in `[0, JITTER)`.
    pub fn predict<R: Rng + ?Sized>(
        &self,
        ids: &mut BoxIdGenerator,
        rng: &mut R,
    ) -> Vec<BoundingBox> {
        TEMPLATE
            .iter()
            .map(|&(tag, x, y, width, height)| {
                let rect = Rect::new(
                    x + rng.random_range(0.0..JITTER),
                    y + rng.random_range(0.0..JITTER),
                    width,
                    height,
                );
                BoundingBox::new(ids.next_id(), rect, tag)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_predicts_three_template_boxes() {
        let mut ids = BoxIdGenerator::new();
        let mut rng = StdRng::seed_from_u64(7);
        let boxes = StubPredictor::new().predict(&mut ids, &mut rng);

        let tags: Vec<Tag> = boxes.iter().map(|b| b.tag).collect();
        assert_eq!(tags, vec![Tag::Button, Tag::Input, Tag::Radio]);

        let sizes: Vec<(f32, f32)> = boxes.iter().map(|b| (b.width, b.height)).collect();
        assert_eq!(sizes, vec![(80.0, 30.0), (200.0, 25.0), (15.0, 15.0)]);
    }

    #[test]
    fn test_jitter_stays_in_range() {
        let mut ids = BoxIdGenerator::new();
        let mut rng = StdRng::seed_from_u64(42);
        let predictor = StubPredictor::new();

        for _ in 0..200 {
            let boxes = predictor.predict(&mut ids, &mut rng);
            for (bbox, &(_, x, y, _, _)) in boxes.iter().zip(&TEMPLATE) {
                assert!(bbox.x >= x && bbox.x <= x + JITTER);
                assert!(bbox.y >= y && bbox.y <= y + JITTER);
            }
        }
    }

    #[test]
    fn test_ids_are_fresh() {
        let mut ids = BoxIdGenerator::new();
        let mut rng = StdRng::seed_from_u64(1);
        let predictor = StubPredictor::new();

        let first = predictor.predict(&mut ids, &mut rng);
        let second = predictor.predict(&mut ids, &mut rng);

        let mut all: Vec<u64> = first.iter().chain(&second).map(|b| b.id.raw()).collect();
        all.dedup();
        assert_eq!(all.len(), 6);
        assert!(all.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn test_same_seed_same_boxes() {
        let predictor = StubPredictor::new();
        let a = predictor.predict(&mut BoxIdGenerator::new(), &mut StdRng::seed_from_u64(9));
        let b = predictor.predict(&mut BoxIdGenerator::new(), &mut StdRng::seed_from_u64(9));
        assert_eq!(a, b);
    }
}
