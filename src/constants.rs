//! Global constants for UIAT

/// Width used for COCO images whose size is unknown
pub const DEFAULT_IMAGE_WIDTH: u32 = 1024;

/// Height used for COCO images whose size is unknown
pub const DEFAULT_IMAGE_HEIGHT: u32 = 768;

/// Image dimension reads allowed in flight during COCO export
pub const MAX_CONCURRENT_DECODES: usize = 8;

/// Delay between consecutive batch deliveries in milliseconds
pub const DEFAULT_STAGGER_MS: u64 = 100;

/// Simulated model latency of the stub predictor in milliseconds
pub const DEFAULT_PREDICTION_LATENCY_MS: u64 = 2000;

/// File name of the COCO dataset artifact
pub const DEFAULT_COCO_FILE_NAME: &str = "_annotations.coco.json";

/// Output folder used by the binary when none is given
pub const DEFAULT_OUTPUT_DIR: &str = "annotations";
