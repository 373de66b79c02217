//! UIAT - UI Component Annotation Tool
//!
//! Core of a bounding-box annotation tool for user interface screenshots:
//! load a batch of images, draw and tag boxes over them, and export the
//! result as per-image JSON documents or a COCO detection dataset.
//!
//! Rendering and file picking live with the embedding UI. It drives a
//! [`Session`] with [`Message`]s and draws from [`Session::snapshot`].

pub mod config;
pub mod constants;
pub mod data;
pub mod error;
pub mod format;
pub mod handlers;
pub mod message;
pub mod model;
pub mod predict;
pub mod session;
pub mod state;

pub use config::AppConfig;
pub use error::AnnotationError;
pub use message::Message;
pub use session::Session;
