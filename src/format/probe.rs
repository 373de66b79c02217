//! Image dimension probing for COCO export.
//!
//! Each probe decodes only the image header on its own thread and resolves a
//! future when done. The thread starts on first poll, so the exporter bounds
//! how many run at once by bounding how many futures it polls.

use std::io::Cursor;

use futures::channel::oneshot;
use futures::future::BoxFuture;

use crate::format::error::FormatError;
use crate::model::{ImageRecord, ImageSource};

/// Source of pixel dimensions for images.
pub trait DimensionProbe: Sync {
    /// Resolve `(width, height)` of an image, or fail for this image only.
    fn probe<'a>(
        &'a self,
        image: &'a ImageRecord,
    ) -> BoxFuture<'a, Result<(u32, u32), FormatError>>;
}

/// Probe that reads dimensions with the `image` crate on a background thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodingProbe;

impl DimensionProbe for DecodingProbe {
    fn probe<'a>(
        &'a self,
        image: &'a ImageRecord,
    ) -> BoxFuture<'a, Result<(u32, u32), FormatError>> {
        Box::pin(async move {
            let (tx, rx) = oneshot::channel();
            let source = image.source.clone();

            std::thread::Builder::new()
                .name("dimension-probe".to_string())
                .spawn(move || {
                    // Receiver may be gone if the export was dropped
                    let _ = tx.send(read_dimensions(&source));
                })
                .map_err(|e| FormatError::probe_failed(&image.name, e))?;

            match rx.await {
                Ok(Ok(dims)) => {
                    log::trace!("Probed '{}': {}x{}", image.name, dims.0, dims.1);
                    Ok(dims)
                }
                Ok(Err(e)) => Err(FormatError::probe_failed(&image.name, e)),
                Err(oneshot::Canceled) => Err(FormatError::probe_failed(
                    &image.name,
                    "probe thread ended without a result",
                )),
            }
        })
    }
}

/// Read image dimensions from the header without decoding pixels.
pub fn read_dimensions(source: &ImageSource) -> Result<(u32, u32), image::ImageError> {
    match source {
        ImageSource::Path(path) => image::image_dimensions(path),
        ImageSource::Bytes(bytes) => image::ImageReader::new(Cursor::new(&bytes[..]))
            .with_guessed_format()?
            .into_dimensions(),
    }
}
