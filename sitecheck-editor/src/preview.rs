//! Preview handles for newly picked photos
//!
//! A preview is a transient, locally generated thumbnail for a file that
//! has not been uploaded yet. Its pixel buffer must be reclaimed whenever
//! the owning slot is removed, replaced by its persisted form, or the
//! editor is torn down; otherwise repeated edits leak memory proportional
//! to image count.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use image::RgbaImage;

/// Longest edge of a generated preview, in pixels
const PREVIEW_MAX_EDGE: u32 = 320;

/// Renderable thumbnail tied to one `NewLocal` slot
///
/// `release` is idempotent and also runs on drop, so the buffer is
/// reclaimed on every exit path even when nobody calls it explicitly.
#[derive(Debug)]
pub struct PreviewHandle {
    pixels: Option<RgbaImage>,
    released: Arc<AtomicBool>,
}

impl PreviewHandle {
    /// Generate a preview by decoding and downscaling the picked bytes
    ///
    /// Undecodable input yields a handle with no pixels; the file was
    /// already mime-checked upstream, so this only happens for corrupt
    /// images, which still deserve a slot the user can label or remove.
    pub fn generate(bytes: &[u8]) -> Self {
        let pixels = image::load_from_memory(bytes)
            .ok()
            .map(|img| img.thumbnail(PREVIEW_MAX_EDGE, PREVIEW_MAX_EDGE).to_rgba8());

        Self {
            pixels,
            released: Arc::new(AtomicBool::new(false)),
        }
    }

    /// The decoded thumbnail, if the source bytes were a valid image
    pub fn image(&self) -> Option<&RgbaImage> {
        self.pixels.as_ref()
    }

    /// Reclaim the pixel buffer
    pub fn release(&mut self) {
        self.pixels = None;
        self.released.store(true, Ordering::SeqCst);
    }

    /// Whether this handle has been released
    pub fn is_released(&self) -> bool {
        self.released.load(Ordering::SeqCst)
    }

    /// A watch that observes this handle's release after it is gone
    pub fn watch(&self) -> PreviewWatch {
        PreviewWatch(Arc::clone(&self.released))
    }
}

impl Drop for PreviewHandle {
    fn drop(&mut self) {
        self.release();
    }
}

/// Observer for a preview's release, usable after the handle is dropped
#[derive(Debug, Clone)]
pub struct PreviewWatch(Arc<AtomicBool>);

impl PreviewWatch {
    /// Whether the watched handle has released its buffer
    pub fn is_released(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}
