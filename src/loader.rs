// THEORY:
// The `loader` module is the Image Loader collaborator: it turns an opaque
// source string into decoded pixel dimensions plus a full RGBA frame. The
// decode is the probe's only suspension point, so the trait is async; the
// default `FileLoader` pushes the actual decode onto a blocking task so the
// runtime's worker threads never stall on I/O or codec work.
//
// A successful decode is wrapped in a `LoadHandle`, the transient per-request
// resource. The handle owns the decoded frame and releases it when dropped,
// which makes cleanup automatic on every exit path of the orchestration —
// success or failure. Decode failures are returned as errors rather than
// swallowed, so a caller's callback always hears about them.

use image::RgbaImage;
use log::{debug, trace};
use tokio::task;

use crate::LumaError;

/// A decoded image: pixel dimensions plus the full RGBA frame.
pub struct DecodedImage {
    /// The width of the decoded image in pixels.
    pub width: u32,
    /// The height of the decoded image in pixels.
    pub height: u32,
    /// The decoded frame, 4 bytes per pixel, row-major.
    pub pixels: RgbaImage,
}

/// Resolves a source string into a [`DecodedImage`].
///
/// Implementations decide what a source string means (a filesystem path for
/// [`FileLoader`], a URL or cache key for custom loaders) and own any
/// transport-level access policy of their own.
pub trait ImageLoader: Send + Sync {
    fn load(&self, source: &str) -> impl Future<Output = Result<DecodedImage, LumaError>> + Send;
}

/// Default loader: treats the source string as a filesystem path and decodes
/// it with the `image` crate on a blocking task.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileLoader;

impl ImageLoader for FileLoader {
    async fn load(&self, source: &str) -> Result<DecodedImage, LumaError> {
        let path = source.to_owned();
        let decoded = task::spawn_blocking(move || image::open(path))
            .await
            .map_err(std::io::Error::other)??;

        let pixels = decoded.to_rgba8();
        let (width, height) = pixels.dimensions();
        debug!("decoded {source}: {width}x{height}");
        Ok(DecodedImage {
            width,
            height,
            pixels,
        })
    }
}

/// The transient resource backing one probe request: the source identity and
/// the decoded frame it resolved to. Dropping the handle releases the frame,
/// so every exit path of a request cleans up without explicit calls.
pub struct LoadHandle {
    source: String,
    image: DecodedImage,
}

impl LoadHandle {
    pub fn new(source: &str, image: DecodedImage) -> Self {
        Self {
            source: source.to_owned(),
            image,
        }
    }

    pub fn image(&self) -> &DecodedImage {
        &self.image
    }
}

impl Drop for LoadHandle {
    fn drop(&mut self) {
        trace!("released load handle for {}", self.source);
    }
}
