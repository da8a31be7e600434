// THEORY:
// The `pipeline` module is the final, top-level API for the probe. It
// encapsulates the full request sequence behind a single struct: resolve the
// source through the Image Loader, rasterize the full frame, extract the
// requested region, run the averaging pass, and deliver exactly one result.
//
// Two shapes of the same operation are offered:
// - `probe`: an async method for callers already on a runtime, returning the
//   result directly.
// - `request_averages`: fire-and-forget; spawns a task and hands the result
//   (success or failure) to a one-shot callback. Unlike the callback-only
//   ancestry of this design, failures are delivered too — a request never
//   silently hangs.
//
// Each invocation owns its LoadHandle, pixel buffer, and accumulators
// exclusively; nothing is shared and nothing survives the request. Concurrent
// requests are therefore independent, but each pending one holds a decoded
// frame in memory, and no pooling or throttling is provided.

use log::warn;

use crate::LumaError;
use crate::core_modules::averager::averager;
use crate::loader::{FileLoader, ImageLoader, LoadHandle};
use crate::parallel_pipeline;
use crate::rasterizer::Surface;

// Re-export key data structures for the public API.
pub use crate::core_modules::averager::averager::AverageResult;
pub use crate::core_modules::region::region::Region;

/// Configuration for the probe, allowing for tunable behavior.
#[derive(Debug, Clone)]
pub struct ProbeConfig {
    /// Regions with at least this many pixels are summed on parallel workers;
    /// smaller ones take the serial pass. Both paths produce identical
    /// results, so this is purely a throughput knob.
    pub parallel_threshold: usize,
    /// Worker count for the parallel path. Zero means one per available core.
    pub workers: usize,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            // Roughly a 1080p frame; smaller regions are not worth the
            // task-spawn overhead.
            parallel_threshold: 1 << 21,
            workers: 0,
        }
    }
}

/// The main, top-level struct for the probe.
#[derive(Debug, Clone, Default)]
pub struct LuminosityProbe<L = FileLoader> {
    loader: L,
    config: ProbeConfig,
}

impl LuminosityProbe<FileLoader> {
    /// A probe that reads sources from the filesystem with default tuning.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L: ImageLoader> LuminosityProbe<L> {
    /// A probe backed by a custom [`ImageLoader`].
    pub fn with_loader(loader: L) -> Self {
        Self {
            loader,
            config: ProbeConfig::default(),
        }
    }

    pub fn with_config(mut self, config: ProbeConfig) -> Self {
        self.config = config;
        self
    }

    /// Loads `source`, averages the requested region (the full image when
    /// `region` is `None`), and returns the five averages.
    ///
    /// The full frame is always rasterized regardless of the crop; the region
    /// only selects which bytes are summed. The decode resource is released
    /// when this call returns, on success and on every error path.
    pub async fn probe(
        &self,
        source: &str,
        region: Option<Region>,
    ) -> Result<AverageResult, LumaError> {
        let decoded = self.loader.load(source).await?;
        let handle = LoadHandle::new(source, decoded);

        let surface = Surface::rasterize(handle.image());
        let region = region.unwrap_or_else(|| Region::full(surface.width(), surface.height()));
        let buffer = surface.extract(&region)?;

        if region.pixel_count() >= self.config.parallel_threshold {
            parallel_pipeline::compute_parallel(buffer, &region, self.config.workers).await
        } else {
            averager::compute(&buffer, &region)
        }
    }

    /// Fire-and-forget form: spawns a task and invokes `callback` exactly once
    /// with the request's outcome, `Ok` or `Err`.
    ///
    /// Must be called from within a tokio runtime. There is no cancellation:
    /// once requested, the load runs to completion or failure.
    pub fn request_averages<F>(&self, source: &str, region: Option<Region>, callback: F)
    where
        L: Clone + 'static,
        F: FnOnce(Result<AverageResult, LumaError>) + Send + 'static,
    {
        let probe = self.clone();
        let source = source.to_owned();
        tokio::spawn(async move {
            let result = probe.probe(&source, region).await;
            if let Err(error) = &result {
                warn!("probe of {source} failed: {error}");
            }
            callback(result);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::ImageEncoder;
    use tokio::sync::oneshot;

    fn write_png_fixture(name: &str, width: u32, height: u32, buffer: &[u8]) -> String {
        let path = std::env::temp_dir().join(name);
        let output = std::fs::File::create(&path).expect("Error creating fixture file.");
        let encoder = image::codecs::png::PngEncoder::new(output);
        encoder
            .write_image(buffer, width, height, image::ExtendedColorType::Rgba8)
            .expect("Error encoding fixture.");
        path.to_str().expect("fixture path was not UTF-8").to_owned()
    }

    fn checkered_fixture(name: &str) -> String {
        // 6x4 frame: the 2x2 block at (2,1) is transparent black, the rest is
        // opaque white.
        let width = 6u32;
        let height = 4u32;
        let mut buffer = vec![255u8; (width * height * 4) as usize];
        for y in 1..3u32 {
            for x in 2..4u32 {
                let start = ((y * width + x) * 4) as usize;
                buffer[start..start + 4].copy_from_slice(&[0, 0, 0, 0]);
            }
        }
        write_png_fixture(name, width, height, &buffer)
    }

    #[tokio::test]
    async fn full_image_probe_of_uniform_gray() {
        let buffer = vec![80u8; 5 * 5 * 4];
        let source = write_png_fixture("lumascope_pipeline_gray.png", 5, 5, &buffer);

        let result = LuminosityProbe::new()
            .probe(&source, None)
            .await
            .expect("probe failed");
        assert_eq!(result.brightness, 80);
        assert_eq!(result.opacity, 80);
        assert_eq!((result.r, result.g, result.b), (80, 80, 80));
    }

    #[tokio::test]
    async fn sub_region_ignores_pixels_outside_it() {
        let source = checkered_fixture("lumascope_pipeline_checkered.png");

        // Probe only the transparent-black block; the surrounding white must
        // not influence the result.
        let result = LuminosityProbe::new()
            .probe(&source, Some(Region::new(2, 1, 2, 2)))
            .await
            .expect("probe failed");
        assert_eq!(
            result,
            AverageResult {
                brightness: 0,
                opacity: 0,
                r: 0,
                g: 0,
                b: 0,
            }
        );
    }

    #[tokio::test]
    async fn parallel_path_matches_serial_path() {
        let source = checkered_fixture("lumascope_pipeline_parallel.png");
        let serial = LuminosityProbe::new()
            .probe(&source, None)
            .await
            .expect("serial probe failed");

        let config = ProbeConfig {
            parallel_threshold: 1,
            workers: 3,
        };
        let parallel = LuminosityProbe::new()
            .with_config(config)
            .probe(&source, None)
            .await
            .expect("parallel probe failed");
        assert_eq!(serial, parallel);
    }

    #[tokio::test]
    async fn out_of_bounds_region_fails_explicitly() {
        let buffer = vec![10u8; 4 * 4 * 4];
        let source = write_png_fixture("lumascope_pipeline_bounds.png", 4, 4, &buffer);

        let result = LuminosityProbe::new()
            .probe(&source, Some(Region::new(3, 3, 4, 4)))
            .await;
        assert!(matches!(
            result,
            Err(LumaError::RegionOutOfBounds { width: 4, height: 4, .. })
        ));
    }

    #[tokio::test]
    async fn empty_region_fails_explicitly() {
        let buffer = vec![10u8; 4 * 4 * 4];
        let source = write_png_fixture("lumascope_pipeline_empty.png", 4, 4, &buffer);

        let result = LuminosityProbe::new()
            .probe(&source, Some(Region::new(0, 0, 0, 0)))
            .await;
        assert!(matches!(result, Err(LumaError::EmptyRegion)));
    }

    #[tokio::test]
    async fn callback_receives_the_result_exactly_once() {
        let buffer = vec![200u8, 100, 50, 255];
        let source = write_png_fixture("lumascope_pipeline_callback.png", 1, 1, &buffer);

        let (tx, rx) = oneshot::channel();
        LuminosityProbe::new().request_averages(&source, None, move |result| {
            let _ = tx.send(result);
        });

        let result = rx
            .await
            .expect("callback never fired")
            .expect("probe failed");
        assert_eq!(result.brightness, 116);
        assert_eq!((result.r, result.g, result.b), (200, 100, 50));
        assert_eq!(result.opacity, 255);
    }

    #[tokio::test]
    async fn callback_hears_about_load_failures() {
        let (tx, rx) = oneshot::channel();
        LuminosityProbe::new().request_averages(
            "/nonexistent/lumascope_missing.png",
            None,
            move |result| {
                let _ = tx.send(result);
            },
        );

        let result = rx.await.expect("callback never fired");
        assert!(matches!(result, Err(LumaError::Load(_))));
    }

    #[tokio::test]
    async fn concurrent_requests_are_independent() {
        let gray = write_png_fixture("lumascope_pipeline_gray_a.png", 2, 2, &vec![40u8; 16]);
        let white = write_png_fixture("lumascope_pipeline_gray_b.png", 2, 2, &vec![255u8; 16]);

        let probe = LuminosityProbe::new();
        let (a, b) = tokio::join!(probe.probe(&gray, None), probe.probe(&white, None));
        assert_eq!(a.expect("probe failed").brightness, 40);
        assert_eq!(b.expect("probe failed").brightness, 255);
    }
}
