// THEORY:
// This file is the main entry point for the `lumascope` library crate.
// It follows the standard Rust convention of using `lib.rs` to define the public
// API that will be exposed to external consumers.
//
// The primary goal is to export the `LuminosityProbe` and its associated data
// structures (`ProbeConfig`, `AverageResult`, `Region`) as the clean, high-level
// interface for the whole probe. The aggregation internals (`core_modules`) and
// the two collaborators (`loader`, `rasterizer`) stay behind that surface, but
// remain public so callers can drive the averaging pass on their own buffers or
// plug in a custom image loader.

pub mod core_modules;
pub mod loader;
pub mod parallel_pipeline;
pub mod pipeline;
pub mod rasterizer;

use crate::core_modules::region::region::Region;

/// All the ways a single probe request can fail. Every variant is terminal for
/// its request: there are no retries and no partial results.
#[derive(Debug, thiserror::Error)]
pub enum LumaError {
    #[error("failed to decode image source: {0}")]
    Load(#[from] image::ImageError),
    #[error("failed to read image source: {0}")]
    Io(#[from] std::io::Error),
    #[error("region is empty: width * height must be at least 1")]
    EmptyRegion,
    #[error("region {region:?} extends outside the {width}x{height} decoded image")]
    RegionOutOfBounds {
        region: Region,
        width: u32,
        height: u32,
    },
    #[error("pixel buffer holds {actual} bytes but the region needs {expected}")]
    BufferSizeMismatch { expected: usize, actual: usize },
}
