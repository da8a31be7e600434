// THEORY:
// The parallel path splits a large region's buffer into per-worker shards,
// sums each shard on a blocking task, and merges the exact partial sums before
// the single truncating division. Because `ChannelSums` stays exact until
// `finalize`, this path is bit-identical to the serial pass by construction —
// rounding happens once, at the end, never per shard.
//
// Shard boundaries always fall on whole pixels: the per-worker quota is a
// pixel count, multiplied by the channel stride only when slicing bytes.

use std::sync::Arc;

use futures::future::join_all;
use log::debug;

use crate::LumaError;
use crate::core_modules::averager::averager::{AverageResult, ChannelSums};
use crate::core_modules::pixel::pixel::CHANNELS;
use crate::core_modules::region::region::Region;

/// Averages a region's buffer using `workers` blocking tasks (one per
/// available core when `workers` is zero). Same contract and same results as
/// [`averager::compute`](crate::core_modules::averager::averager::compute).
pub async fn compute_parallel(
    buffer: Vec<u8>,
    region: &Region,
    workers: usize,
) -> Result<AverageResult, LumaError> {
    if region.is_empty() {
        return Err(LumaError::EmptyRegion);
    }
    let total_pixels = region.pixel_count();
    let expected = total_pixels * CHANNELS;
    if buffer.len() != expected {
        return Err(LumaError::BufferSizeMismatch {
            expected,
            actual: buffer.len(),
        });
    }

    let workers = if workers == 0 { num_cpus::get() } else { workers };
    let pixels_per_worker = total_pixels.div_ceil(workers);
    debug!("parallel averaging: {total_pixels} pixels across {workers} workers");

    let buffer = Arc::new(buffer);
    let mut tasks = Vec::with_capacity(workers);
    for worker in 0..workers {
        let start = worker * pixels_per_worker * CHANNELS;
        if start >= buffer.len() {
            break;
        }
        let end = (start + pixels_per_worker * CHANNELS).min(buffer.len());
        let shard = Arc::clone(&buffer);
        tasks.push(tokio::task::spawn_blocking(move || {
            let mut sums = ChannelSums::default();
            sums.accumulate(&shard[start..end]);
            sums
        }));
    }

    let mut sums = ChannelSums::default();
    for partial in join_all(tasks).await {
        let partial = partial.map_err(std::io::Error::other)?;
        sums.merge(&partial);
    }
    Ok(sums.finalize(total_pixels))
}
