// THEORY:
// The `averager` module is the algorithmic heart of the crate: one linear pass
// over a flat RGBA buffer that produces five truncated means (brightness,
// opacity, red, green, blue). Everything else in the crate exists to get a
// buffer into this pass and a result back out.
//
// Key architectural principles:
// 1.  **Two-stage rounding**: Each pixel's brightness is floored individually
//     (in `Pixel::brightness`) before being summed; the region mean is then
//     floored once more at the final division. Collapsing the two floors into
//     one changes the output, so the order is part of the contract.
// 2.  **Truncate once**: The five running sums stay exact (u64) until the
//     single `finalize` division. Partial sums from parallel workers are
//     merged while still exact, so the parallel path is bit-identical to the
//     serial one.
// 3.  **Pure function**: `compute` holds no state across calls. Accumulators
//     live in a `ChannelSums` value scoped to one invocation; nothing survives
//     the request that created it.
// 4.  **Every pixel, exactly once**: No sampling, no stride tricks, no early
//     exit. The pass is O(pixels) time and O(1) space beyond the buffer.

pub mod averager {
    use crate::LumaError;
    use crate::core_modules::pixel::pixel::{CHANNELS, Pixel};
    use crate::core_modules::region::region::Region;
    use log::trace;

    /// Pixels per batch in the accumulation loop, for cache locality.
    const CHUNK_SIZE: usize = 64;

    /// The five averages reported for a region, each in [0, 255].
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct AverageResult {
        /// Mean of per-pixel floored RGB means.
        pub brightness: u8,
        /// Mean alpha-channel value.
        pub opacity: u8,
        /// Mean red-channel value.
        pub r: u8,
        /// Mean green-channel value.
        pub g: u8,
        /// Mean blue-channel value.
        pub b: u8,
    }

    /// Exact running totals for a set of pixels.
    ///
    /// Sums are u64: even a u32::MAX-pixel region of white stays far below
    /// overflow. Totals from disjoint slices of the same buffer may be
    /// combined with [`merge`](ChannelSums::merge) before the single
    /// truncating division in [`finalize`](ChannelSums::finalize).
    #[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
    pub struct ChannelSums {
        pub brightness: u64,
        pub red: u64,
        pub green: u64,
        pub blue: u64,
        pub alpha: u64,
    }

    impl ChannelSums {
        /// Adds every pixel of a flat RGBA slice to the running totals.
        /// The slice length must be a multiple of four; trailing partial
        /// samples are ignored by `chunks_exact`.
        pub fn accumulate(&mut self, rgba: &[u8]) {
            // Process in batches for better vectorization.
            for batch in rgba.chunks(CHANNELS * CHUNK_SIZE) {
                for sample in batch.chunks_exact(CHANNELS) {
                    let pixel = Pixel::from_rgba(sample);
                    self.red += pixel.red as u64;
                    self.green += pixel.green as u64;
                    self.blue += pixel.blue as u64;
                    self.alpha += pixel.alpha as u64;
                    self.brightness += pixel.brightness() as u64;
                }
            }
        }

        /// Folds another accumulator's totals into this one. Sums are still
        /// exact at this point; no rounding has happened yet.
        pub fn merge(&mut self, other: &ChannelSums) {
            self.brightness += other.brightness;
            self.red += other.red;
            self.green += other.green;
            self.blue += other.blue;
            self.alpha += other.alpha;
        }

        /// Divides every sum by the pixel count, truncating toward zero.
        /// This is the only place rounding of the region means occurs.
        pub fn finalize(&self, total_pixels: usize) -> AverageResult {
            let average = |sum: u64| (sum / total_pixels as u64) as u8;
            AverageResult {
                brightness: average(self.brightness),
                opacity: average(self.alpha),
                r: average(self.red),
                g: average(self.green),
                b: average(self.blue),
            }
        }
    }

    /// Runs the aggregation pass over a region's pixel buffer.
    ///
    /// `buffer` must hold exactly the region's pixels (4 bytes each, row-major)
    /// and the region must be non-empty; both are checked before the pass so a
    /// bad request fails explicitly instead of dividing by zero.
    pub fn compute(buffer: &[u8], region: &Region) -> Result<AverageResult, LumaError> {
        if region.is_empty() {
            return Err(LumaError::EmptyRegion);
        }
        let expected = region.pixel_count() * CHANNELS;
        if buffer.len() != expected {
            return Err(LumaError::BufferSizeMismatch {
                expected,
                actual: buffer.len(),
            });
        }

        trace!("averaging {} pixels", region.pixel_count());
        let mut sums = ChannelSums::default();
        sums.accumulate(buffer);
        Ok(sums.finalize(region.pixel_count()))
    }

}
