// THEORY:
// The `Pixel` module is the most fundamental unit of the probe. It is a "dumb"
// data container for a single RGBA sample plus the one metric that can be
// computed from a pixel alone: its floored RGB mean, which the rest of the
// crate calls "brightness".
//
// Key principles:
// 1.  **Single-pixel scope**: Nothing here reads neighbors or history. Anything
//     that needs more than one pixel (region sums, averages) lives in `averager`.
// 2.  **Integer math only**: The floor in `brightness` is a deliberate part of
//     the output contract. It is applied per pixel, BEFORE any region-level
//     averaging, so a region's brightness is the mean of already-floored
//     values, not the floored mean of raw channel sums. The two disagree in
//     general and the per-pixel-first order is the one we report.
// 3.  **Naive mean**: Brightness is an unweighted (r+g+b)/3, not a Rec. 601 or
//     perceptual luminance formula.

pub mod pixel {
    pub type Byte = u8;
    pub type Channel = Byte;

    /// Bytes per RGBA sample in a flat pixel buffer.
    pub const CHANNELS: usize = 4;

    /// A "dumb" data container representing a single RGBA pixel.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct Pixel {
        /// The red channel value (0-255).
        pub red: Channel,
        /// The green channel value (0-255).
        pub green: Channel,
        /// The blue channel value (0-255).
        pub blue: Channel,
        /// The alpha (transparency) channel value (0-255).
        pub alpha: Channel,
    }

    impl Pixel {
        pub fn new(red: Channel, green: Channel, blue: Channel, alpha: Channel) -> Self {
            Self {
                red,
                green,
                blue,
                alpha,
            }
        }

        /// Builds a pixel from four consecutive RGBA bytes.
        ///
        /// Panics if the slice holds fewer than [`CHANNELS`] bytes; callers
        /// iterate buffers with `chunks_exact(CHANNELS)` so short slices never
        /// reach this point.
        pub fn from_rgba(bytes: &[Byte]) -> Self {
            Self {
                red: bytes[0],
                green: bytes[1],
                blue: bytes[2],
                alpha: bytes[3],
            }
        }

        /// The pixel's own floored RGB mean.
        ///
        /// The truncating division happens here, per pixel. Region averaging
        /// then averages these already-floored values.
        pub fn brightness(&self) -> Channel {
            ((self.red as u16 + self.green as u16 + self.blue as u16) / 3) as Channel
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn brightness_floors_the_rgb_mean() {
            // (200 + 100 + 50) / 3 = 116.66.., truncated to 116.
            let pixel = Pixel::new(200, 100, 50, 255);
            assert_eq!(pixel.brightness(), 116);
        }

        #[test]
        fn brightness_of_uniform_pixel_is_the_channel_value() {
            for c in [0u8, 1, 42, 127, 254, 255] {
                assert_eq!(Pixel::new(c, c, c, 255).brightness(), c);
            }
        }

        #[test]
        fn from_rgba_reads_channel_order() {
            let pixel = Pixel::from_rgba(&[10, 20, 30, 40]);
            assert_eq!(pixel, Pixel::new(10, 20, 30, 40));
        }

        #[test]
        fn brightness_does_not_overflow_on_white() {
            assert_eq!(Pixel::new(255, 255, 255, 255).brightness(), 255);
        }
    }
}
