// THEORY:
// The `Region` module describes the rectangular sub-area of an image that a
// probe request wants averaged. It is pure geometry: offsets and sizes, plus
// the two checks every caller needs before touching pixel data (is the
// rectangle non-empty, and does it fit inside the decoded image). The checks
// live here so the averager and the rasterizer validate against one source of
// truth instead of re-deriving bounds math.

pub mod region {
    /// A rectangular sub-area of an image's pixel grid.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Region {
        /// Horizontal offset of the rectangle's left edge, in pixels.
        pub offset_x: u32,
        /// Vertical offset of the rectangle's top edge, in pixels.
        pub offset_y: u32,
        /// The width of the rectangle in pixels.
        pub width: u32,
        /// The height of the rectangle in pixels.
        pub height: u32,
    }

    impl Region {
        pub fn new(offset_x: u32, offset_y: u32, width: u32, height: u32) -> Self {
            Self {
                offset_x,
                offset_y,
                width,
                height,
            }
        }

        /// The full-image region for a decoded image of the given dimensions.
        /// This is the default when a request names no region of its own.
        pub fn full(width: u32, height: u32) -> Self {
            Self::new(0, 0, width, height)
        }

        /// Number of pixels inside the rectangle.
        pub fn pixel_count(&self) -> usize {
            self.width as usize * self.height as usize
        }

        /// An empty region has nothing to average and would divide by zero.
        pub fn is_empty(&self) -> bool {
            self.width == 0 || self.height == 0
        }

        /// True when the rectangle lies entirely within an image of the given
        /// dimensions. Widened to u64 so offset + size cannot wrap.
        pub fn fits_within(&self, image_width: u32, image_height: u32) -> bool {
            let right = self.offset_x as u64 + self.width as u64;
            let bottom = self.offset_y as u64 + self.height as u64;
            right <= image_width as u64 && bottom <= image_height as u64
        }
    }

}
