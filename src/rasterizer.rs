// THEORY:
// The `rasterizer` module is the Rasterizer collaborator: it renders a decoded
// image onto an off-screen RGBA surface and reads the raw bytes of arbitrary
// sub-rectangles back out of it.
//
// One behavior here is deliberate and worth stating plainly: the surface is
// always sized to the FULL decoded image, no matter how small a region the
// request asked for. The crop only restricts which bytes `extract` copies out,
// never how much gets rasterized. Callers that probe a tiny corner of a large
// image still pay for the full-frame rasterization.

use log::debug;

use crate::LumaError;
use crate::core_modules::pixel::pixel::CHANNELS;
use crate::core_modules::region::region::Region;
use crate::loader::DecodedImage;

/// An off-screen surface holding the fully rasterized RGBA frame.
pub struct Surface {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl Surface {
    /// Rasterizes the entire decoded image. Always full-frame; see the module
    /// notes on why a requested crop does not shrink this step.
    pub fn rasterize(image: &DecodedImage) -> Self {
        debug!("rasterizing full {}x{} frame", image.width, image.height);
        Self {
            width: image.width,
            height: image.height,
            data: image.pixels.as_raw().clone(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Copies the row-major RGBA bytes of `region` out of the surface.
    ///
    /// The region must be non-empty and lie entirely within the surface;
    /// nothing is clipped or zero-padded, out-of-bounds requests fail.
    pub fn extract(&self, region: &Region) -> Result<Vec<u8>, LumaError> {
        if region.is_empty() {
            return Err(LumaError::EmptyRegion);
        }
        if !region.fits_within(self.width, self.height) {
            return Err(LumaError::RegionOutOfBounds {
                region: *region,
                width: self.width,
                height: self.height,
            });
        }

        let row_bytes = region.width as usize * CHANNELS;
        let surface_row = self.width as usize * CHANNELS;
        let mut buffer = Vec::with_capacity(region.pixel_count() * CHANNELS);
        for row in 0..region.height as usize {
            let y = region.offset_y as usize + row;
            let start = y * surface_row + region.offset_x as usize * CHANNELS;
            buffer.extend_from_slice(&self.data[start..start + row_bytes]);
        }
        Ok(buffer)
    }
}
