/*!
Screenshot helper (feature `screenshot`): dump the current frame to an
image file.
*/

use std::path::Path;

use image::{ImageBuffer, Rgba};

use crate::machine::Machine;
use crate::ppu::{SCREEN_HEIGHT, SCREEN_WIDTH};

/// Write the machine's current frame to `path`; the format follows the
/// file extension (PNG recommended).
pub fn save_frame<P: AsRef<Path>>(machine: &Machine, path: P) -> image::ImageResult<()> {
    let frame = machine.framebuffer().to_vec();
    let img: ImageBuffer<Rgba<u8>, Vec<u8>> =
        ImageBuffer::from_raw(SCREEN_WIDTH as u32, SCREEN_HEIGHT as u32, frame)
            .expect("framebuffer dimensions are fixed");
    img.save(path)
}
