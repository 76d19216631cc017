use image::{Rgba, RgbaImage};
use rayon::prelude::*;

use crate::channel::Channel;
use crate::kernel::Kernel;
use crate::params::FrameParams;

/// Evaluates the fragment stage at every pixel centre of a frame.
pub fn render_frame(params: &FrameParams, channel: &Channel) -> RgbaImage {
    let width = params.resolution[0].max(1.0) as u32;
    let height = params.resolution[1].max(1.0) as u32;
    let kernel = Kernel::new(params, channel);
    let width_f = width as f32;
    let height_f = height as f32;
    let mut pixels = vec![Rgba([0u8; 4]); (width as usize) * (height as usize)];

    // Pixels are independent; split work by scanlines.
    pixels
        .par_chunks_mut(width as usize)
        .enumerate()
        .for_each(|(y, row)| {
            let v = (y as f32 + 0.5) / height_f;
            for (x, slot) in row.iter_mut().enumerate() {
                let u = (x as f32 + 0.5) / width_f;
                *slot = to_rgba8(kernel.fragment([u, v]));
            }
        });

    let mut image = RgbaImage::new(width, height);
    for (slot, pixel) in image.pixels_mut().zip(pixels) {
        *slot = pixel;
    }
    image
}

pub fn to_rgba8(color: [f32; 4]) -> Rgba<u8> {
    Rgba(color.map(|c| (c.clamp(0.0, 1.0) * 255.999) as u8))
}
