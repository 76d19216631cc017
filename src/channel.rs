use std::path::Path;

use image::{Rgba, RgbaImage};

/// Read-only RGBA8 texture bound as channel0, sampled bilinearly with repeat wrapping.
#[derive(Clone, Debug)]
pub struct Channel {
    image: RgbaImage,
}

impl Channel {
    pub fn new(image: RgbaImage) -> Result<Self, String> {
        if image.width() == 0 || image.height() == 0 {
            return Err("channel texture must have non-zero dimensions".into());
        }
        Ok(Self { image })
    }

    pub fn solid(rgba: [u8; 4]) -> Self {
        Self {
            image: RgbaImage::from_pixel(1, 1, Rgba(rgba)),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, String> {
        let image = image::open(path)
            .map_err(|error| format!("failed to load channel '{}': {error}", path.display()))?
            .to_rgba8();
        Self::new(image)
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }

    /// Samples at `uv` in texture space; values outside `[0, 1)` wrap around.
    pub fn sample(&self, uv: [f32; 2]) -> [f32; 4] {
        let (width, height) = self.image.dimensions();
        // Texel centres sit at half-integer coordinates.
        let x = (uv[0] * width as f32) - 0.5;
        let y = (uv[1] * height as f32) - 0.5;
        let x0 = x.floor();
        let y0 = y.floor();
        let tx = x - x0;
        let ty = y - y0;

        let fetch = |dx: f32, dy: f32| -> [f32; 4] {
            let px = wrap(x0 + dx, width);
            let py = wrap(y0 + dy, height);
            let texel = self.image.get_pixel(px, py).0;
            texel.map(|c| c as f32 / 255.0)
        };

        let c00 = fetch(0.0, 0.0);
        let c10 = fetch(1.0, 0.0);
        let c01 = fetch(0.0, 1.0);
        let c11 = fetch(1.0, 1.0);

        let mut out = [0.0; 4];
        for (i, slot) in out.iter_mut().enumerate() {
            let top = c00[i] + ((c10[i] - c00[i]) * tx);
            let bottom = c01[i] + ((c11[i] - c01[i]) * tx);
            *slot = top + ((bottom - top) * ty);
        }
        out
    }
}

impl Default for Channel {
    fn default() -> Self {
        Self::solid([255, 255, 255, 255])
    }
}

fn wrap(coord: f32, size: u32) -> u32 {
    (coord as i64).rem_euclid(size as i64) as u32
}
