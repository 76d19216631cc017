use crate::math::{Vec2, Vec3};
use crate::noise::hash3;
use crate::params::FrameParams;

const EXPOSURE: f32 = 1.5;
const GAMMA: f32 = 2.2;
/// Keeps the tone curve away from inf/inf.
const TONE_INPUT_LIMIT: f32 = 1.0e4;

/// Vignette, film grain, ACES tone mapping and gamma, in that order.
#[derive(Clone, Copy, Debug)]
pub struct PostProcessor {
    vignette: f32,
    grain_strength: f32,
    resolution: Vec2,
    time: f32,
}

impl PostProcessor {
    pub fn new(params: &FrameParams) -> Self {
        Self {
            vignette: params.vignette,
            grain_strength: params.grain_strength,
            resolution: Vec2::from_array(params.resolution),
            time: params.time,
        }
    }

    pub fn apply(&self, color: Vec3, uv: Vec2) -> Vec3 {
        let vignetted = color * vignette_factor(uv, self.vignette);
        let grained = vignetted + Vec3::splat(self.grain(uv));
        gamma_correct(tone_map(grained)).clamp01()
    }

    fn grain(&self, uv: Vec2) -> f32 {
        let seed = Vec3::new(
            uv.x * self.resolution.x,
            uv.y * self.resolution.y,
            self.time,
        );
        (hash3(seed) - 0.5) * self.grain_strength
    }
}

/// 1 at the frame centre, falling toward the edges; exponent 0 disables it.
pub fn vignette_factor(uv: Vec2, exponent: f32) -> f32 {
    let interior = (16.0 * uv.x * uv.y * (1.0 - uv.x) * (1.0 - uv.y)).max(0.0);
    0.5 + (0.5 * interior.powf(exponent))
}

/// Narkowicz ACES fit applied after a fixed exposure.
pub fn aces(x: f32) -> f32 {
    let exposed = (x.max(0.0) * EXPOSURE).min(TONE_INPUT_LIMIT);
    let numerator = exposed * ((2.51 * exposed) + 0.03);
    let denominator = (exposed * ((2.43 * exposed) + 0.59)) + 0.14;
    (numerator / denominator).clamp(0.0, 1.0)
}

pub fn tone_map(color: Vec3) -> Vec3 {
    Vec3::new(aces(color.x), aces(color.y), aces(color.z))
}

pub fn gamma_correct(color: Vec3) -> Vec3 {
    color.powf(1.0 / GAMMA)
}
