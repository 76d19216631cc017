//! Volumetric electric arcs hugging the fractal surface.
//!
//! A second, fixed-step march along the camera ray samples a ridged noise field and lights up
//! the thin shells where it crosses a fixed iso-band. Work is gated on proximity to the fractal
//! so empty space costs one distance evaluation per step.

use crate::math::{mix_vec, smoothstep, Ray, Vec3};
use crate::noise::{hash3, ridged_arc_noise, value_noise3};
use crate::params::FrameParams;
use crate::scene::SceneField;

const ARC_STEPS: u32 = 35;
const ARC_STEP: f32 = 0.15;
const ARC_START: f32 = 0.5;
const ARC_DITHER: f32 = 0.2;
const ARC_MAX_DISTANCE: f32 = 15.0;
const ARC_GATE: f32 = 0.4;
const ARC_NOISE_SCALE: f32 = 3.5;
const ARC_BAND: f32 = 0.4;
const ARC_GAIN: f32 = 0.002;

/// Brightness of the arc filaments at `p`; peaks where the ridged field crosses the band.
pub fn filament_intensity(p: Vec3, arc_time: f32) -> f32 {
    let n = ridged_arc_noise(p * ARC_NOISE_SCALE, arc_time);
    let band = (n - ARC_BAND).abs();
    0.0003 / ((band * band * band) + 1e-6)
}

#[derive(Clone, Copy, Debug)]
pub struct ArcField {
    time: f32,
    arc_time: f32,
    color: Vec3,
    intensity: f32,
}

impl ArcField {
    pub fn new(params: &FrameParams) -> Self {
        Self {
            time: params.time,
            arc_time: params.time * params.electric_speed * 2.0,
            color: params.electric_color(),
            intensity: params.electric_intensity,
        }
    }

    /// Emissive color gathered along `ray` up to the primary hit distance.
    pub fn accumulate(&self, field: &SceneField, ray: Ray, primary_t: f32) -> Vec3 {
        let mut glow = Vec3::ZERO;
        if self.intensity == 0.0 {
            return glow;
        }

        let dither = hash3(ray.direction * self.time) * ARC_DITHER;
        let max_t = primary_t.min(ARC_MAX_DISTANCE);
        let mut t = ARC_START + dither;

        for _ in 0..ARC_STEPS {
            if t > max_t {
                break;
            }

            let p = ray.at(t);
            let d = field.fractal_distance(p);
            if d < ARC_GATE {
                let intensity = filament_intensity(p, self.arc_time);
                let branch = smoothstep(0.35, 0.55, self.branch_noise(p));
                let surface_fade = 1.0 - smoothstep(0.0, 0.3, d);
                let heat = smoothstep(5.0, 60.0, intensity);
                let color = mix_vec(self.color, Vec3::ONE, heat);
                glow += color * (intensity * surface_fade * branch * self.intensity * ARC_GAIN);
            }

            t += ARC_STEP;
        }

        glow
    }

    /// Low-frequency mask that breaks filaments into separate branches.
    fn branch_noise(&self, p: Vec3) -> f32 {
        value_noise3((p * 1.7) + Vec3::new(0.0, self.arc_time * 0.5, self.arc_time * 0.25))
    }
}
