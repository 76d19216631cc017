//! Sphere tracing and the probes built on repeated field evaluation.

use crate::math::{Ray, Vec3};
use crate::scene::{HitResult, MaterialId, SceneField};

pub const MAX_MARCH_STEPS: u32 = 160;
pub const MAX_TRACE_DISTANCE: f32 = 30.0;
pub const HIT_EPSILON: f32 = 1e-4;
/// Under-relaxation so the march does not skip the thin folded sheets.
const STEP_RELAXATION: f32 = 0.7;
const NORMAL_EPSILON: f32 = HIT_EPSILON;
const SHADOW_STEPS: u32 = 32;
const AO_SAMPLES: u32 = 5;

pub fn ray_march(field: &SceneField, ray: Ray) -> HitResult {
    let mut t = 0.0;
    for _ in 0..MAX_MARCH_STEPS {
        if t > MAX_TRACE_DISTANCE {
            break;
        }

        let sample = field.sample(ray.at(t));
        if sample.distance < HIT_EPSILON {
            return HitResult {
                t,
                material: sample.material,
                hit: true,
            };
        }

        t += sample.distance * STEP_RELAXATION;
    }

    HitResult {
        t: MAX_TRACE_DISTANCE,
        material: MaterialId::Miss,
        hit: false,
    }
}

/// Central-difference gradient of the tie-broken distance.
pub fn estimate_normal(field: &SceneField, p: Vec3) -> Vec3 {
    let e = NORMAL_EPSILON;
    let dx =
        field.distance(p + Vec3::new(e, 0.0, 0.0)) - field.distance(p - Vec3::new(e, 0.0, 0.0));
    let dy =
        field.distance(p + Vec3::new(0.0, e, 0.0)) - field.distance(p - Vec3::new(0.0, e, 0.0));
    let dz =
        field.distance(p + Vec3::new(0.0, 0.0, e)) - field.distance(p - Vec3::new(0.0, 0.0, e));
    Vec3::new(dx, dy, dz).normalize()
}

/// Occlusion from five probes along the normal, darker on downward-facing surfaces.
pub fn ambient_occlusion(field: &SceneField, p: Vec3, normal: Vec3) -> f32 {
    let mut occlusion = 0.0;
    let mut weight = 1.0;

    for i in 0..AO_SAMPLES {
        let height = 0.01 + (0.12 * i as f32 / 4.0);
        let sdf = field.distance(p + (normal * height));
        occlusion += (height - sdf) * weight;
        weight *= 0.95;
    }

    let facing = (0.5 + (0.5 * normal.y)).clamp(0.0, 1.0);
    (1.0 - (3.0 * occlusion)).clamp(0.0, 1.0) * facing
}

/// Penumbra estimate toward a light `max_t` away; `k` sets the hardness.
pub fn soft_shadow(
    field: &SceneField,
    origin: Vec3,
    direction: Vec3,
    min_t: f32,
    max_t: f32,
    k: f32,
) -> f32 {
    let mut res: f32 = 1.0;
    let mut t = min_t;

    for _ in 0..SHADOW_STEPS {
        let h = field.distance(origin + (direction * t));
        res = res.min(k * h / t);
        t += h.clamp(0.002, 0.2);
        if res < 0.001 || t > max_t {
            break;
        }
    }

    res.clamp(0.0, 1.0)
}
