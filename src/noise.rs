//! Stateless hash and lattice noise used by the materials and the arc field.

use crate::math::{fract, mix, Vec3};

const FBM_OCTAVES: usize = 4;
const FBM_LACUNARITY: f32 = 2.02;
const ARC_OCTAVES: usize = 3;
const ARC_LACUNARITY: f32 = 2.1;
const ARC_LATTICE_OFFSET: Vec3 = Vec3::new(1.618, 2.718, 3.142);

/// Pseudo-random scalar in `[0, 1)` from fractional parts and a dot-product mix.
pub fn hash3(p: Vec3) -> f32 {
    let mut q = (p * 0.1031).fract();
    q = q + Vec3::splat(q.dot(q.yzx() + Vec3::splat(33.33)));
    fract((q.x + q.y) * q.z)
}

/// Trilinear value noise over the integer lattice, smoothed with `3t^2 - 2t^3`.
pub fn value_noise3(p: Vec3) -> f32 {
    let i = p.floor();
    let f = p - i;
    let u = f * f * (Vec3::splat(3.0) - (f * 2.0));

    let corner = |x: f32, y: f32, z: f32| hash3(i + Vec3::new(x, y, z));

    let x00 = mix(corner(0.0, 0.0, 0.0), corner(1.0, 0.0, 0.0), u.x);
    let x10 = mix(corner(0.0, 1.0, 0.0), corner(1.0, 1.0, 0.0), u.x);
    let x01 = mix(corner(0.0, 0.0, 1.0), corner(1.0, 0.0, 1.0), u.x);
    let x11 = mix(corner(0.0, 1.0, 1.0), corner(1.0, 1.0, 1.0), u.x);

    mix(mix(x00, x10, u.y), mix(x01, x11, u.y), u.z)
}

pub fn fbm(p: Vec3) -> f32 {
    let mut value = 0.0;
    let mut amplitude = 0.5;
    let mut q = p;
    for _ in 0..FBM_OCTAVES {
        value += amplitude * value_noise3(q);
        q = q * FBM_LACUNARITY;
        amplitude *= 0.5;
    }
    value
}

/// Ridged noise whose octaves each drift along their own trigonometric path, so the
/// ridges writhe in place instead of scrolling in one direction.
pub fn ridged_arc_noise(p: Vec3, t: f32) -> f32 {
    let mut sum = 0.0;
    let mut amplitude = 1.0;
    let mut q = p;
    for octave in 0..ARC_OCTAVES {
        let n = value_noise3(q + octave_drift(octave, t));
        sum += amplitude * (n - 0.5).abs();
        q = (q * ARC_LACUNARITY) + ARC_LATTICE_OFFSET;
        amplitude *= 0.5;
    }
    1.0 - (1.5 * sum)
}

fn octave_drift(octave: usize, t: f32) -> Vec3 {
    match octave {
        0 => Vec3::new((t * 0.7).sin(), (t * 0.9).cos(), (t * 0.5 + 1.3).sin()) * 0.6,
        1 => {
            Vec3::new(
                (t * 1.3 + 0.4).cos(),
                (t * 1.1 + 2.1).sin(),
                (t * 1.7 + 0.9).cos(),
            ) * 0.4
        }
        _ => {
            Vec3::new(
                (t * 2.3 + 3.7).sin(),
                (t * 1.9 + 1.1).cos(),
                (t * 2.9 + 0.2).sin(),
            ) * 0.3
        }
    }
}
