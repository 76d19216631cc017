//! Cook-Torrance direct lighting from three fixed point lights plus an analytic sky.

use std::f32::consts::PI;

use crate::march::soft_shadow;
use crate::material::ShadedSurface;
use crate::math::{mix_vec, reflect, Vec3};
use crate::scene::SceneField;

const DENOMINATOR_FLOOR: f32 = 1e-4;
const SHADOW_BIAS: f32 = 0.01;
const SHADOW_MIN_T: f32 = 0.02;
const SHADOW_HARDNESS: f32 = 16.0;
const SKY_DIFFUSE_SCALE: f32 = 0.15;

const SKY_HORIZON: Vec3 = Vec3::new(0.32, 0.36, 0.45);
const SKY_ZENITH: Vec3 = Vec3::new(0.05, 0.08, 0.16);
const SUN_DIRECTION: Vec3 = Vec3::new(0.5698, 0.6838, 0.4558);
const SUN_COLOR: Vec3 = Vec3::new(2.5, 2.125, 1.5);
const RIM_DIRECTION: Vec3 = Vec3::new(-0.6007, 0.3004, -0.7409);
const RIM_COLOR: Vec3 = Vec3::new(0.42, 0.6, 1.2);

#[derive(Clone, Copy, Debug)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Vec3,
    pub intensity: f32,
    pub casts_shadow: bool,
}

/// Key, fill and rim lights. Only the key light is shadow-tested.
pub const LIGHTS: [PointLight; 3] = [
    PointLight {
        position: Vec3::new(4.0, 6.0, 3.0),
        color: Vec3::new(1.0, 0.92, 0.8),
        intensity: 60.0,
        casts_shadow: true,
    },
    PointLight {
        position: Vec3::new(-5.0, 3.0, -2.0),
        color: Vec3::new(0.45, 0.55, 1.0),
        intensity: 25.0,
        casts_shadow: false,
    },
    PointLight {
        position: Vec3::new(0.0, 4.0, -6.0),
        color: Vec3::new(1.0, 0.55, 0.35),
        intensity: 20.0,
        casts_shadow: false,
    },
];

/// Horizon-to-zenith gradient with a sun lobe and a cool rim lobe.
pub fn sky(direction: Vec3) -> Vec3 {
    let d = direction.normalize();
    let base = mix_vec(SKY_HORIZON, SKY_ZENITH, d.y.max(0.0).sqrt());
    let sun = SUN_COLOR * d.dot(SUN_DIRECTION).max(0.0).powf(48.0);
    let rim = RIM_COLOR * d.dot(RIM_DIRECTION).max(0.0).powf(24.0);
    base + sun + rim
}

pub fn distribution_ggx(n_dot_h: f32, roughness: f32) -> f32 {
    let a = roughness * roughness;
    let a2 = a * a;
    let d = (n_dot_h * n_dot_h * (a2 - 1.0)) + 1.0;
    a2 / (PI * d * d).max(DENOMINATOR_FLOOR)
}

fn geometry_schlick_ggx(n_dot_x: f32, roughness: f32) -> f32 {
    let r = roughness + 1.0;
    let k = (r * r) / 8.0;
    n_dot_x / ((n_dot_x * (1.0 - k)) + k).max(DENOMINATOR_FLOOR)
}

pub fn geometry_smith(n_dot_v: f32, n_dot_l: f32, roughness: f32) -> f32 {
    geometry_schlick_ggx(n_dot_v, roughness) * geometry_schlick_ggx(n_dot_l, roughness)
}

pub fn fresnel_schlick(cos_theta: f32, f0: Vec3) -> Vec3 {
    let falloff = (1.0 - cos_theta).clamp(0.0, 1.0).powi(5);
    f0 + ((Vec3::ONE - f0) * falloff)
}

pub fn base_reflectance(albedo: Vec3, metallic: f32) -> Vec3 {
    mix_vec(Vec3::splat(0.04), albedo, metallic)
}

/// Outgoing radiance toward `view` (unit, pointing at the eye) from a shaded surface point.
pub fn shade(field: &SceneField, position: Vec3, view: Vec3, surface: &ShadedSurface) -> Vec3 {
    let material = surface.material;
    let n = surface.normal;
    let n_dot_v = n.dot(view).max(DENOMINATOR_FLOOR);
    let f0 = base_reflectance(material.albedo, material.metallic);

    let mut radiance_out = Vec3::ZERO;
    for light in &LIGHTS {
        let to_light = light.position - position;
        let distance = to_light.length();
        let l = to_light / distance.max(DENOMINATOR_FLOOR);
        let n_dot_l = n.dot(l);
        if n_dot_l <= 0.0 {
            continue;
        }

        let shadow = if light.casts_shadow {
            soft_shadow(
                field,
                position + (n * SHADOW_BIAS),
                l,
                SHADOW_MIN_T,
                distance,
                SHADOW_HARDNESS,
            )
        } else {
            1.0
        };
        if shadow <= 0.0 {
            continue;
        }

        let h = (view + l).normalize();
        let d = distribution_ggx(n.dot(h).max(0.0), material.roughness);
        let g = geometry_smith(n_dot_v, n_dot_l, material.roughness);
        let f = fresnel_schlick(h.dot(view).max(0.0), f0);
        let specular = f * (d * g / (4.0 * n_dot_v * n_dot_l).max(DENOMINATOR_FLOOR));
        let diffuse = (Vec3::ONE - f) * (1.0 - material.metallic) * material.albedo / PI;

        let radiance =
            light.color * (light.intensity / (distance * distance).max(DENOMINATOR_FLOOR));
        radiance_out += (diffuse + specular) * radiance * (n_dot_l * shadow);
    }

    let f_ambient = fresnel_schlick(n_dot_v, f0);
    let irradiance = sky(n) * SKY_DIFFUSE_SCALE;
    let ambient_diffuse =
        (Vec3::ONE - f_ambient) * (1.0 - material.metallic) * material.albedo * irradiance;
    let ambient_specular =
        sky(reflect(-view, n)) * f_ambient * (1.0 - material.roughness);
    let ambient = (ambient_diffuse + ambient_specular) * material.ao;

    radiance_out + ambient + surface.emission
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::material::Material;
    use crate::params::FrameParams;

    #[test]
    fn fresnel_hits_f0_head_on_and_one_at_grazing() {
        let f0 = Vec3::new(0.9, 0.6, 0.3);
        assert_eq!(fresnel_schlick(1.0, f0), f0);
        let grazing = fresnel_schlick(0.0, f0);
        assert!((grazing.x - 1.0).abs() < 1e-6 && (grazing.z - 1.0).abs() < 1e-6);
    }

    #[test]
    fn ggx_peaks_at_aligned_half_vector() {
        for roughness in [0.2, 0.5, 0.9] {
            let peak = distribution_ggx(1.0, roughness);
            assert!(peak > distribution_ggx(0.8, roughness));
            assert!(peak.is_finite() && peak > 0.0);
        }
        assert!(distribution_ggx(1.0, 0.0).is_finite());
    }

    #[test]
    fn smith_term_is_a_visibility_fraction() {
        for n_dot in [0.05, 0.3, 0.7, 1.0] {
            let g = geometry_smith(n_dot, n_dot, 0.5);
            assert!((0.0..=1.0).contains(&g), "g {g}");
        }
    }

    #[test]
    fn sky_brightens_toward_the_sun() {
        let toward = sky(SUN_DIRECTION);
        let away = sky(-SUN_DIRECTION);
        assert!(toward.x > away.x);
        assert!(sky(Vec3::Y).is_finite());
    }

    #[test]
    fn lit_floor_is_finite_and_non_negative() {
        let field = SceneField::new(&FrameParams::default());
        let surface = ShadedSurface {
            material: Material {
                albedo: Vec3::splat(0.5),
                roughness: 0.4,
                metallic: 0.0,
                ao: 1.0,
            },
            normal: Vec3::Y,
            emission: Vec3::ZERO,
        };
        let color = shade(
            &field,
            Vec3::new(6.0, -2.2, 6.0),
            Vec3::new(0.0, 1.0, 1.0).normalize(),
            &surface,
        );
        assert!(color.is_finite());
        assert!(color.x > 0.0 && color.y > 0.0 && color.z > 0.0);
    }

    #[test]
    fn pure_metal_has_no_diffuse_ambient() {
        let field = SceneField::new(&FrameParams::default());
        let surface = ShadedSurface {
            material: Material {
                albedo: Vec3::ZERO,
                roughness: 1.0,
                metallic: 1.0,
                ao: 1.0,
            },
            // Facing straight down, away from every light.
            normal: Vec3::new(0.0, -1.0, 0.0),
            emission: Vec3::ZERO,
        };
        let color = shade(
            &field,
            Vec3::new(0.0, -20.0, 0.0),
            Vec3::new(0.0, -1.0, 0.0),
            &surface,
        );
        assert_eq!(color, Vec3::ZERO);
    }
}
