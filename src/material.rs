use crate::arc::filament_intensity;
use crate::march::ambient_occlusion;
use crate::math::{mix, mix_vec, Vec2, Vec3};
use crate::noise::{fbm, value_noise3};
use crate::params::FrameParams;
use crate::scene::{MaterialId, SceneField};

const FRACTAL_ACCENT: Vec3 = Vec3::new(0.8, 0.7, 0.5);
const FRACTAL_CREVICE_ROUGHNESS: f32 = 0.8;
const SCRATCH_STRETCH: Vec3 = Vec3::new(1.0, 10.0, 1.0);
const FLOOR_BASE: Vec3 = Vec3::new(0.04, 0.04, 0.045);
const FLOOR_TINT: Vec3 = Vec3::new(0.05, 0.045, 0.04);

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Material {
    pub albedo: Vec3,
    pub roughness: f32,
    pub metallic: f32,
    pub ao: f32,
}

/// Material plus the perturbed shading normal and any self-emission.
#[derive(Clone, Copy, Debug)]
pub struct ShadedSurface {
    pub material: Material,
    pub normal: Vec3,
    pub emission: Vec3,
}

/// Procedural materials for the fractal and the floor.
#[derive(Clone, Copy, Debug)]
pub struct MaterialShader {
    base_color: Vec3,
    roughness: f32,
    metallic: f32,
    arc_time: f32,
    electric_color: Vec3,
    electric_intensity: f32,
}

impl MaterialShader {
    pub fn new(params: &FrameParams) -> Self {
        Self {
            base_color: params.base_color(),
            roughness: params.roughness(),
            metallic: params.metallic_clamped(),
            arc_time: params.time * params.electric_speed * 2.0,
            electric_color: params.electric_color(),
            electric_intensity: params.electric_intensity.max(0.0),
        }
    }

    pub fn surface(
        &self,
        field: &SceneField,
        material: MaterialId,
        p: Vec3,
        normal: Vec3,
    ) -> ShadedSurface {
        match material {
            MaterialId::Fractal => self.fractal(field, p, normal),
            MaterialId::Floor | MaterialId::Miss => self.floor(field, p, normal),
        }
    }

    fn fractal(&self, field: &SceneField, p: Vec3, normal: Vec3) -> ShadedSurface {
        let ao = ambient_occlusion(field, p, normal);
        // Crevices read as concave: more accent tint, rougher, less metal.
        let curvature = 1.0 - ao;

        let scratch = value_noise3(p * SCRATCH_STRETCH * 6.0);
        let roughness =
            mix(self.roughness, FRACTAL_CREVICE_ROUGHNESS, curvature) + ((scratch - 0.5) * 0.15);

        let q = p * 8.0;
        let bump = Vec3::new(
            fbm(q),
            fbm(q + Vec3::new(5.2, 1.3, 2.8)),
            fbm(q + Vec3::new(1.7, 9.2, 4.1)),
        ) - Vec3::splat(0.5);

        ShadedSurface {
            material: Material {
                albedo: mix_vec(self.base_color, FRACTAL_ACCENT, curvature),
                roughness: roughness.clamp(0.0, 1.0),
                metallic: mix(self.metallic, 0.0, curvature).clamp(0.0, 1.0),
                ao,
            },
            normal: (normal + (bump * 0.1)).normalize(),
            emission: Vec3::ZERO,
        }
    }

    fn floor(&self, field: &SceneField, p: Vec3, normal: Vec3) -> ShadedSurface {
        let ao = ambient_occlusion(field, p, normal);
        let grain = fbm(p * 1.5);
        let radial = Vec2::new(p.x, p.z).length();
        let polish = (-0.1 * radial).exp();

        let q = p * 4.0;
        let bump = Vec3::new(
            fbm(q + Vec3::new(3.1, 0.0, 0.0)) - 0.5,
            0.0,
            fbm(q + Vec3::new(0.0, 0.0, 7.7)) - 0.5,
        );

        // Lightning overhead shows up as a faint glow on the polished centre.
        let glow = filament_intensity(p, self.arc_time);
        let emission = self.electric_color
            * (glow * 0.0005 * self.electric_intensity * (-0.35 * radial).exp());

        ShadedSurface {
            material: Material {
                albedo: FLOOR_BASE + (FLOOR_TINT * grain),
                roughness: mix(1.0, 0.3 + (0.3 * grain), polish).clamp(0.0, 1.0),
                metallic: 0.0,
                ao,
            },
            normal: (normal + (bump * 0.15)).normalize(),
            emission,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup(params: FrameParams) -> (SceneField, MaterialShader) {
        (SceneField::new(&params), MaterialShader::new(&params))
    }

    fn assert_unit_ranges(surface: &ShadedSurface) {
        let m = surface.material;
        assert!((0.0..=1.0).contains(&m.roughness), "roughness {}", m.roughness);
        assert!((0.0..=1.0).contains(&m.metallic), "metallic {}", m.metallic);
        assert!((0.0..=1.0).contains(&m.ao), "ao {}", m.ao);
        assert_eq!(m.albedo.clamp01(), m.albedo);
        assert!((surface.normal.length() - 1.0).abs() < 1e-4);
    }

    #[test]
    fn floor_gets_rougher_away_from_centre() {
        let (field, shader) = setup(FrameParams::default());
        let near = shader.surface(&field, MaterialId::Floor, Vec3::new(3.0, -2.2, 0.0), Vec3::Y);
        let far = shader.surface(&field, MaterialId::Floor, Vec3::new(28.0, -2.2, 0.0), Vec3::Y);
        assert!(far.material.roughness > near.material.roughness);
        assert!(far.material.roughness > 0.9);
        assert_eq!(near.material.metallic, 0.0);
        assert_unit_ranges(&near);
        assert_unit_ranges(&far);
    }

    #[test]
    fn floor_emission_follows_electric_intensity() {
        let off = FrameParams {
            electric_intensity: 0.0,
            ..FrameParams::default()
        };
        let (field, shader) = setup(off);
        let surface = shader.surface(&field, MaterialId::Floor, Vec3::new(1.0, -2.2, 1.0), Vec3::Y);
        assert_eq!(surface.emission, Vec3::ZERO);
    }

    #[test]
    fn fractal_material_clamps_out_of_range_inputs() {
        let params = FrameParams {
            detail: 3.0,
            metallic: 2.0,
            base_color: [1.5, -0.2, 0.4, 1.0],
            ..FrameParams::default()
        };
        let (field, shader) = setup(params);
        for i in 0..16 {
            let f = i as f32;
            let p = Vec3::new((f * 0.9).sin(), (f * 0.4).cos(), (f * 1.3).sin());
            let n = p.normalize();
            assert_unit_ranges(&shader.surface(&field, MaterialId::Fractal, p, n));
        }
    }

    #[test]
    fn open_fractal_surface_keeps_parameter_color() {
        let (field, shader) = setup(FrameParams::default());
        // Well outside the fractal: nothing occludes the AO probes.
        let surface = shader.surface(
            &field,
            MaterialId::Fractal,
            Vec3::new(0.0, 6.0, 0.0),
            Vec3::Y,
        );
        let expected = FrameParams::default().base_color();
        assert!((surface.material.albedo - expected).length() < 1e-3);
        assert!((surface.material.metallic - 0.8).abs() < 1e-3);
    }
}
