use crate::arc::ArcField;
use crate::lighting::{base_reflectance, fresnel_schlick, shade, sky};
use crate::march::{estimate_normal, ray_march};
use crate::material::MaterialShader;
use crate::math::{mix_vec, reflect, Ray, Vec2, Vec3};
use crate::noise::hash3;
use crate::params::FrameParams;
use crate::scene::{HitResult, SceneField};

pub const CAMERA_TARGET: Vec3 = Vec3::new(0.0, -0.5, 0.0);
const FOCAL_LENGTH: f32 = 1.8;
const MISS_SKY_SCALE: f32 = 0.05;
const FOG_COLOR: Vec3 = Vec3::new(0.015, 0.017, 0.025);
const FOG_DENSITY: f32 = 0.02;
const REFLECTION_BIAS: f32 = 0.02;
const REFLECTION_ROUGHNESS: f32 = 0.5;
const ARC_THRESHOLD: f32 = 0.01;

#[derive(Clone, Copy, Debug)]
pub struct Camera {
    origin: Vec3,
    forward: Vec3,
    right: Vec3,
    up: Vec3,
}

impl Camera {
    pub fn look_at(origin: Vec3, target: Vec3, up: Vec3) -> Self {
        let forward = (target - origin).normalize();
        let right = forward.cross(up).normalize();
        let up = right.cross(forward);
        Self {
            origin,
            forward,
            right,
            up,
        }
    }

    /// Ray through `screen`, where y is up and the shorter axis spans [-1, 1].
    pub fn ray(&self, screen: Vec2) -> Ray {
        let direction =
            ((self.right * screen.x) + (self.up * screen.y) + (self.forward * FOCAL_LENGTH))
                .normalize();
        Ray {
            origin: self.origin,
            direction,
        }
    }
}

/// Linear color of one camera sample together with its primary hit.
#[derive(Clone, Copy, Debug)]
pub struct PrimarySample {
    pub hit: HitResult,
    pub color: Vec3,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Bounce {
    Primary,
    Reflection,
}

/// Per-frame shading pipeline: camera, materials, lighting, reflections, fog and arcs.
#[derive(Clone, Copy, Debug)]
pub struct FrameCompositor {
    field: SceneField,
    materials: MaterialShader,
    arcs: ArcField,
    camera: Camera,
    resolution: Vec2,
    high_quality: bool,
    electric_intensity: f32,
}

impl FrameCompositor {
    pub fn new(params: &FrameParams) -> Self {
        Self {
            field: SceneField::new(params),
            materials: MaterialShader::new(params),
            arcs: ArcField::new(params),
            camera: Camera::look_at(params.camera(), CAMERA_TARGET, Vec3::Y),
            resolution: Vec2::from_array(params.resolution),
            high_quality: params.high_quality(),
            electric_intensity: params.electric_intensity,
        }
    }

    pub fn field(&self) -> &SceneField {
        &self.field
    }

    pub fn sample_count(&self) -> u32 {
        if self.high_quality {
            2
        } else {
            1
        }
    }

    /// Averaged linear color for the pixel at `uv` (origin top-left).
    pub fn render(&self, uv: Vec2) -> Vec3 {
        let count = self.sample_count();
        let mut accumulated = Vec3::ZERO;
        for index in 0..count {
            accumulated += self.sample(uv, self.jitter(uv, index)).color;
        }
        accumulated / count as f32
    }

    /// Sub-pixel offset in pixels; zero when only one sample is taken.
    pub fn jitter(&self, uv: Vec2, index: u32) -> Vec2 {
        if !self.high_quality {
            return Vec2::new(0.0, 0.0);
        }
        let seed = Vec3::new(
            uv.x * self.resolution.x,
            uv.y * self.resolution.y,
            index as f32,
        );
        Vec2::new(
            hash3(seed) - 0.5,
            hash3(seed + Vec3::new(17.3, 5.1, 11.9)) - 0.5,
        )
    }

    pub fn sample(&self, uv: Vec2, jitter: Vec2) -> PrimarySample {
        let ray = self.camera.ray(self.screen(uv, jitter));
        let hit = ray_march(&self.field, ray);

        let mut color = if hit.hit {
            let lit = self.shade_hit(ray, hit, Bounce::Primary);
            let fog = 1.0 - (-FOG_DENSITY * hit.t * hit.t).exp();
            mix_vec(lit, FOG_COLOR, fog)
        } else {
            miss_color(ray.direction)
        };

        if self.electric_intensity > ARC_THRESHOLD {
            color += self.arcs.accumulate(&self.field, ray, hit.t);
        }

        PrimarySample { hit, color }
    }

    fn screen(&self, uv: Vec2, jitter: Vec2) -> Vec2 {
        let px = (uv.x * self.resolution.x) + jitter.x;
        let py = (uv.y * self.resolution.y) + jitter.y;
        Vec2::new(
            ((2.0 * px) - self.resolution.x) / self.resolution.y,
            (self.resolution.y - (2.0 * py)) / self.resolution.y,
        )
    }

    fn shade_hit(&self, ray: Ray, hit: HitResult, bounce: Bounce) -> Vec3 {
        let p = ray.at(hit.t);
        let geometric_normal = estimate_normal(&self.field, p);
        let mut surface = self
            .materials
            .surface(&self.field, hit.material, p, geometric_normal);
        if bounce == Bounce::Reflection {
            surface.material.roughness = REFLECTION_ROUGHNESS;
        }

        let view = -ray.direction;
        let color = shade(&self.field, p, view, &surface);

        let material = surface.material;
        if bounce == Bounce::Reflection || !self.high_quality || material.roughness >= 0.5 {
            return color;
        }

        let direction = reflect(ray.direction, surface.normal).normalize();
        let secondary = Ray {
            origin: p + (geometric_normal * REFLECTION_BIAS),
            direction,
        };
        let bounce_hit = ray_march(&self.field, secondary);
        let reflected = if bounce_hit.hit {
            self.shade_hit(secondary, bounce_hit, Bounce::Reflection)
        } else {
            sky(direction)
        };

        let fresnel = fresnel_schlick(
            surface.normal.dot(view).max(0.0),
            base_reflectance(material.albedo, material.metallic),
        );
        color + ((reflected - color) * (fresnel * (1.0 - material.roughness)))
    }
}

pub fn miss_color(direction: Vec3) -> Vec3 {
    sky(direction) * MISS_SKY_SCALE
}
