use crate::math::{Rotation, Vec3};
use crate::params::FrameParams;

const FOLD_ITERATIONS: usize = 4;
const FRACTAL_BOX_HALF_EXTENTS: Vec3 = Vec3::new(1.2, 1.2, 4.0);
const FRACTAL_SPHERE_RADIUS: f32 = 2.5;
const FRACTAL_SURFACE_BIAS: f32 = 0.01;
pub const FLOOR_Y: f32 = -2.2;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MaterialId {
    Miss,
    Fractal,
    Floor,
}

#[derive(Clone, Copy, Debug)]
pub struct SdfSample {
    pub distance: f32,
    pub material: MaterialId,
}

#[derive(Clone, Copy, Debug)]
pub struct HitResult {
    pub t: f32,
    pub material: MaterialId,
    pub hit: bool,
}

/// Result of the fold loop before the bounding primitives are applied.
#[derive(Clone, Copy, Debug)]
struct Folded {
    p: Vec3,
    scale: f32,
    #[allow(dead_code)]
    trap: f32,
}

/// Animated KIFS fractal over an infinite floor, frozen for one frame.
#[derive(Clone, Copy, Debug)]
pub struct SceneField {
    time: f32,
    anim_speed: f32,
    spin_y: Rotation,
    tumble: Rotation,
    tumble_axis: Vec3,
    fold_offset: f32,
    warp: f32,
}

impl SceneField {
    pub fn new(params: &FrameParams) -> Self {
        let phase = params.time * params.anim_speed;
        Self {
            time: params.time,
            anim_speed: params.anim_speed,
            spin_y: Rotation::new(phase * 0.5),
            tumble: Rotation::new(phase * 0.3),
            tumble_axis: Vec3::new(1.0, 0.0, 1.0).normalize(),
            fold_offset: 1.2 * ((0.5 * params.detail) + 0.5),
            warp: params.bass() * 0.2,
        }
    }

    /// Nearest surface at `p`, picking the material per sample.
    pub fn sample(&self, p: Vec3) -> SdfSample {
        let fractal = self.fractal_distance(p);
        let floor = p.y - FLOOR_Y;
        if fractal < floor {
            SdfSample {
                distance: fractal,
                material: MaterialId::Fractal,
            }
        } else {
            SdfSample {
                distance: floor,
                material: MaterialId::Floor,
            }
        }
    }

    pub fn distance(&self, p: Vec3) -> f32 {
        self.sample(p).distance
    }

    /// Distance to the fractal alone, ignoring the floor.
    pub fn fractal_distance(&self, p: Vec3) -> f32 {
        let folded = self.fold(p);
        let bounds = sd_box(folded.p, FRACTAL_BOX_HALF_EXTENTS)
            .max(sd_sphere(folded.p, FRACTAL_SPHERE_RADIUS));
        (bounds / folded.scale) - FRACTAL_SURFACE_BIAS
    }

    fn fold(&self, p: Vec3) -> Folded {
        let p = self.spin_y.about_y(p);
        let mut p = self.tumble.about_axis(p, self.tumble_axis);
        let mut scale = 1.0;
        // Orbit trap; the distance does not consume it.
        let mut trap = f32::MAX;

        for i in 0..FOLD_ITERATIONS {
            let a = p.abs();
            let (x, y) = if a.x < a.y { (a.y, a.x) } else { (a.x, a.y) };
            let (x, z) = if x < a.z { (a.z, x) } else { (x, a.z) };
            let (y, z) = if y < z { (z, y) } else { (y, z) };

            p = (Vec3::new(x, y, z) * 2.0) - Vec3::splat(self.fold_offset);
            p.z += self.warp * ((self.time * self.anim_speed) + i as f32).sin();
            scale *= 2.0;
            trap = trap.min(p.length());
        }

        Folded { p, scale, trap }
    }
}

fn sd_box(p: Vec3, half_extents: Vec3) -> f32 {
    let q = p.abs() - half_extents;
    let outside = q.max(Vec3::ZERO);
    outside.length() + q.max_component().min(0.0)
}

fn sd_sphere(p: Vec3, radius: f32) -> f32 {
    p.length() - radius
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_field() -> SceneField {
        SceneField::new(&FrameParams::default())
    }

    fn probe_points() -> impl Iterator<Item = Vec3> {
        (0..32).map(|i| {
            let f = i as f32 * 0.21;
            Vec3::new(f.sin() * 2.0, f.cos() * 1.5, (f * 1.7).sin() * 2.5)
        })
    }

    #[test]
    fn origin_belongs_to_fractal() {
        let sample = default_field().sample(Vec3::ZERO);
        assert_eq!(sample.material, MaterialId::Fractal);
        assert!(sample.distance < 0.0);
    }

    #[test]
    fn far_floor_point_belongs_to_floor() {
        let sample = default_field().sample(Vec3::new(10.0, -2.2, 10.0));
        assert_eq!(sample.material, MaterialId::Floor);
        assert_eq!(sample.distance, 0.0);
    }

    #[test]
    fn tie_break_is_evaluated_per_sample() {
        let field = default_field();
        assert_eq!(
            field.sample(Vec3::new(0.0, 0.5, 0.0)).material,
            MaterialId::Fractal
        );
        assert_eq!(
            field.sample(Vec3::new(0.0, -2.1, 40.0)).material,
            MaterialId::Floor
        );
    }

    #[test]
    fn fold_sorts_and_scales() {
        let field = default_field();
        let folded = field.fold(Vec3::new(0.1, -3.0, 0.5));
        assert_eq!(folded.scale, 16.0);
        assert!(folded.trap <= folded.p.length());
    }

    #[test]
    fn fold_is_symmetric_under_axis_permutation_at_rest() {
        let field = default_field();
        let a = field.fractal_distance(Vec3::new(0.4, -0.9, 1.3));
        let b = field.fractal_distance(Vec3::new(1.3, 0.4, -0.9));
        assert!((a - b).abs() < 1e-6);
    }

    #[test]
    fn bass_warps_the_fold() {
        let quiet = FrameParams {
            time: 1.0,
            ..FrameParams::default()
        };
        let loud = FrameParams {
            audio: [0.0, 1.0, 0.0, 0.0],
            ..quiet
        };
        let (quiet, loud) = (SceneField::new(&quiet), SceneField::new(&loud));
        let changed = probe_points().any(|p| quiet.fractal_distance(p) != loud.fractal_distance(p));
        assert!(changed);
    }

    #[test]
    fn time_rotates_the_fractal() {
        let later = FrameParams {
            time: 5.0,
            ..FrameParams::default()
        };
        let (rest, later) = (default_field(), SceneField::new(&later));
        let changed = probe_points().any(|p| rest.fractal_distance(p) != later.fractal_distance(p));
        assert!(changed);
    }
}
