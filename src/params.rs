//! Per-frame parameter block shared between the host and the kernel.
//!
//! The field order, offsets and 16-byte alignment of vector fields are the wire contract with
//! GPU hosts, so the struct is `#[repr(C)]` and made of `f32` lanes only.

use crate::math::Vec3;

/// Bytes of meaningful data in the block.
pub const PARAM_BLOCK_SIZE: usize = 144;
/// Size hosts usually allocate for the uniform buffer.
pub const PARAM_BLOCK_ALLOCATION: usize = 512;

#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct FrameParams {
    pub resolution: [f32; 2],
    pub time: f32,
    pub dt: f32,
    /// xyz position, w unused.
    pub camera_pos: [f32; 4],
    /// x, y, click (0 or 1), scroll.
    pub mouse: [f32; 4],
    pub anim_speed: f32,
    /// Fold tuning; also the base roughness of the fractal.
    pub detail: f32,
    pub vignette: f32,
    pub metallic: f32,
    pub base_color: [f32; 4],
    pub grain_strength: f32,
    pub light_azimuth: f32,
    pub light_elevation: f32,
    pub is_rendering: f32,
    pub aberration_strength: f32,
    pub electric_speed: f32,
    pub electric_intensity: f32,
    pub _padding0: f32,
    pub electric_color: [f32; 4],
    /// volume, bass, mid, high.
    pub audio: [f32; 4],
}

impl Default for FrameParams {
    fn default() -> Self {
        Self {
            resolution: [800.0, 600.0],
            time: 0.0,
            dt: 1.0 / 60.0,
            camera_pos: [0.0, 1.35, 3.96, 0.0],
            mouse: [0.0; 4],
            anim_speed: 0.3,
            detail: 0.5,
            vignette: 0.25,
            metallic: 0.8,
            base_color: [0.75, 0.55, 0.35, 1.0],
            grain_strength: 0.03,
            light_azimuth: 0.8,
            light_elevation: 0.6,
            is_rendering: 0.0,
            aberration_strength: 0.0,
            electric_speed: 1.0,
            electric_intensity: 1.0,
            _padding0: 0.0,
            electric_color: [0.35, 0.6, 1.0, 1.0],
            audio: [0.0; 4],
        }
    }
}

impl FrameParams {
    /// Decodes a block from a host buffer. Buffers longer than the block are accepted.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, String> {
        if bytes.len() < PARAM_BLOCK_SIZE {
            return Err(format!(
                "parameter block needs at least {PARAM_BLOCK_SIZE} bytes, got {}",
                bytes.len()
            ));
        }
        Ok(bytemuck::pod_read_unaligned(&bytes[..PARAM_BLOCK_SIZE]))
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::bytes_of(self)
    }

    pub fn to_padded_block(&self) -> [u8; PARAM_BLOCK_ALLOCATION] {
        let mut block = [0u8; PARAM_BLOCK_ALLOCATION];
        block[..PARAM_BLOCK_SIZE].copy_from_slice(self.as_bytes());
        block
    }

    pub fn high_quality(&self) -> bool {
        self.is_rendering > 0.5
    }

    pub fn camera(&self) -> Vec3 {
        Vec3::new(self.camera_pos[0], self.camera_pos[1], self.camera_pos[2])
    }

    pub fn base_color(&self) -> Vec3 {
        Vec3::new(self.base_color[0], self.base_color[1], self.base_color[2]).clamp01()
    }

    pub fn electric_color(&self) -> Vec3 {
        Vec3::new(
            self.electric_color[0],
            self.electric_color[1],
            self.electric_color[2],
        )
    }

    pub fn roughness(&self) -> f32 {
        self.detail.clamp(0.0, 1.0)
    }

    pub fn metallic_clamped(&self) -> f32 {
        self.metallic.clamp(0.0, 1.0)
    }

    pub fn bass(&self) -> f32 {
        self.audio[1]
    }

    pub fn aspect(&self) -> f32 {
        self.resolution[0] / self.resolution[1]
    }
}
