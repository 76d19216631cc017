use serde::Deserialize;
use std::path::Path;

use crate::params::FrameParams;

#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderFrameConfig {
    pub width: u32,
    pub height: u32,
    pub output_path: String,
    #[serde(default)]
    pub time: f32,
    #[serde(default = "default_delta_time")]
    pub delta_time: f32,
    #[serde(default = "default_camera_position")]
    pub camera_position: [f32; 3],
    #[serde(default)]
    pub mouse: [f32; 4],
    #[serde(default)]
    pub high_quality: bool,
    #[serde(default)]
    pub channel_path: Option<String>,
    #[serde(flatten)]
    pub look: LookConfig,
}

/// Artistic parameters; anything omitted keeps the default look.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LookConfig {
    pub anim_speed: f32,
    pub detail: f32,
    pub vignette: f32,
    pub metallic: f32,
    pub base_color: [f32; 3],
    pub grain_strength: f32,
    pub light_azimuth: f32,
    pub light_elevation: f32,
    pub aberration_strength: f32,
    pub electric_speed: f32,
    pub electric_intensity: f32,
    pub electric_color: [f32; 3],
    pub audio: [f32; 4],
}

impl Default for LookConfig {
    fn default() -> Self {
        let params = FrameParams::default();
        Self {
            anim_speed: params.anim_speed,
            detail: params.detail,
            vignette: params.vignette,
            metallic: params.metallic,
            base_color: params.base_color().to_array(),
            grain_strength: params.grain_strength,
            light_azimuth: params.light_azimuth,
            light_elevation: params.light_elevation,
            aberration_strength: params.aberration_strength,
            electric_speed: params.electric_speed,
            electric_intensity: params.electric_intensity,
            electric_color: params.electric_color().to_array(),
            audio: params.audio,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderBatchConfig {
    pub frames: Vec<RenderFrameConfig>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum IncomingConfig {
    Batch(RenderBatchConfig),
    Single(RenderFrameConfig),
}

impl IncomingConfig {
    pub fn into_frames(self) -> Vec<RenderFrameConfig> {
        match self {
            Self::Single(frame) => vec![frame],
            Self::Batch(batch) => batch.frames,
        }
    }
}

fn default_delta_time() -> f32 {
    FrameParams::default().dt
}

fn default_camera_position() -> [f32; 3] {
    FrameParams::default().camera().to_array()
}

pub fn validate_config(config: &RenderFrameConfig) -> Result<(), Box<dyn std::error::Error>> {
    if config.width == 0 || config.height == 0 {
        return Err("width and height must be positive".into());
    }

    let output_parent = Path::new(&config.output_path)
        .parent()
        .ok_or("outputPath must include a parent directory")?;

    if !output_parent.as_os_str().is_empty() && !output_parent.exists() {
        return Err(format!(
            "output directory does not exist: {}",
            output_parent.display()
        )
        .into());
    }

    if !config.time.is_finite() || config.time < 0.0 {
        return Err(format!("time must be finite and >= 0, got {}", config.time).into());
    }

    if !config.delta_time.is_finite() {
        return Err("deltaTime must be finite".into());
    }

    if !all_finite(&config.camera_position) || !all_finite(&config.mouse) {
        return Err("cameraPosition and mouse must contain finite values".into());
    }

    let look = &config.look;
    let scalars = [
        look.anim_speed,
        look.detail,
        look.vignette,
        look.metallic,
        look.grain_strength,
        look.light_azimuth,
        look.light_elevation,
        look.aberration_strength,
        look.electric_speed,
        look.electric_intensity,
    ];
    if !all_finite(&scalars)
        || !all_finite(&look.base_color)
        || !all_finite(&look.electric_color)
        || !all_finite(&look.audio)
    {
        return Err("look parameters must contain finite values".into());
    }

    if let Some(path) = &config.channel_path {
        if !Path::new(path).is_file() {
            return Err(format!("channel image does not exist: {path}").into());
        }
    }

    Ok(())
}

/// Validates a whole batch; an empty frame list is an error.
pub fn validate_frames(frames: &[RenderFrameConfig]) -> Result<(), Box<dyn std::error::Error>> {
    if frames.is_empty() {
        return Err("frames array must not be empty".into());
    }
    for (index, frame) in frames.iter().enumerate() {
        validate_config(frame).map_err(|error| format!("frame {}: {error}", index + 1))?;
    }
    Ok(())
}

pub fn frame_params(config: &RenderFrameConfig) -> FrameParams {
    let look = &config.look;
    let [cx, cy, cz] = config.camera_position;
    let [br, bg, bb] = look.base_color;
    let [er, eg, eb] = look.electric_color;
    FrameParams {
        resolution: [config.width as f32, config.height as f32],
        time: config.time,
        dt: config.delta_time,
        camera_pos: [cx, cy, cz, 0.0],
        mouse: config.mouse,
        anim_speed: look.anim_speed,
        detail: look.detail,
        vignette: look.vignette,
        metallic: look.metallic,
        base_color: [br, bg, bb, 1.0],
        grain_strength: look.grain_strength,
        light_azimuth: look.light_azimuth,
        light_elevation: look.light_elevation,
        is_rendering: if config.high_quality { 1.0 } else { 0.0 },
        aberration_strength: look.aberration_strength,
        electric_speed: look.electric_speed,
        electric_intensity: look.electric_intensity,
        _padding0: 0.0,
        electric_color: [er, eg, eb, 1.0],
        audio: look.audio,
    }
}

fn all_finite(values: &[f32]) -> bool {
    values.iter().all(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(raw: &str) -> Vec<RenderFrameConfig> {
        serde_json::from_str::<IncomingConfig>(raw)
            .expect("config should parse")
            .into_frames()
    }

    #[test]
    fn minimal_frame_uses_default_look() {
        let frames = parse(r#"{ "width": 800, "height": 600, "outputPath": "frame.png" }"#);
        assert_eq!(frames.len(), 1);
        let params = frame_params(&frames[0]);
        assert_eq!(params, FrameParams::default());
        assert!(validate_config(&frames[0]).is_ok());
    }

    #[test]
    fn batch_overrides_look_per_frame() {
        let frames = parse(
            r#"{ "frames": [
                { "width": 64, "height": 32, "outputPath": "a.png", "time": 1.5,
                  "electricIntensity": 0.0, "highQuality": true },
                { "width": 64, "height": 32, "outputPath": "b.png",
                  "baseColor": [0.1, 0.2, 0.3], "audio": [0.5, 0.9, 0.1, 0.0] }
            ] }"#,
        );
        assert_eq!(frames.len(), 2);

        let first = frame_params(&frames[0]);
        assert_eq!(first.time, 1.5);
        assert_eq!(first.electric_intensity, 0.0);
        assert!(first.high_quality());

        let second = frame_params(&frames[1]);
        assert_eq!(second.base_color, [0.1, 0.2, 0.3, 1.0]);
        assert_eq!(second.bass(), 0.9);
        assert!(!second.high_quality());
    }

    #[test]
    fn rejects_zero_resolution() {
        let frames = parse(r#"{ "width": 0, "height": 600, "outputPath": "frame.png" }"#);
        let error = validate_config(&frames[0]).expect_err("zero width must fail");
        assert!(error.to_string().contains("width and height"));
    }

    #[test]
    fn rejects_missing_output_directory() {
        let frames = parse(
            r#"{ "width": 8, "height": 8, "outputPath": "/definitely/not/here/frame.png" }"#,
        );
        let error = validate_config(&frames[0]).expect_err("missing directory must fail");
        assert!(error.to_string().contains("output directory does not exist"));
    }

    #[test]
    fn rejects_empty_batch() {
        let frames = parse(r#"{ "frames": [] }"#);
        let error = validate_frames(&frames).expect_err("empty batch must fail");
        assert!(error.to_string().contains("must not be empty"));
    }

    #[test]
    fn batch_errors_name_the_frame() {
        let frames = parse(
            r#"{ "frames": [
                { "width": 8, "height": 8, "outputPath": "a.png" },
                { "width": 8, "height": 0, "outputPath": "b.png" }
            ] }"#,
        );
        let error = validate_frames(&frames).expect_err("second frame is invalid");
        assert!(error.to_string().starts_with("frame 2:"));
    }

    #[test]
    fn rejects_negative_time() {
        let frames = parse(r#"{ "width": 8, "height": 8, "outputPath": "f.png", "time": -1.0 }"#);
        assert!(validate_config(&frames[0]).is_err());
    }

    #[test]
    fn rejects_missing_channel_image() {
        let frames = parse(
            r#"{ "width": 8, "height": 8, "outputPath": "f.png", "channelPath": "no_such.png" }"#,
        );
        let error = validate_config(&frames[0]).expect_err("missing channel must fail");
        assert!(error.to_string().contains("channel image"));
    }
}
