use std::collections::HashMap;
use std::io::{self, Read};
use std::path::Path;
use std::time::Instant;

use arcfold::channel::Channel;
use arcfold::config::{frame_params, validate_frames, IncomingConfig};
use arcfold::cpu::render_frame;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let mut raw = String::new();
    io::stdin().read_to_string(&mut raw)?;

    let incoming: IncomingConfig = serde_json::from_str(&raw)?;
    let frames = incoming.into_frames();
    validate_frames(&frames)?;

    let total = frames.len();
    let default_channel = Channel::default();
    let mut channel_cache: HashMap<String, Channel> = HashMap::new();

    for (index, frame) in frames.iter().enumerate() {
        let channel = match &frame.channel_path {
            Some(path) => {
                if !channel_cache.contains_key(path) {
                    let loaded = Channel::from_path(Path::new(path))?;
                    let (width, height) = loaded.dimensions();
                    log::debug!("loaded channel '{path}' ({width}x{height})");
                    channel_cache.insert(path.clone(), loaded);
                }
                channel_cache
                    .get(path)
                    .ok_or_else(|| format!("internal error: channel cache miss for '{path}'"))?
            }
            None => &default_channel,
        };

        let params = frame_params(frame);
        log::debug!("frame {} parameters: {params:?}", index + 1);

        let started = Instant::now();
        let image = render_frame(&params, channel);
        let elapsed_ms = started.elapsed().as_millis();
        image.save(&frame.output_path)?;

        log::info!(
            "[{}/{}] Rendered t={:.3}s{} in {} ms: {}",
            index + 1,
            total,
            params.time,
            if params.high_quality() { " [HQ]" } else { "" },
            elapsed_ms,
            frame.output_path
        );
    }

    Ok(())
}
