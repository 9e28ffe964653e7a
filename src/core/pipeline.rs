use std::io::Write;

use anyhow::{Context, Result};
use image::RgbImage;
use tempfile::NamedTempFile;
use tracing::{info, warn};

use crate::decoder::sample_frames;
use crate::renderer::{encode_png, stylize_thumbnail};

use super::captioner::{caption_frames, CaptionModel};
use super::config::StudioConfig;

/// Fixed download names offered by the hosting layer.
pub const THUMBNAIL_FILENAME: &str = "thumbnail.png";
pub const CAPTIONS_FILENAME: &str = "captions.txt";

/// Headline copy used when no caption is available to seed it.
pub const DEFAULT_TITLE: &str = "Magnetic headline";
pub const DEFAULT_SUBTITLE: &str = "Quick context to drive clicks";

/// Uploaded bytes, as handed over by the hosting layer. Video bytes are
/// spooled to a temp file for the decoder; image bytes are decoded in place.
pub enum MediaInput {
    Video(Vec<u8>),
    Image(Vec<u8>),
}

pub struct StudioRequest {
    pub media: MediaInput,
    pub config: StudioConfig,
    /// Which sampled frame becomes the thumbnail base. Clamped to the
    /// sampled range.
    pub hero_frame: usize,
    /// Headline override; `None` falls back to the first caption.
    pub title: Option<String>,
    /// Support line override; `None` falls back to the second caption. An
    /// explicit empty string draws no subtitle.
    pub subtitle: Option<String>,
}

pub struct StudioOutput {
    pub frames: Vec<RgbImage>,
    pub captions: Vec<String>,
    pub thumbnail: Option<Vec<u8>>,
}

impl StudioOutput {
    fn empty() -> Self {
        Self {
            frames: Vec::new(),
            captions: Vec::new(),
            thumbnail: None,
        }
    }

    /// Zero sampled frames. A reportable condition, not a failure.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// One caption per line, ready to write out as UTF-8.
    pub fn captions_text(&self) -> String {
        self.captions.join("\n")
    }
}

/// One full synchronous pass: decode, sample, caption, compose.
///
/// This is the whole tool behind a single entry point, decoupled from
/// whatever UI triggers it. Caption backend failures propagate unmodified;
/// an unreadable or empty source degrades to an empty output instead.
pub fn run_studio(request: &StudioRequest, model: &mut dyn CaptionModel) -> Result<StudioOutput> {
    request.config.validate()?;

    let frames = match &request.media {
        MediaInput::Video(bytes) => sample_video_bytes(bytes, request.config.frame_interval as f64)?,
        MediaInput::Image(bytes) => decode_image_bytes(bytes),
    };

    if frames.is_empty() {
        return Ok(StudioOutput::empty());
    }

    let captions = caption_frames(model, &frames, request.config.caption_count)?;
    let (title, subtitle) = resolve_copy(request, &captions);

    let hero_index = request.hero_frame.min(frames.len() - 1);
    let hero = &frames[hero_index];
    info!(
        "Composing {}x{} thumbnail from frame {}",
        hero.width(),
        hero.height(),
        hero_index
    );

    let styled = stylize_thumbnail(
        hero,
        &title,
        &subtitle,
        request.config.palette.colors(),
        request.config.overlay_opacity,
    );
    let thumbnail = encode_png(&styled)?;

    Ok(StudioOutput {
        frames,
        captions,
        thumbnail: Some(thumbnail),
    })
}

fn sample_video_bytes(bytes: &[u8], interval_secs: f64) -> Result<Vec<RgbImage>> {
    let mut staging = NamedTempFile::new().context("Failed to create staging file")?;
    staging
        .write_all(bytes)
        .context("Failed to spool video bytes")?;

    let path = staging
        .path()
        .to_str()
        .context("Staging path is not valid UTF-8")?;
    sample_frames(path, interval_secs)
}

fn decode_image_bytes(bytes: &[u8]) -> Vec<RgbImage> {
    match image::load_from_memory(bytes) {
        Ok(decoded) => vec![decoded.to_rgb8()],
        Err(err) => {
            // Same degradation as an unreadable video
            warn!("Could not decode image upload: {}", err);
            Vec::new()
        }
    }
}

fn resolve_copy(request: &StudioRequest, captions: &[String]) -> (String, String) {
    let title = request
        .title
        .clone()
        .or_else(|| captions.first().cloned())
        .unwrap_or_else(|| DEFAULT_TITLE.to_string());
    let subtitle = request
        .subtitle
        .clone()
        .or_else(|| captions.get(1).cloned())
        .unwrap_or_else(|| DEFAULT_SUBTITLE.to_string());
    (title, subtitle)
}
