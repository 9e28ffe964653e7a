use anyhow::{ensure, Result};
use serde::{Deserialize, Serialize};

use super::palette::PaletteName;

/// Style and sampling knobs, one field per control the hosting layer exposes.
///
/// The CLI constrains the ranges at parse time (opacity 0.3..=0.9, interval
/// 1..=10 seconds, captions 1..=5). `validate` re-checks the hard invariants
/// for embedders that build a config by hand.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudioConfig {
    pub palette: PaletteName,
    pub overlay_opacity: f32,
    pub frame_interval: u32,
    pub caption_count: usize,
}

impl Default for StudioConfig {
    fn default() -> Self {
        Self {
            palette: PaletteName::VibrantCoral,
            overlay_opacity: 0.65,
            frame_interval: 2,
            caption_count: 3,
        }
    }
}

impl StudioConfig {
    pub fn validate(&self) -> Result<()> {
        ensure!(self.frame_interval > 0, "frame interval must be positive");
        ensure!(self.caption_count > 0, "caption count must be positive");
        ensure!(
            self.overlay_opacity > 0.0 && self.overlay_opacity <= 1.0,
            "overlay opacity must be within (0, 1], got {}",
            self.overlay_opacity
        );
        Ok(())
    }
}
