use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dialoguer::{theme::ColorfulTheme, Input, Select};

use crate::core::captioner::{caption_frames, shared_captioner, CaptionModel};
use crate::core::config::StudioConfig;
use crate::core::palette::PaletteName;
use crate::core::pipeline::{CAPTIONS_FILENAME, DEFAULT_SUBTITLE, DEFAULT_TITLE, THUMBNAIL_FILENAME};
use crate::decoder::sample_frames;
use crate::renderer::{encode_png, stylize_thumbnail};

/// Guided session: pick a video, style it, export thumbnail + captions.
pub fn run_menu(search_dir: &str, output_dir: &str) -> Result<()> {
    let theme = ColorfulTheme::default();

    // 1. Scan for video files
    let mut video_files: Vec<PathBuf> = fs::read_dir(search_dir)
        .with_context(|| format!("Cannot read directory {}", search_dir))?
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            let ext = path
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or("")
                .to_lowercase();
            matches!(ext.as_str(), "mp4" | "mov" | "avi" | "mkv")
        })
        .collect();

    video_files.sort();

    if video_files.is_empty() {
        eprintln!("No video files found in {}", search_dir);
        return Ok(());
    }

    let video_names: Vec<String> = video_files
        .iter()
        .map(|p| p.file_name().unwrap_or_default().to_string_lossy().to_string())
        .collect();

    let selection = Select::with_theme(&theme)
        .with_prompt("Pick a video to style")
        .default(0)
        .items(&video_names)
        .interact()?;
    let video_path = &video_files[selection];

    // 2. Brand style
    let palette_labels: Vec<&str> = PaletteName::all().iter().map(|p| p.label()).collect();
    let palette_choice = Select::with_theme(&theme)
        .with_prompt("Palette")
        .default(0)
        .items(&palette_labels)
        .interact()?;
    let palette = PaletteName::all()[palette_choice];

    let overlay_opacity: f32 = Input::with_theme(&theme)
        .with_prompt("Overlay strength (0.3 - 0.9)")
        .default(0.65)
        .validate_with(|v: &f32| {
            if (0.3..=0.9).contains(v) {
                Ok(())
            } else {
                Err("must be between 0.3 and 0.9")
            }
        })
        .interact_text()?;

    // 3. Frame & caption controls
    let frame_interval: u32 = Input::with_theme(&theme)
        .with_prompt("Frame extraction interval in seconds (1 - 10)")
        .default(2)
        .validate_with(|v: &u32| {
            if (1..=10).contains(v) {
                Ok(())
            } else {
                Err("must be between 1 and 10")
            }
        })
        .interact_text()?;

    let caption_count: usize = Input::with_theme(&theme)
        .with_prompt("Caption how many frames? (1 - 5)")
        .default(3)
        .validate_with(|v: &usize| {
            if (1..=5).contains(v) {
                Ok(())
            } else {
                Err("must be between 1 and 5")
            }
        })
        .interact_text()?;

    let config = StudioConfig {
        palette,
        overlay_opacity,
        frame_interval,
        caption_count,
    };
    config.validate()?;

    // 4. Sample + caption
    println!("Extracting frames...");
    let frames = sample_frames(
        video_path.to_str().context("Video path is not valid UTF-8")?,
        config.frame_interval as f64,
    )?;

    if frames.is_empty() {
        println!("No frames could be extracted from this video. Please try another file.");
        return Ok(());
    }
    println!("Captured {} frame(s). Choose one to style.", frames.len());

    println!("Generating social copy suggestions...");
    let captioner = shared_captioner()?;
    let captions = {
        let mut model = captioner
            .lock()
            .map_err(|_| anyhow::anyhow!("Captioner lock poisoned"))?;
        caption_frames(&mut *model as &mut dyn CaptionModel, &frames, config.caption_count)?
    };

    for (idx, caption) in captions.iter().enumerate() {
        println!("{}. {}", idx + 1, caption);
    }

    // 5. Hero frame + headline copy
    let hero_labels: Vec<String> = (0..frames.len().min(5))
        .map(|i| format!("Frame {}", i))
        .collect();
    let hero_index = Select::with_theme(&theme)
        .with_prompt("Select the hero frame")
        .default(0)
        .items(&hero_labels)
        .interact()?;

    let title: String = Input::with_theme(&theme)
        .with_prompt("Hero headline")
        .default(
            captions
                .first()
                .cloned()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
        )
        .interact_text()?;

    let subtitle: String = Input::with_theme(&theme)
        .with_prompt("Support line")
        .default(
            captions
                .get(1)
                .cloned()
                .unwrap_or_else(|| DEFAULT_SUBTITLE.to_string()),
        )
        .allow_empty(true)
        .interact_text()?;

    // 6. Compose + export
    let styled = stylize_thumbnail(
        &frames[hero_index],
        &title,
        &subtitle,
        config.palette.colors(),
        config.overlay_opacity,
    );
    let png = encode_png(&styled)?;

    let out_dir = Path::new(output_dir);
    fs::create_dir_all(out_dir)?;
    let thumbnail_path = out_dir.join(THUMBNAIL_FILENAME);
    let captions_path = out_dir.join(CAPTIONS_FILENAME);
    fs::write(&thumbnail_path, &png)?;
    fs::write(&captions_path, captions.join("\n"))?;

    println!("Thumbnail saved to {}", thumbnail_path.display());
    println!("Captions saved to {}", captions_path.display());

    Ok(())
}
