mod core;
mod decoder;
mod renderer;
mod ui;
mod utils;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use crate::core::captioner::{shared_captioner, CaptionModel};
use crate::core::config::StudioConfig;
use crate::core::palette::PaletteName;
use crate::core::pipeline::{
    run_studio, MediaInput, StudioOutput, StudioRequest, CAPTIONS_FILENAME, THUMBNAIL_FILENAME,
};

#[derive(Parser)]
#[command(author, version, about = "Creator-grade thumbnail & copy studio", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sample a video, caption frames, export thumbnail + captions
    Generate {
        #[arg(short, long)]
        input: String,
        #[arg(short, long, default_value = ".")]
        output_dir: String,
        #[arg(short, long, value_enum, default_value_t = PaletteName::VibrantCoral)]
        palette: PaletteName,
        #[arg(long, default_value_t = 0.65, value_parser = parse_opacity, help = "Overlay strength, 0.3 to 0.9")]
        opacity: f32,
        #[arg(long, default_value_t = 2, value_parser = clap::value_parser!(u32).range(1..=10), help = "Frame extraction interval in seconds")]
        interval: u32,
        #[arg(long, default_value_t = 3, value_parser = clap::value_parser!(u8).range(1..=5), help = "How many frames to caption")]
        captions: u8,
        #[arg(long, default_value_t = 0, help = "Index of the sampled frame used as thumbnail base")]
        hero: usize,
        #[arg(long, help = "Headline override (defaults to the first caption)")]
        title: Option<String>,
        #[arg(long, help = "Support line override (defaults to the second caption)")]
        subtitle: Option<String>,
    },
    /// Style a single still image instead of a video
    Image {
        #[arg(short, long)]
        input: String,
        #[arg(short, long, default_value = ".")]
        output_dir: String,
        #[arg(short, long, value_enum, default_value_t = PaletteName::VibrantCoral)]
        palette: PaletteName,
        #[arg(long, default_value_t = 0.65, value_parser = parse_opacity)]
        opacity: f32,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        subtitle: Option<String>,
    },
    /// Write a small synthetic demo clip for testing
    SampleVideo {
        #[arg(short, long)]
        output: String,
        #[arg(long, default_value_t = 10)]
        fps: i32,
        #[arg(long, default_value_t = 3)]
        duration: i32,
    },
    /// Interactive mode (menu)
    Interactive {
        #[arg(short, long, default_value = ".", help = "Directory scanned for video files")]
        dir: String,
        #[arg(short, long, default_value = ".")]
        output_dir: String,
    },
}

fn parse_opacity(s: &str) -> Result<f32, String> {
    let value: f32 = s.parse().map_err(|_| format!("`{}` is not a number", s))?;
    if (0.3..=0.9).contains(&value) {
        Ok(value)
    } else {
        Err("overlay strength must be between 0.3 and 0.9".to_string())
    }
}

fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Generate {
            input,
            output_dir,
            palette,
            opacity,
            interval,
            captions,
            hero,
            title,
            subtitle,
        } => {
            let config = StudioConfig {
                palette,
                overlay_opacity: opacity,
                frame_interval: interval,
                caption_count: captions as usize,
            };
            generate_from_video(&input, &output_dir, config, hero, title, subtitle)?;
        }
        Commands::Image {
            input,
            output_dir,
            palette,
            opacity,
            title,
            subtitle,
        } => {
            let config = StudioConfig {
                palette,
                overlay_opacity: opacity,
                frame_interval: 1,
                caption_count: 1,
            };
            generate_from_image(&input, &output_dir, config, title, subtitle)?;
        }
        Commands::SampleVideo { output, fps, duration } => {
            utils::sample_video::write_sample_video(&output, fps, duration)?;
            println!("Sample video written to {}", output);
        }
        Commands::Interactive { dir, output_dir } => {
            ui::menu::run_menu(&dir, &output_dir)?;
        }
    }

    Ok(())
}

fn generate_from_video(
    input: &str,
    output_dir: &str,
    config: StudioConfig,
    hero: usize,
    title: Option<String>,
    subtitle: Option<String>,
) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("Cannot read {}", input))?;

    println!("Extracting frames...");
    let request = StudioRequest {
        media: MediaInput::Video(bytes),
        config,
        hero_frame: hero,
        title,
        subtitle,
    };
    let output = run_with_shared_model(&request)?;

    if output.is_empty() {
        println!("No frames could be extracted from this video. Please try another file.");
        return Ok(());
    }

    println!("Captured {} frame(s).", output.frames.len());
    for (idx, caption) in output.captions.iter().enumerate() {
        println!("{}. {}", idx + 1, caption);
    }

    write_outputs(output_dir, &output, true)
}

fn generate_from_image(
    input: &str,
    output_dir: &str,
    config: StudioConfig,
    title: Option<String>,
    subtitle: Option<String>,
) -> Result<()> {
    let bytes = fs::read(input).with_context(|| format!("Cannot read {}", input))?;

    let request = StudioRequest {
        media: MediaInput::Image(bytes),
        config,
        hero_frame: 0,
        title,
        // The image flow has no second caption to seed a support line
        subtitle: subtitle.or_else(|| Some(String::new())),
    };
    let output = run_with_shared_model(&request)?;

    if output.is_empty() {
        println!("Could not decode this image. Please try another file.");
        return Ok(());
    }

    if let Some(caption) = output.captions.first() {
        println!("Caption: {}", caption);
    }

    write_outputs(output_dir, &output, false)
}

fn run_with_shared_model(request: &StudioRequest) -> Result<StudioOutput> {
    let captioner = shared_captioner()?;
    let mut model = captioner
        .lock()
        .map_err(|_| anyhow::anyhow!("Captioner lock poisoned"))?;
    run_studio(request, &mut *model as &mut dyn CaptionModel)
}

fn write_outputs(output_dir: &str, output: &StudioOutput, with_captions: bool) -> Result<()> {
    let dir = Path::new(output_dir);
    fs::create_dir_all(dir).with_context(|| format!("Cannot create {}", output_dir))?;

    if let Some(png) = &output.thumbnail {
        let path = dir.join(THUMBNAIL_FILENAME);
        fs::write(&path, png)?;
        println!("Thumbnail saved to {}", path.display());
    }

    if with_captions {
        let path = dir.join(CAPTIONS_FILENAME);
        fs::write(&path, output.captions_text())?;
        println!("Captions saved to {}", path.display());
    }

    Ok(())
}
