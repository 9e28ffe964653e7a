use std::sync::{Mutex, OnceLock};

use anyhow::{ensure, Context, Result};
use image::RgbImage;
use kornia_image::{allocator::CpuAllocator, Image, ImageSize};
use kornia_vlm::smolvlm::{utils::SmolVlmConfig, SmolVlm};
use tracing::info;

/// Prompt handed to the model for every frame. One frame in, one sentence out.
const CAPTION_PROMPT: &str = "Describe this image in one short sentence.";

/// Upper bound on generated tokens per caption.
const SAMPLE_LENGTH: usize = 60;

/// Seam in front of the captioning backend. Inference takes `&mut self`
/// because generation updates model-internal caches.
pub trait CaptionModel {
    fn describe(&mut self, frame: &RgbImage) -> Result<String>;
}

/// SmolVLM-backed captioner. Construction downloads/loads the model weights,
/// so it is expensive; use `shared_captioner` to pay that cost once per
/// process.
pub struct SmolVlmCaptioner {
    model: SmolVlm,
}

impl SmolVlmCaptioner {
    pub fn load() -> Result<Self> {
        info!("Loading SmolVLM captioning model (first run may download weights)");
        let model = SmolVlm::new(SmolVlmConfig {
            do_sample: false, // greedy decoding keeps captions deterministic
            seed: 42,
            ..Default::default()
        })
        .context("Failed to initialize the SmolVLM captioning model")?;
        Ok(Self { model })
    }
}

impl CaptionModel for SmolVlmCaptioner {
    fn describe(&mut self, frame: &RgbImage) -> Result<String> {
        let size = ImageSize {
            width: frame.width() as usize,
            height: frame.height() as usize,
        };
        let image = Image::<u8, 3, _>::new(size, frame.as_raw().clone(), CpuAllocator)
            .context("Failed to wrap frame for inference")?;

        let caption = self
            .model
            .inference(CAPTION_PROMPT, Some(image), SAMPLE_LENGTH)
            .context("Caption inference failed")?;

        Ok(caption.trim().to_string())
    }
}

static CAPTIONER: OnceLock<Mutex<SmolVlmCaptioner>> = OnceLock::new();

/// Process-wide captioner handle, loaded on first use and reused for every
/// request afterwards. There is no teardown; the process exit reclaims it.
pub fn shared_captioner() -> Result<&'static Mutex<SmolVlmCaptioner>> {
    if let Some(captioner) = CAPTIONER.get() {
        return Ok(captioner);
    }
    let loaded = SmolVlmCaptioner::load()?;
    Ok(CAPTIONER.get_or_init(|| Mutex::new(loaded)))
}

/// Caption the first `limit` frames, in order. Frames past the limit are
/// never sent to the model. Backend failures propagate unmodified.
pub fn caption_frames(
    model: &mut dyn CaptionModel,
    frames: &[RgbImage],
    limit: usize,
) -> Result<Vec<String>> {
    ensure!(limit > 0, "caption limit must be positive");

    let mut captions = Vec::with_capacity(limit.min(frames.len()));
    for frame in frames.iter().take(limit) {
        captions.push(model.describe(frame)?);
    }
    Ok(captions)
}
