use anyhow::{anyhow, Result};
use image::RgbImage;
use opencv::{core, imgproc, prelude::*, videoio};
use tracing::{debug, warn};

/// Forward-only video source backed by an OpenCV capture.
///
/// Frames come out as RGB at the container's native resolution. There is no
/// seeking: each `read_frame` call advances by exactly one raw frame.
pub struct VideoSource {
    capture: videoio::VideoCapture,
    fps: f64,
}

impl VideoSource {
    /// Open a video container. Returns `None` when the file cannot be opened,
    /// which callers treat the same as a stream with zero frames.
    pub fn open(path: &str) -> Result<Option<Self>> {
        // CAP_ANY lets OpenCV choose the best backend for the platform
        let capture = match videoio::VideoCapture::from_file(path, videoio::CAP_ANY) {
            Ok(capture) => capture,
            Err(err) => {
                warn!("OpenCV refused to open {}: {}", path, err);
                return Ok(None);
            }
        };

        if !capture.is_opened()? {
            warn!("Could not open video source: {}", path);
            return Ok(None);
        }

        let fps = capture.get(videoio::CAP_PROP_FPS)?;
        let width = capture.get(videoio::CAP_PROP_FRAME_WIDTH)? as u32;
        let height = capture.get(videoio::CAP_PROP_FRAME_HEIGHT)? as u32;

        debug!("Opened {} ({}x{} @ {:.2} fps)", path, width, height, fps);

        Ok(Some(Self { capture, fps }))
    }

    /// Raw fps as reported by the container. May be 0 or NaN for broken
    /// metadata; the sampler applies the fallback.
    pub fn fps(&self) -> f64 {
        self.fps
    }

    /// Decode the next frame, converted BGR -> RGB. `None` at end of stream.
    pub fn read_frame(&mut self) -> Result<Option<RgbImage>> {
        let mut frame = Mat::default();
        if !self.capture.read(&mut frame)? {
            return Ok(None); // EOF
        }
        if frame.empty() {
            return Ok(None);
        }

        let mut rgb = Mat::default();
        imgproc::cvt_color(
            &frame,
            &mut rgb,
            imgproc::COLOR_BGR2RGB,
            0,
            core::AlgorithmHint::ALGO_HINT_DEFAULT,
        )?;

        if !rgb.is_continuous() {
            return Err(anyhow!("Frame data is not continuous"));
        }

        let width = rgb.cols() as u32;
        let height = rgb.rows() as u32;
        let data = rgb.data_bytes()?.to_vec();

        RgbImage::from_raw(width, height, data)
            .ok_or_else(|| anyhow!("Frame buffer does not match {}x{}", width, height))
            .map(Some)
    }
}
