use anyhow::Result;
use image::RgbImage;
use tracing::{info, warn};

use super::video::VideoSource;

/// Raw frames to skip between two sampled frames.
///
/// An unusable fps (zero, negative, NaN) falls back to 1.0, so the interval
/// is read directly as a frame count.
pub fn frame_step(interval_secs: f64, fps: f64) -> usize {
    let fps = if fps.is_finite() && fps > 0.0 { fps } else { 1.0 };
    (interval_secs * fps).round().max(1.0) as usize
}

/// Decode a video and keep one frame per `interval_secs` of real time.
///
/// Decoding runs strictly forward: raw frame `k * frame_step` becomes output
/// frame `k`. A source that cannot be opened, or that yields no decodable
/// frames, produces an empty vector rather than an error. Calling this twice
/// with the same input and interval gives identical output.
pub fn sample_frames(path: &str, interval_secs: f64) -> Result<Vec<RgbImage>> {
    let mut source = match VideoSource::open(path)? {
        Some(source) => source,
        None => return Ok(Vec::new()),
    };

    let step = frame_step(interval_secs, source.fps());
    let mut frames = Vec::new();
    let mut frame_index: usize = 0;

    loop {
        match source.read_frame() {
            Ok(Some(frame)) => {
                if frame_index % step == 0 {
                    frames.push(frame);
                }
                frame_index += 1;
            }
            Ok(None) => break, // EOF
            Err(err) => {
                // A broken tail is treated like end of stream, not a failure
                warn!("Decode stopped after frame {}: {}", frame_index, err);
                break;
            }
        }
    }

    info!(
        "Sampled {} frame(s) from {} raw frame(s) (step {})",
        frames.len(),
        frame_index,
        step
    );

    Ok(frames)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_step_rounds_to_nearest() {
        // 2s at 10fps keeps every 20th raw frame
        assert_eq!(frame_step(2.0, 10.0), 20);
        assert_eq!(frame_step(1.0, 29.97), 30);
        assert_eq!(frame_step(1.0, 23.6), 24);
    }

    #[test]
    fn test_step_never_zero() {
        assert_eq!(frame_step(0.1, 1.0), 1);
        assert_eq!(frame_step(1.0, 0.3), 1);
    }

    #[test]
    fn test_step_fps_fallback() {
        // Broken metadata: interval becomes a frame count
        assert_eq!(frame_step(3.0, 0.0), 3);
        assert_eq!(frame_step(5.0, f64::NAN), 5);
        assert_eq!(frame_step(2.0, -30.0), 2);
    }

    #[test]
    fn test_unreadable_source_yields_no_frames() {
        let dir = tempfile::tempdir().unwrap();
        let bogus = dir.path().join("not_a_video.mp4");
        std::fs::write(&bogus, b"this is not a container").unwrap();

        let frames = sample_frames(bogus.to_str().unwrap(), 1.0).unwrap();
        assert!(frames.is_empty());
    }

    #[test]
    fn test_missing_file_yields_no_frames() {
        let frames = sample_frames("definitely/does/not/exist.mp4", 1.0).unwrap();
        assert!(frames.is_empty());
    }

    #[test]
    fn test_sampling_counts_on_synthetic_video() {
        // 3 seconds at 10fps = 30 raw frames; interval 2s -> step 20
        // keeps raw indices {0, 20}
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("demo.avi");
        let clip = clip.to_str().unwrap();
        crate::utils::sample_video::write_sample_video(clip, 10, 3).unwrap();

        let frames = sample_frames(clip, 2.0).unwrap();
        assert_eq!(frames.len(), 2);
        assert_eq!(frames[0].dimensions(), (640, 360));

        // Determinism: a second pass over the same input matches exactly
        let again = sample_frames(clip, 2.0).unwrap();
        assert_eq!(frames.len(), again.len());
        for (a, b) in frames.iter().zip(again.iter()) {
            assert_eq!(a.as_raw(), b.as_raw());
        }
    }

    #[test]
    fn test_interval_of_one_keeps_every_tenth_frame() {
        let dir = tempfile::tempdir().unwrap();
        let clip = dir.path().join("demo.avi");
        let clip = clip.to_str().unwrap();
        crate::utils::sample_video::write_sample_video(clip, 10, 3).unwrap();

        // step 10 over 30 raw frames -> indices {0, 10, 20}
        let frames = sample_frames(clip, 1.0).unwrap();
        assert_eq!(frames.len(), 3);
    }
}
