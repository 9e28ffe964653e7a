use anyhow::{bail, Context, Result};
use opencv::{core, imgproc, prelude::*, videoio};

const WIDTH: i32 = 640;
const HEIGHT: i32 = 360;

/// Write a small deterministic clip for exercising the sampler: an animated
/// color gradient, a moving white rectangle and a footer text line.
///
/// The codec follows the output extension: `.avi` gets MJPG, anything else
/// mp4v.
pub fn write_sample_video(path: &str, fps: i32, duration_secs: i32) -> Result<()> {
    let fourcc = if path.to_lowercase().ends_with(".avi") {
        videoio::VideoWriter::fourcc('M', 'J', 'P', 'G')?
    } else {
        videoio::VideoWriter::fourcc('m', 'p', '4', 'v')?
    };

    let mut writer = videoio::VideoWriter::new(
        path,
        fourcc,
        fps as f64,
        core::Size::new(WIDTH, HEIGHT),
        true,
    )
    .context("Failed to create video writer")?;

    if !writer.is_opened()? {
        bail!("Video writer could not open {}", path);
    }

    let total_frames = fps * duration_secs;
    for frame_idx in 0..total_frames {
        let mut frame = gradient_frame(frame_idx)?;

        // Moving rectangle sweeping left to right
        let rect_width = 140;
        let x_pos = (frame_idx * 12) % (WIDTH + rect_width) - rect_width;
        imgproc::rectangle(
            &mut frame,
            core::Rect::new(x_pos, HEIGHT / 3, rect_width, 80),
            core::Scalar::new(255.0, 255.0, 255.0, 0.0),
            -1,
            imgproc::LINE_8,
            0,
        )?;

        imgproc::put_text(
            &mut frame,
            "Sample video for thumbnail testing",
            core::Point::new(40, HEIGHT - 40),
            imgproc::FONT_HERSHEY_SIMPLEX,
            0.8,
            core::Scalar::new(50.0, 50.0, 50.0, 0.0),
            2,
            imgproc::LINE_AA,
            false,
        )?;

        writer.write(&frame)?;
    }

    writer.release()?;
    Ok(())
}

/// BGR gradient with each channel rolled by a frame-dependent offset, so
/// the colors cycle as the clip plays.
fn gradient_frame(frame_idx: i32) -> Result<Mat> {
    let width = WIDTH as i64;
    let ramp = |x: i64| -> u8 { (x * 255 / (width - 1)) as u8 };
    let rolled = |x: i64, shift: i64| -> u8 { ramp((x - shift).rem_euclid(width)) };

    let g_shift = (frame_idx as i64) * 5;
    let r_shift = (frame_idx as i64) * 10;

    let mut buffer = Vec::with_capacity((WIDTH * HEIGHT * 3) as usize);
    for _y in 0..HEIGHT {
        for x in 0..width {
            buffer.push(ramp(x)); // B
            buffer.push(rolled(x, g_shift)); // G
            buffer.push(rolled(x, r_shift)); // R
        }
    }

    let flat = Mat::from_slice(&buffer)?;
    let frame = flat.reshape(3, HEIGHT)?.try_clone()?;
    Ok(frame)
}
