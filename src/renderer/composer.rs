use std::io::Cursor;

use anyhow::{Context, Result};
use image::{imageops, DynamicImage, RgbImage, Rgba};

use super::overlay::build_overlay;
use super::text::{draw_line, load_font};

const TEXT_PADDING: i32 = 32;

/// Compose a styled thumbnail from a base frame.
///
/// The base is never touched: everything happens on an RGBA working copy
/// that is flattened back to RGB at the end. Output dimensions always equal
/// the input dimensions. Text is drawn on a single line with no wrapping or
/// clipping; a headline wider than the image runs past the edge.
pub fn stylize_thumbnail(
    base: &RgbImage,
    title: &str,
    subtitle: &str,
    palette: &[(u8, u8, u8)],
    opacity: f32,
) -> RgbImage {
    let (width, height) = base.dimensions();

    // 1. RGBA working copy + overlay composite
    let mut composed = DynamicImage::ImageRgb8(base.clone()).to_rgba8();
    let overlay = build_overlay(width, height, palette, opacity);
    imageops::overlay(&mut composed, &overlay, 0, 0);

    // 2. Headline text
    let title_size = (height / 12).max(28) as f32;
    let subtitle_size = (height / 22).max(16) as f32;
    let title_font = load_font(title_size, true);
    let subtitle_font = load_font(subtitle_size, false);

    let title_y = height as i32 - (0.32 * height as f32).round() as i32;
    draw_line(
        &mut composed,
        Rgba([255, 255, 255, 255]),
        TEXT_PADDING,
        title_y,
        &title_font,
        title,
    );

    if !subtitle.is_empty() {
        let subtitle_y = title_y + (1.25 * title_font.size()).round() as i32;
        draw_line(
            &mut composed,
            Rgba([240, 240, 240, 255]),
            TEXT_PADDING,
            subtitle_y,
            &subtitle_font,
            subtitle,
        );
    }

    // 3. Flatten to opaque RGB
    DynamicImage::ImageRgba8(composed).to_rgb8()
}

/// Lossless in-memory PNG, ready for download. No file path is touched.
pub fn encode_png(image: &RgbImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());
    image
        .write_to(&mut buffer, image::ImageOutputFormat::Png)
        .context("Failed to encode thumbnail as PNG")?;
    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CORAL: &[(u8, u8, u8)] = &[(255, 94, 98), (255, 138, 101), (255, 198, 114)];

    fn checker(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            if (x + y) % 2 == 0 {
                image::Rgb([200, 30, 60])
            } else {
                image::Rgb([20, 120, 220])
            }
        })
    }

    #[test]
    fn test_output_keeps_input_dimensions() {
        for (w, h) in [(10, 10), (640, 360), (1000, 1000)] {
            let styled = stylize_thumbnail(&checker(w, h), "Title", "Sub", CORAL, 0.65);
            assert_eq!(styled.dimensions(), (w, h));
        }
    }

    #[test]
    fn test_base_frame_is_not_modified() {
        let base = checker(64, 48);
        let before = base.clone();
        let _ = stylize_thumbnail(&base, "Headline", "Support", CORAL, 0.9);
        assert_eq!(base.as_raw(), before.as_raw());
    }

    #[test]
    fn test_empty_subtitle_matches_no_subtitle_pass() {
        // With no text at all the result must equal a plain
        // overlay-composite pass, and an empty subtitle must not add pixels
        // beyond the title.
        let base = checker(120, 90);

        let mut expected = DynamicImage::ImageRgb8(base.clone()).to_rgba8();
        let overlay = build_overlay(120, 90, CORAL, 0.65);
        imageops::overlay(&mut expected, &overlay, 0, 0);
        let expected = DynamicImage::ImageRgba8(expected).to_rgb8();

        let no_text = stylize_thumbnail(&base, "", "", CORAL, 0.65);
        assert_eq!(no_text.as_raw(), expected.as_raw());

        let with_title = stylize_thumbnail(&base, "Go", "", CORAL, 0.65);
        let with_title_again = stylize_thumbnail(&base, "Go", "", CORAL, 0.65);
        assert_eq!(with_title.as_raw(), with_title_again.as_raw());
    }

    #[test]
    fn test_composition_is_deterministic() {
        let base = checker(200, 112);
        let a = stylize_thumbnail(&base, "Magnetic headline", "hook", CORAL, 0.4);
        let b = stylize_thumbnail(&base, "Magnetic headline", "hook", CORAL, 0.4);
        assert_eq!(a.as_raw(), b.as_raw());
    }

    #[test]
    fn test_png_round_trip_is_lossless() {
        let styled = stylize_thumbnail(&checker(96, 54), "T", "s", CORAL, 0.65);
        let bytes = encode_png(&styled).unwrap();

        let decoded = image::load_from_memory(&bytes).unwrap().to_rgb8();
        assert_eq!(decoded.dimensions(), styled.dimensions());
        assert_eq!(decoded.as_raw(), styled.as_raw());
    }

    #[test]
    fn test_full_opacity_hides_the_base() {
        // alpha 255 means the base contributes nothing outside text
        let styled = stylize_thumbnail(&checker(40, 40), "", "", &[(0, 0, 0)], 1.0);
        assert_eq!(styled.get_pixel(5, 5).0, [0, 0, 0]);
        assert_eq!(styled.get_pixel(35, 35).0, [0, 0, 0]);
    }
}
