use image::{Rgba, RgbaImage};

/// Straight-alpha value for the whole overlay.
pub fn overlay_alpha(opacity: f32) -> u8 {
    (255.0 * opacity).round() as u8
}

/// Build the palette overlay for an image of the given size.
///
/// The whole overlay is filled with `palette[0]`. Remaining colors are
/// painted as horizontal bands of height `max(height / (len + 1), 1)`,
/// anchored towards the bottom: `palette[1]` sits highest, the last color
/// lowest, and one band-height of the base fill stays visible beneath it.
/// The indexing is a fixed visual convention; do not reorder it.
pub fn build_overlay(
    width: u32,
    height: u32,
    palette: &[(u8, u8, u8)],
    opacity: f32,
) -> RgbaImage {
    let alpha = overlay_alpha(opacity);
    let (r, g, b) = palette[0];
    let mut overlay = RgbaImage::from_pixel(width, height, Rgba([r, g, b, alpha]));

    if palette.len() > 1 {
        let band_height = (height / (palette.len() as u32 + 1)).max(1);
        let count = palette.len() as i64;

        for (i, &(r, g, b)) in palette.iter().enumerate().skip(1) {
            let y0 = height as i64 - band_height as i64 * (count - i as i64 + 1);
            let y1 = y0 + band_height as i64;
            for y in y0.max(0)..y1.min(height as i64) {
                for x in 0..width {
                    overlay.put_pixel(x, y as u32, Rgba([r, g, b, alpha]));
                }
            }
        }
    }

    overlay
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alpha_rounds() {
        assert_eq!(overlay_alpha(0.65), 166);
        assert_eq!(overlay_alpha(1.0), 255);
        assert_eq!(overlay_alpha(0.3), 77);
    }

    #[test]
    fn test_single_color_is_uniform_fill() {
        let overlay = build_overlay(40, 30, &[(0, 0, 0)], 0.65);
        let expected = Rgba([0, 0, 0, 166]);
        assert_eq!(*overlay.get_pixel(0, 0), expected);
        assert_eq!(*overlay.get_pixel(39, 29), expected);
        assert_eq!(*overlay.get_pixel(20, 15), expected);
    }

    #[test]
    fn test_three_color_band_layout() {
        // height 100, three colors: band height 100/4 = 25.
        // Rows 25..50 take palette[1], rows 50..75 palette[2], the final
        // 25 rows keep the base fill.
        let palette = [(10, 10, 10), (20, 20, 20), (30, 30, 30)];
        let overlay = build_overlay(8, 100, &palette, 1.0);

        assert_eq!(overlay.get_pixel(0, 10).0, [10, 10, 10, 255]);
        assert_eq!(overlay.get_pixel(0, 30).0, [20, 20, 20, 255]);
        assert_eq!(overlay.get_pixel(0, 60).0, [30, 30, 30, 255]);
        assert_eq!(overlay.get_pixel(0, 90).0, [10, 10, 10, 255]);
    }

    #[test]
    fn test_band_height_floor_is_one_pixel() {
        // Tiny image: 3 / 4 would floor to zero, clamps to 1
        let palette = [(1, 1, 1), (2, 2, 2), (3, 3, 3)];
        let overlay = build_overlay(4, 3, &palette, 1.0);
        assert_eq!(overlay.get_pixel(0, 0).0, [2, 2, 2, 255]);
        assert_eq!(overlay.get_pixel(0, 1).0, [3, 3, 3, 255]);
        assert_eq!(overlay.get_pixel(0, 2).0, [1, 1, 1, 255]);
    }

    #[test]
    fn test_overlay_matches_image_size() {
        let coral = [(255, 94, 98), (255, 138, 101), (255, 198, 114)];
        let overlay = build_overlay(640, 360, &coral, 0.5);
        assert_eq!(overlay.dimensions(), (640, 360));
    }
}
