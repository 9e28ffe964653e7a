use ab_glyph::{FontVec, PxScale};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{Rgba, RgbaImage};
use imageproc::drawing::draw_text_mut;
use tracing::debug;

/// Candidate paths for the preferred family, tried in order.
const BOLD_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

const REGULAR_CANDIDATES: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/dejavu/DejaVuSans.ttf",
    "/usr/share/fonts/TTF/DejaVuSans.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Regular.ttf",
    "/System/Library/Fonts/Supplemental/Arial.ttf",
    "C:\\Windows\\Fonts\\arial.ttf",
];

enum FontFace {
    Vector(FontVec),
    /// Built-in 8x8 bitmap face. Drawn at its native size; the requested
    /// pixel size is ignored in this path, an accepted lossy fallback.
    Bitmap,
}

/// A headline face plus the size it was requested at. The requested size is
/// kept even for the bitmap fallback so line spacing stays stable.
pub struct HeadlineFont {
    face: FontFace,
    size: f32,
}

impl HeadlineFont {
    pub fn size(&self) -> f32 {
        self.size
    }

    #[cfg(test)]
    pub fn bitmap(size: f32) -> Self {
        Self {
            face: FontFace::Bitmap,
            size,
        }
    }
}

/// Load the preferred family at the given size, silently falling back to the
/// built-in bitmap face when no candidate file is readable.
pub fn load_font(size: f32, bold: bool) -> HeadlineFont {
    let candidates = if bold { BOLD_CANDIDATES } else { REGULAR_CANDIDATES };

    for path in candidates {
        if let Ok(bytes) = std::fs::read(path) {
            if let Ok(font) = FontVec::try_from_vec(bytes) {
                return HeadlineFont {
                    face: FontFace::Vector(font),
                    size,
                };
            }
        }
    }

    debug!("No TrueType face found, using built-in bitmap font");
    HeadlineFont {
        face: FontFace::Bitmap,
        size,
    }
}

/// Draw one line of text. No wrapping and no clipping: text wider than the
/// canvas runs past the right edge, exactly like the glyphs that do fit.
pub fn draw_line(canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, font: &HeadlineFont, text: &str) {
    match &font.face {
        FontFace::Vector(face) => {
            draw_text_mut(canvas, color, x, y, PxScale::from(font.size), face, text);
        }
        FontFace::Bitmap => draw_bitmap_line(canvas, color, x, y, text),
    }
}

fn draw_bitmap_line(canvas: &mut RgbaImage, color: Rgba<u8>, x: i32, y: i32, text: &str) {
    let (width, height) = canvas.dimensions();
    let mut pen_x = x;

    for ch in text.chars() {
        let glyph = match BASIC_FONTS.get(ch) {
            Some(glyph) => glyph,
            None => {
                pen_x += 8;
                continue;
            }
        };

        for (row, bits) in glyph.iter().copied().enumerate() {
            for col in 0..8u8 {
                if bits & (1u8 << col) == 0 {
                    continue;
                }
                let px = pen_x + col as i32;
                let py = y + row as i32;
                if px >= 0 && py >= 0 && (px as u32) < width && (py as u32) < height {
                    canvas.put_pixel(px as u32, py as u32, color);
                }
            }
        }
        pen_x += 8;
    }
}
