use serde::{Deserialize, Serialize};

/// Fixed set of brand palettes. Each palette is an ordered list of RGB
/// triples: the first color is the full overlay fill, the rest become the
/// bottom-anchored bands.
#[derive(Copy, Clone, Debug, PartialEq, Eq, clap::ValueEnum, Serialize, Deserialize)]
pub enum PaletteName {
    VibrantCoral,
    CreatorNeon,
    MinimalSlate,
    FreshMint,
}

impl PaletteName {
    pub fn colors(&self) -> &'static [(u8, u8, u8)] {
        match self {
            PaletteName::VibrantCoral => &[(255, 94, 98), (255, 138, 101), (255, 198, 114)],
            PaletteName::CreatorNeon => &[(58, 12, 163), (90, 24, 220), (244, 67, 54)],
            PaletteName::MinimalSlate => &[(26, 26, 36), (64, 64, 80), (92, 92, 112)],
            PaletteName::FreshMint => &[(0, 150, 136), (0, 191, 165), (118, 255, 230)],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            PaletteName::VibrantCoral => "Vibrant coral",
            PaletteName::CreatorNeon => "Creator neon",
            PaletteName::MinimalSlate => "Minimal slate",
            PaletteName::FreshMint => "Fresh mint",
        }
    }

    pub fn all() -> &'static [PaletteName] {
        &[
            PaletteName::VibrantCoral,
            PaletteName::CreatorNeon,
            PaletteName::MinimalSlate,
            PaletteName::FreshMint,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palettes_are_never_empty() {
        for palette in PaletteName::all() {
            assert!(!palette.colors().is_empty());
        }
    }

    #[test]
    fn test_base_colors() {
        assert_eq!(PaletteName::VibrantCoral.colors()[0], (255, 94, 98));
        assert_eq!(PaletteName::FreshMint.colors()[0], (0, 150, 136));
    }
}
