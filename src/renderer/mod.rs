pub mod composer;
pub mod overlay;
pub mod text;

pub use composer::{encode_png, stylize_thumbnail};
pub use overlay::build_overlay;
