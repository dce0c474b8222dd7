// Color module - hardware color table and pixel classification

mod classifier;
mod table;

pub use classifier::{ColorClassifier, DEFAULT_TOLERANCE};
pub use table::{color_to_channels, color_to_rgb, pack_rgb, unpack_rgb, HARDWARE_COLORS};

/// Index into the hardware color table (0x00-0x3F)
pub type ColorIndex = u8;

/// Canonical black, preferred as the shared background color
pub const BLACK: ColorIndex = 0x0F;
