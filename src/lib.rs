// makechr Library
// Converts pixel art into NES background palettes

// Public modules
pub mod block;
pub mod color;
pub mod config;
pub mod engine;
pub mod image;
pub mod palette;
pub mod view;

// Re-export main types for convenience
pub use block::{collect_errors, collect_needs, ColorNeeds, CollectError, BLOCK_SIZE};
pub use color::{ColorClassifier, ColorIndex, BLACK};
pub use config::{ConfigError, MakechrConfig};
pub use engine::{make_palette, ColorSet, EngineError, PaletteEngine};
pub use image::{load_png, save_png, ImageError, RgbImage};
pub use palette::{parse_palette, Palette, PaletteError, MAX_PALETTES, PALETTE_SIZE};
pub use view::{
    render_colorization_view, render_error_view, render_grid_view, render_palette_view,
    save_palette_view,
};
