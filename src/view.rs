// Views - diagnostic images
//
// Palette view: each palette row as a strip of 8x8 swatches on a gray
// backdrop:
//
//   +----------------------------------------------+
//   |  [bg][c1][c2][c3]  [bg][c1][c2][c3]  ...     |
//   +----------------------------------------------+
//
// Colorization view: every 16x16 block drawn with the row it was assigned,
// background filling the block and the other colors inset:
//
//   +-------+-------+
//   |  bg   |  c1   |
//   +-------+-------+
//   |  c2   |  c3   |
//   +-------+-------+
//
// Grid and error views: the upscaled image with the 8x8 tile grid and the
// 16x16 block grid drawn over it; the error view also outlines failing
// blocks.

use crate::block::{block_dimensions, CollectError, ColorNeeds, BLOCK_SIZE};
use crate::color::color_to_channels;
use crate::image::{save_png, ImageError, RgbImage};
use crate::palette::{Palette, MAX_PALETTES};
use std::path::Path;

/// Backdrop color behind the swatches
pub const BACKDROP_COLOR: [u8; 3] = [64, 64, 64];

/// Tile grid lines
pub const TILE_GRID_COLOR: [u8; 3] = [0x20, 0x80, 0x20];

/// Block grid lines
pub const BLOCK_GRID_COLOR: [u8; 3] = [0x00, 0xF0, 0x00];

/// Inner outline of a failing block
pub const ERROR_GRID_COLOR: [u8; 3] = [0xF0, 0x20, 0x20];

/// Outer outline of a failing block
pub const ERROR_GRID_COLOR2: [u8; 3] = [0xF0, 0x80, 0x80];

/// Fill for blocks that only use the background color
const EMPTY_BLOCK_COLOR: [u8; 3] = [0, 0, 0];

/// Swatch edge length in unscaled pixels
const SWATCH: u32 = 8;

/// Horizontal distance between the starts of two rows (4 swatches + gap)
const ROW_STRIDE: u32 = SWATCH * 5;

/// Tile edge length in unscaled pixels
const TILE_SIZE: u32 = 8;

/// Render the palette view
///
/// # Arguments
///
/// * `palette` - Palette to draw
/// * `scale` - Integer scale factor (values below 1 are treated as 1)
pub fn render_palette_view(palette: &Palette, scale: u32) -> RgbImage {
    let scale = scale.max(1);
    let width = (ROW_STRIDE * MAX_PALETTES as u32 + SWATCH) * scale;
    let height = SWATCH * 3 * scale;
    let mut image = RgbImage::new(width, height, BACKDROP_COLOR);

    for (n, row) in palette.rows().enumerate() {
        let left = n as u32 * ROW_STRIDE + SWATCH;
        for (k, &color) in row.iter().enumerate() {
            image.fill_rect(
                (left + k as u32 * SWATCH) * scale,
                SWATCH * scale,
                SWATCH * scale,
                SWATCH * scale,
                color_to_channels(color),
            );
        }
    }
    image
}

/// Render the palette view and save it as a PNG
pub fn save_palette_view(palette: &Palette, scale: u32, path: &Path) -> Result<(), ImageError> {
    let image = render_palette_view(palette, scale);
    save_png(path, &image)?;
    log::debug!("Wrote palette view to {}", path.display());
    Ok(())
}

/// Render the colorization view
///
/// Blocks whose needs are only the background color are drawn black.
///
/// # Arguments
///
/// * `image` - The pixel art the manifest was collected from
/// * `palette` - Palette the blocks were assigned to
/// * `manifest` - Color needs per block, row-major
/// * `assignment` - Row index per block, as returned by [`Palette::assign`]
/// * `scale` - Integer scale factor (values below 1 are treated as 1)
pub fn render_colorization_view(
    image: &RgbImage,
    palette: &Palette,
    manifest: &[ColorNeeds],
    assignment: &[usize],
    scale: u32,
) -> RgbImage {
    let scale = scale.max(1);
    let mut view = RgbImage::new(image.width() * scale, image.height() * scale, BACKDROP_COLOR);
    let (blocks_x, _) = block_dimensions(image);
    if blocks_x == 0 {
        return view;
    }

    let size = BLOCK_SIZE * scale;
    for (block, (needs, &index)) in manifest.iter().zip(assignment).enumerate() {
        let left = (block as u32 % blocks_x) * size;
        let top = (block as u32 / blocks_x) * size;
        let Some(row) = palette.get(index) else {
            continue;
        };

        let background = row[0];
        if needs.colors().all(|color| color == background) {
            view.fill_rect(left, top, size, size, EMPTY_BLOCK_COLOR);
            continue;
        }
        draw_block(&mut view, left, top, size / 2, row);
    }
    view
}

/// Draw one block's palette row as four regions
fn draw_block(view: &mut RgbImage, left: u32, top: u32, half: u32, row: &[u8]) {
    // (x, y, width, height) per color, relative to the block
    let regions = [
        (0, 0, half * 2, half * 2),
        (half, 1, half, half - 1),
        (1, half, half - 1, half),
        (half, half, half, half),
    ];
    for (&(x, y, width, height), &color) in regions.iter().zip(row) {
        view.fill_rect(left + x, top + y, width, height, color_to_channels(color));
    }
}

/// Render the grid view: the upscaled image with tile and block grids
pub fn render_grid_view(image: &RgbImage, scale: u32) -> RgbImage {
    let scale = scale.max(1);
    let mut view = image.scaled(scale);
    draw_grid(&mut view, scale);
    view
}

/// Render the error view: the grid view with every failing block outlined
pub fn render_error_view(image: &RgbImage, errors: &[CollectError], scale: u32) -> RgbImage {
    let scale = scale.max(1);
    let mut view = render_grid_view(image, scale);
    let size = i64::from(BLOCK_SIZE * scale);
    for error in errors {
        let (block_y, block_x) = error.block();
        let left = i64::from(block_x) * size;
        let top = i64::from(block_y) * size;
        draw_outline(&mut view, left, top, size, ERROR_GRID_COLOR);
        draw_outline(&mut view, left - 1, top - 1, size + 2, ERROR_GRID_COLOR2);
    }
    view
}

/// Draw the tile grid, then the block grid over it
fn draw_grid(view: &mut RgbImage, scale: u32) {
    let (width, height) = (view.width(), view.height());
    let tile = TILE_SIZE * scale;
    let block = BLOCK_SIZE * scale;

    for x in (tile..width).step_by(block as usize) {
        view.fill_rect(x, 0, 1, height, TILE_GRID_COLOR);
    }
    for y in (tile..height).step_by(block as usize) {
        view.fill_rect(0, y, width, 1, TILE_GRID_COLOR);
    }
    for x in (block..width).step_by(block as usize) {
        view.fill_rect(x, 0, 1, height, BLOCK_GRID_COLOR);
    }
    for y in (block..height).step_by(block as usize) {
        view.fill_rect(0, y, width, 1, BLOCK_GRID_COLOR);
    }
}

/// Draw a one-pixel square outline spanning `left..=left + size`
fn draw_outline(view: &mut RgbImage, left: i64, top: i64, size: i64, color: [u8; 3]) {
    let (right, bottom) = (left + size, top + size);
    fill_span(view, left, top, right, top, color);
    fill_span(view, left, bottom, right, bottom, color);
    fill_span(view, left, top, left, bottom, color);
    fill_span(view, right, top, right, bottom, color);
}

/// Fill the inclusive rectangle (x0, y0)..=(x1, y1), clipped to the view
fn fill_span(view: &mut RgbImage, x0: i64, y0: i64, x1: i64, y1: i64, color: [u8; 3]) {
    let (x0, y0) = (x0.max(0), y0.max(0));
    if x1 < x0 || y1 < y0 {
        return;
    }
    let clip = |v: i64| u32::try_from(v).unwrap_or(u32::MAX);
    view.fill_rect(
        clip(x0),
        clip(y0),
        clip(x1 - x0 + 1),
        clip(y1 - y0 + 1),
        color,
    );
}
