// Block module - per-block color need collection
//
// The screen is split into 16x16 pixel blocks. Every block may use one
// hardware palette, so the colors it contains are collected here and handed
// to the palette engine as a manifest in row-major block order.

mod needs;

pub use needs::{ColorNeeds, MAX_BLOCK_COLORS};

use crate::color::ColorClassifier;
use crate::image::RgbImage;

/// Width and height of a palette block in pixels
pub const BLOCK_SIZE: u32 = 16;

/// Errors raised while collecting block color needs
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CollectError {
    /// A pixel does not match any hardware color
    ColorNotAllowed {
        pixel: [u8; 3],
        block_y: u32,
        block_x: u32,
        y: u32,
        x: u32,
    },

    /// A block uses more than four colors
    TooManyColors { block_y: u32, block_x: u32 },
}

impl std::fmt::Display for CollectError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CollectError::ColorNotAllowed {
                pixel,
                block_y,
                block_x,
                y,
                x,
            } => write!(
                f,
                "Color not allowed: {:02x}{:02x}{:02x} @ block ({}y,{}x) and pixel ({}y,{}x)",
                pixel[0], pixel[1], pixel[2], block_y, block_x, y, x
            ),
            CollectError::TooManyColors { block_y, block_x } => {
                write!(f, "Too many colors @ block ({}y,{}x)", block_y, block_x)
            }
        }
    }
}

impl std::error::Error for CollectError {}

impl CollectError {
    /// Block the error was raised for, as (block_y, block_x)
    pub fn block(&self) -> (u32, u32) {
        match *self {
            CollectError::ColorNotAllowed {
                block_y, block_x, ..
            }
            | CollectError::TooManyColors { block_y, block_x } => (block_y, block_x),
        }
    }
}

/// Number of blocks across and down needed to cover an image
pub fn block_dimensions(image: &RgbImage) -> (u32, u32) {
    (
        image.width().div_ceil(BLOCK_SIZE),
        image.height().div_ceil(BLOCK_SIZE),
    )
}

/// Collect the color needs of a single block
///
/// Pixels that fall outside the image are skipped.
///
/// # Arguments
///
/// * `image` - The full pixel art image
/// * `block_y` - Block row
/// * `block_x` - Block column
/// * `classifier` - Classifier for pixel colors
pub fn collect_block(
    image: &RgbImage,
    block_y: u32,
    block_x: u32,
    classifier: &mut ColorClassifier,
) -> Result<ColorNeeds, CollectError> {
    let mut needs = ColorNeeds::new();
    for y in 0..BLOCK_SIZE {
        for x in 0..BLOCK_SIZE {
            let Some(pixel) = image.get(block_x * BLOCK_SIZE + x, block_y * BLOCK_SIZE + y) else {
                continue;
            };
            let color = classifier
                .classify(pixel)
                .ok_or(CollectError::ColorNotAllowed {
                    pixel,
                    block_y,
                    block_x,
                    y,
                    x,
                })?;
            if !needs.add(color) {
                return Err(CollectError::TooManyColors { block_y, block_x });
            }
        }
    }
    Ok(needs)
}

/// Collect the color-need manifest for an image
///
/// # Returns
///
/// One need set per block, row-major, or the first error encountered
pub fn collect_needs(
    image: &RgbImage,
    classifier: &mut ColorClassifier,
) -> Result<Vec<ColorNeeds>, CollectError> {
    let (blocks_x, blocks_y) = block_dimensions(image);
    let mut manifest = Vec::with_capacity((blocks_x * blocks_y) as usize);
    for block_y in 0..blocks_y {
        for block_x in 0..blocks_x {
            manifest.push(collect_block(image, block_y, block_x, classifier)?);
        }
    }
    log::debug!(
        "Collected color needs for {}x{} blocks",
        blocks_x,
        blocks_y
    );
    Ok(manifest)
}

/// Validate every block of an image
///
/// Unlike [`collect_needs`] this does not stop at the first failure.
///
/// # Returns
///
/// The first error of each failing block, row-major
pub fn collect_errors(image: &RgbImage, classifier: &mut ColorClassifier) -> Vec<CollectError> {
    let (blocks_x, blocks_y) = block_dimensions(image);
    let mut errors = Vec::new();
    for block_y in 0..blocks_y {
        for block_x in 0..blocks_x {
            if let Err(e) = collect_block(image, block_y, block_x, classifier) {
                errors.push(e);
            }
        }
    }
    log::debug!("{} blocks failed validation", errors.len());
    errors
}
