// NES Color Table - RGB values artists draw with
//
// The NES has a master palette of 64 colors (indexed 0x00-0x3F). The high
// nibble selects brightness and the low nibble selects hue.
//
// Column $D holds the "problematic" blacks and $E-$F are unused entries that
// render as black. $1D is stored as 0x000001 so it never collides with a
// pure black pixel in an image.

use super::ColorIndex;

/// Hardware color table in RGB format (64 colors)
///
/// Each color is represented as a 32-bit value: 0xRRGGBB
pub const HARDWARE_COLORS: [u32; 64] = [
    // $00-$0F
    0x7C7C7C, 0x0000FC, 0x0000BC, 0x4428BC, 0x940084, 0xA80020, 0xA81000, 0x881400,
    0x503000, 0x007800, 0x006800, 0x005800, 0x004058, 0x000000, 0x000000, 0x000000,
    // $10-$1F
    0xBCBCBC, 0x0078F8, 0x0058F8, 0x6844FC, 0xD800CC, 0xE40058, 0xF83800, 0xE45C10,
    0xAC7C00, 0x00B800, 0x00A800, 0x00A844, 0x008888, 0x000001, 0x000000, 0x000000,
    // $20-$2F
    0xF8F8F8, 0x3CBCFC, 0x6888FC, 0x9878F8, 0xF878F8, 0xF85898, 0xF87858, 0xFCA044,
    0xF8B800, 0xB8F818, 0x58D854, 0x58F898, 0x00E8D8, 0x787878, 0x000000, 0x000000,
    // $30-$3F
    0xFCFCFC, 0xA4E4FC, 0xB8B8F8, 0xD8B8F8, 0xF8B8F8, 0xF8A4C0, 0xF0D0B0, 0xFCE0A8,
    0xF8D878, 0xD8F878, 0xB8F8B8, 0xB8F8D8, 0x00FCFC, 0xF8D8F8, 0x000000, 0x000000,
];

/// Convert a hardware color index to RGB color
///
/// # Arguments
/// * `index` - Color index (0x00-0x3F)
///
/// # Returns
/// 32-bit RGB color value (0xRRGGBB)
#[inline]
pub fn color_to_rgb(index: ColorIndex) -> u32 {
    HARDWARE_COLORS[(index & 0x3F) as usize]
}

/// Split a packed 0xRRGGBB value into its channels
#[inline]
pub fn unpack_rgb(rgb: u32) -> [u8; 3] {
    [
        ((rgb >> 16) & 0xFF) as u8, // Red
        ((rgb >> 8) & 0xFF) as u8,  // Green
        (rgb & 0xFF) as u8,         // Blue
    ]
}

/// Pack RGB channels into a 0xRRGGBB value
#[inline]
pub fn pack_rgb(pixel: [u8; 3]) -> u32 {
    ((pixel[0] as u32) << 16) | ((pixel[1] as u32) << 8) | pixel[2] as u32
}

/// Convert a hardware color index directly to RGB bytes
#[inline]
pub fn color_to_channels(index: ColorIndex) -> [u8; 3] {
    unpack_rgb(color_to_rgb(index))
}
