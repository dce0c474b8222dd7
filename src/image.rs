// Image I/O
//
// Loads pixel art from PNG files and writes rendered views back out.
// Everything is normalized to 8-bit RGB.

use std::fs;
use std::io;
use std::path::Path;

/// Errors that can occur while reading or writing images
#[derive(Debug)]
pub enum ImageError {
    /// I/O error
    Io(io::Error),

    /// PNG decoding error
    PngDecoding(png::DecodingError),

    /// PNG encoding error
    PngEncoding(png::EncodingError),

    /// Image layout the loader cannot convert to RGB
    Unsupported(String),
}

impl std::fmt::Display for ImageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImageError::Io(e) => write!(f, "I/O error: {}", e),
            ImageError::PngDecoding(e) => write!(f, "PNG decoding error: {}", e),
            ImageError::PngEncoding(e) => write!(f, "PNG encoding error: {}", e),
            ImageError::Unsupported(msg) => write!(f, "Unsupported image: {}", msg),
        }
    }
}

impl std::error::Error for ImageError {}

impl From<io::Error> for ImageError {
    fn from(e: io::Error) -> Self {
        ImageError::Io(e)
    }
}

impl From<png::DecodingError> for ImageError {
    fn from(e: png::DecodingError) -> Self {
        ImageError::PngDecoding(e)
    }
}

impl From<png::EncodingError> for ImageError {
    fn from(e: png::EncodingError) -> Self {
        ImageError::PngEncoding(e)
    }
}

/// An 8-bit RGB image stored row-major
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbImage {
    width: u32,
    height: u32,
    pixels: Vec<[u8; 3]>,
}

impl RgbImage {
    /// Create an image filled with a single color
    pub fn new(width: u32, height: u32, fill: [u8; 3]) -> Self {
        RgbImage {
            width,
            height,
            pixels: vec![fill; (width as usize) * (height as usize)],
        }
    }

    /// Create an image from row-major pixels
    ///
    /// Returns `None` if the pixel count does not match the dimensions.
    pub fn from_pixels(width: u32, height: u32, pixels: Vec<[u8; 3]>) -> Option<Self> {
        if pixels.len() != (width as usize) * (height as usize) {
            return None;
        }
        Some(RgbImage {
            width,
            height,
            pixels,
        })
    }

    /// Image width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Image height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Get the pixel at (x, y), or `None` outside the image
    #[inline]
    pub fn get(&self, x: u32, y: u32) -> Option<[u8; 3]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[(y as usize) * (self.width as usize) + x as usize])
    }

    /// Fill a rectangle, clipped to the image bounds
    pub fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: [u8; 3]) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for row in y..y_end {
            let start = (row as usize) * (self.width as usize);
            for col in x..x_end {
                self.pixels[start + col as usize] = color;
            }
        }
    }

    /// Nearest-neighbor upscale by an integer factor
    ///
    /// Factors below 1 are treated as 1.
    pub fn scaled(&self, scale: u32) -> RgbImage {
        let scale = scale.max(1);
        let width = self.width * scale;
        let height = self.height * scale;
        let mut pixels = Vec::with_capacity((width as usize) * (height as usize));
        for y in 0..height {
            let start = ((y / scale) as usize) * (self.width as usize);
            for x in 0..width {
                pixels.push(self.pixels[start + (x / scale) as usize]);
            }
        }
        RgbImage {
            width,
            height,
            pixels,
        }
    }

    /// Flatten into RGB888 bytes
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }
}

/// Load a PNG file as an RGB image
///
/// Palette, grayscale and 16-bit images are expanded; alpha is dropped.
///
/// # Arguments
///
/// * `path` - Path to the PNG file
pub fn load_png(path: &Path) -> Result<RgbImage, ImageError> {
    let file = fs::File::open(path)?;
    let mut decoder = png::Decoder::new(io::BufReader::new(file));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

    let mut reader = decoder.read_info()?;
    let buffer_size = reader
        .output_buffer_size()
        .ok_or_else(|| ImageError::Unsupported("image too large".to_string()))?;
    let mut buf = vec![0; buffer_size];
    let info = reader.next_frame(&mut buf)?;
    let data = &buf[..info.buffer_size()];

    if info.bit_depth != png::BitDepth::Eight {
        return Err(ImageError::Unsupported(format!(
            "bit depth {:?}",
            info.bit_depth
        )));
    }

    let pixels: Vec<[u8; 3]> = match info.color_type {
        png::ColorType::Rgb => data.chunks_exact(3).map(|p| [p[0], p[1], p[2]]).collect(),
        png::ColorType::Rgba => data.chunks_exact(4).map(|p| [p[0], p[1], p[2]]).collect(),
        png::ColorType::Grayscale => data.iter().map(|&g| [g, g, g]).collect(),
        png::ColorType::GrayscaleAlpha => data.chunks_exact(2).map(|p| [p[0], p[0], p[0]]).collect(),
        other => {
            return Err(ImageError::Unsupported(format!("color type {:?}", other)));
        }
    };

    RgbImage::from_pixels(info.width, info.height, pixels)
        .ok_or_else(|| ImageError::Unsupported("truncated pixel data".to_string()))
}

/// Save an RGB image as a PNG file
pub fn save_png(path: &Path, image: &RgbImage) -> Result<(), ImageError> {
    let file = fs::File::create(path)?;
    let w = io::BufWriter::new(file);

    let mut encoder = png::Encoder::new(w, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgb);
    encoder.set_depth(png::BitDepth::Eight);

    let mut writer = encoder.write_header()?;
    writer.write_image_data(&image.to_rgb_bytes())?;

    Ok(())
}
