// Color classifier - maps image pixels onto hardware color indices
//
// Pixels that exactly match a table entry resolve immediately. Anything else
// is matched to the nearest table entry by Manhattan distance in RGB space,
// and rejected when that distance is larger than the tolerance.

use super::table::{pack_rgb, unpack_rgb, HARDWARE_COLORS};
use super::{ColorIndex, BLACK};
use std::collections::HashMap;

/// Default maximum distance between a pixel and its nearest hardware color
pub const DEFAULT_TOLERANCE: u32 = 64;

/// Nearest-color classifier with a per-instance memoization cache
///
/// The cache lives as long as the classifier, so one classifier should be
/// created per classification run.
#[derive(Debug, Clone)]
pub struct ColorClassifier {
    /// Maximum accepted distance for a non-exact match
    tolerance: u32,

    /// Exact RGB matches (0xRRGGBB -> index)
    exact: HashMap<u32, ColorIndex>,

    /// Results of previous nearest-color lookups
    cache: HashMap<u32, Option<ColorIndex>>,
}

impl ColorClassifier {
    /// Create a classifier with the given tolerance
    pub fn new(tolerance: u32) -> Self {
        let mut exact = HashMap::with_capacity(HARDWARE_COLORS.len());
        for (index, &rgb) in HARDWARE_COLORS.iter().enumerate() {
            exact.entry(rgb).or_insert(index as ColorIndex);
        }
        // Several entries render as black; pure black always means $0F.
        exact.insert(0x000000, BLACK);

        ColorClassifier {
            tolerance,
            exact,
            cache: HashMap::new(),
        }
    }

    /// Get the configured tolerance
    pub fn tolerance(&self) -> u32 {
        self.tolerance
    }

    /// Classify a pixel
    ///
    /// # Arguments
    /// * `pixel` - RGB channels of the pixel
    ///
    /// # Returns
    /// The hardware color index, or `None` if no hardware color lies within
    /// the tolerance
    pub fn classify(&mut self, pixel: [u8; 3]) -> Option<ColorIndex> {
        let key = pack_rgb(pixel);
        if let Some(&index) = self.exact.get(&key) {
            return Some(index);
        }
        if let Some(&cached) = self.cache.get(&key) {
            return cached;
        }

        let (index, distance) = nearest_color(pixel);
        let result = (distance <= self.tolerance).then_some(index);
        self.cache.insert(key, result);
        result
    }
}

impl Default for ColorClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE)
    }
}

/// Find the hardware color closest to a pixel
///
/// Ties resolve to the lowest index.
///
/// # Returns
/// The index and its Manhattan distance from the pixel
fn nearest_color(pixel: [u8; 3]) -> (ColorIndex, u32) {
    let mut found = 0;
    let mut found_distance = u32::MAX;
    for (index, &rgb) in HARDWARE_COLORS.iter().enumerate() {
        let distance = manhattan_distance(pixel, unpack_rgb(rgb));
        if distance < found_distance {
            found = index as ColorIndex;
            found_distance = distance;
        }
    }
    (found, found_distance)
}

#[inline]
fn manhattan_distance(a: [u8; 3], b: [u8; 3]) -> u32 {
    a.iter()
        .zip(b.iter())
        .map(|(&x, &y)| (x as i32 - y as i32).unsigned_abs())
        .sum()
}
