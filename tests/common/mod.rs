// Common test utilities for palette assignment tests
//
// Builders for manifests plus a deterministic generator for randomized
// manifests, and a checker for the palette invariants.

#![allow(dead_code)]

use makechr::{ColorIndex, ColorNeeds, Palette, MAX_PALETTES, PALETTE_SIZE};

/// Build a need set from colors
pub fn needs(colors: &[ColorIndex]) -> ColorNeeds {
    ColorNeeds::from_colors(colors).expect("at most four colors per block")
}

/// Build a manifest from lists of colors
pub fn manifest(blocks: &[&[ColorIndex]]) -> Vec<ColorNeeds> {
    blocks.iter().map(|colors| needs(colors)).collect()
}

/// Small deterministic xorshift generator
pub struct TestRng(u64);

impl TestRng {
    pub fn new(seed: u64) -> Self {
        TestRng(seed.max(1))
    }

    pub fn next_u64(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }

    /// Uniform value in 0..bound
    pub fn below(&mut self, bound: u64) -> u64 {
        self.next_u64() % bound
    }
}

/// Random manifest drawing colors from a small pool
///
/// Every block gets between 0 and 4 colors. When `shared` is set, every
/// non-empty block also includes that color.
pub fn random_manifest(
    rng: &mut TestRng,
    blocks: usize,
    pool: &[ColorIndex],
    shared: Option<ColorIndex>,
) -> Vec<ColorNeeds> {
    (0..blocks)
        .map(|_| {
            let mut needs = ColorNeeds::new();
            let count = rng.below(5) as usize;
            if count > 0 {
                if let Some(color) = shared {
                    needs.add(color);
                }
            }
            while needs.len() < count {
                let color = pool[rng.below(pool.len() as u64) as usize];
                needs.add(color);
            }
            needs
        })
        .collect()
}

/// Assert the structural invariants of a palette and that it covers a manifest
pub fn assert_palette_covers(palette: &Palette, manifest: &[ColorNeeds]) {
    let background = palette.background().expect("palette has a background");
    assert!(palette.len() <= MAX_PALETTES, "too many rows in {}", palette);
    for row in palette.rows() {
        assert!(row.len() <= PALETTE_SIZE, "row too large in {}", palette);
        assert_eq!(row[0], background, "background not first in {}", palette);
    }
    for block in manifest {
        let (_, row) = palette
            .select(block)
            .unwrap_or_else(|e| panic!("{} does not cover block: {}", palette, e));
        for color in block.colors() {
            assert!(row.contains(&color));
        }
    }
}
