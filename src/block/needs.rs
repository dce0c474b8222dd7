// Color needs of a single block

use crate::color::ColorIndex;

/// Maximum number of distinct colors a block may use
pub const MAX_BLOCK_COLORS: usize = 4;

/// The colors required by one block, in order of first appearance
///
/// Empty slots are "don't care" and never take part in comparisons.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct ColorNeeds([Option<ColorIndex>; MAX_BLOCK_COLORS]);

impl ColorNeeds {
    /// Create an empty need set
    pub fn new() -> Self {
        ColorNeeds([None; MAX_BLOCK_COLORS])
    }

    /// Build a need set from a list of colors
    ///
    /// Duplicates collapse. Returns `None` if more than four distinct colors
    /// are given.
    pub fn from_colors(colors: &[ColorIndex]) -> Option<Self> {
        let mut needs = ColorNeeds::new();
        for &color in colors {
            if !needs.add(color) {
                return None;
            }
        }
        Some(needs)
    }

    /// Record that the block uses `color`
    ///
    /// # Returns
    ///
    /// `false` if the color is new and all four slots are already taken
    pub fn add(&mut self, color: ColorIndex) -> bool {
        for slot in self.0.iter_mut() {
            match slot {
                Some(existing) if *existing == color => return true,
                Some(_) => {}
                None => {
                    *slot = Some(color);
                    return true;
                }
            }
        }
        false
    }

    /// Iterate over the colors that are present
    pub fn colors(&self) -> impl Iterator<Item = ColorIndex> + '_ {
        self.0.iter().flatten().copied()
    }

    /// Number of colors present
    pub fn len(&self) -> usize {
        self.colors().count()
    }

    /// Whether the block needs no colors at all
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(Option::is_none)
    }
}

impl From<[Option<ColorIndex>; MAX_BLOCK_COLORS]> for ColorNeeds {
    fn from(slots: [Option<ColorIndex>; MAX_BLOCK_COLORS]) -> Self {
        ColorNeeds(slots)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_keeps_first_appearance_order() {
        let mut needs = ColorNeeds::new();
        assert!(needs.add(0x30));
        assert!(needs.add(0x0F));
        assert!(needs.add(0x30));
        assert_eq!(needs.colors().collect::<Vec<_>>(), vec![0x30, 0x0F]);
        assert_eq!(needs.len(), 2);
    }

    #[test]
    fn test_add_fifth_color_fails() {
        let mut needs = ColorNeeds::from_colors(&[1, 2, 3, 4]).expect("four colors fit");
        assert!(needs.add(4));
        assert!(!needs.add(5));
        assert!(ColorNeeds::from_colors(&[1, 2, 3, 4, 5]).is_none());
    }

    #[test]
    fn test_empty() {
        assert!(ColorNeeds::new().is_empty());
        assert!(!ColorNeeds::from([None, Some(3), None, None]).is_empty());
    }
}
