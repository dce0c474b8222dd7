// Canonical color sets
//
// A need set with its "don't care" slots removed and the remaining colors
// sorted in descending order. The derived ordering is lexicographic over that
// representation, which places every strict superset after its subsets.

use crate::block::ColorNeeds;
use crate::color::ColorIndex;
use std::collections::BTreeSet;

/// A canonical (sorted, descending, duplicate-free) set of colors
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ColorSet(Vec<ColorIndex>);

impl ColorSet {
    /// Canonicalize arbitrary colors
    pub fn from_colors<I: IntoIterator<Item = ColorIndex>>(colors: I) -> Self {
        let unique: BTreeSet<ColorIndex> = colors.into_iter().collect();
        ColorSet(unique.into_iter().rev().collect())
    }

    /// Canonicalize the colors of one block
    pub fn from_needs(needs: &ColorNeeds) -> Self {
        Self::from_colors(needs.colors())
    }

    /// Colors in descending order
    pub fn as_slice(&self) -> &[ColorIndex] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, color: ColorIndex) -> bool {
        self.0.contains(&color)
    }

    /// Whether every color of `self` is also in `other` (equal sets count)
    pub fn is_subset_of(&self, other: &ColorSet) -> bool {
        self.0.iter().all(|c| other.contains(*c))
    }

    /// Identity key: two-digit hex values joined with `-`
    pub fn key(&self) -> String {
        self.0
            .iter()
            .map(|c| format!("{:02x}", c))
            .collect::<Vec<_>>()
            .join("-")
    }
}

impl std::fmt::Display for ColorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}]", self.key())
    }
}

/// Canonicalize a need set
pub fn canonicalize(needs: &ColorNeeds) -> ColorSet {
    ColorSet::from_needs(needs)
}

/// Reduce a manifest to its distinct non-empty color sets, sorted ascending
///
/// The result depends only on which sets occur, not on their order.
pub fn deduplicate(manifest: &[ColorNeeds]) -> Vec<ColorSet> {
    let unique: BTreeSet<ColorSet> = manifest
        .iter()
        .map(canonicalize)
        .filter(|set| !set.is_empty())
        .collect();
    unique.into_iter().collect()
}

/// Drop every set covered by a set later in the sorted collection
///
/// `unique` must be sorted ascending and duplicate-free, as returned by
/// [`deduplicate`]. Supersets always sort after their subsets, so checking
/// later elements only is enough.
pub fn minimize(unique: &[ColorSet]) -> Vec<ColorSet> {
    unique
        .iter()
        .enumerate()
        .filter(|&(i, set)| !unique[i + 1..].iter().any(|later| set.is_subset_of(later)))
        .map(|(_, set)| set.clone())
        .collect()
}
