// Background color selection

use crate::color::{ColorIndex, BLACK};
use std::collections::BTreeSet;

/// Pick the background color shared by every color set
///
/// Black is preferred whenever every set contains it; otherwise the
/// numerically smallest shared color is used.
///
/// # Returns
///
/// `None` if the sets have no color in common (or there are no sets)
pub fn select_background<'a, I>(color_sets: I) -> Option<ColorIndex>
where
    I: IntoIterator<Item = &'a BTreeSet<ColorIndex>>,
{
    let mut sets = color_sets.into_iter();
    let mut shared = sets.next()?.clone();
    for set in sets {
        shared.retain(|color| set.contains(color));
    }

    if shared.contains(&BLACK) {
        Some(BLACK)
    } else {
        shared.first().copied()
    }
}
