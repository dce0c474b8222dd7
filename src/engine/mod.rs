// Engine module - palette assignment
//
// Turns the color needs of every block into a legal set of background
// palettes:
//
// 1. Canonicalize and deduplicate the need sets
// 2. Drop sets covered by a larger set
// 3. Set aside sets that already fill a palette, then try every way of
//    merging the rest into the remaining palette slots
// 4. Pick a shared background color for the merged layout
//
// Merge strategies are tried in a fixed order and the first legal one wins.
// No attempt is made to find a "best" layout, so changing the enumeration
// order changes which valid palette comes out.

mod background;
mod color_set;
mod partitions;

pub use background::select_background;
pub use color_set::{canonicalize, deduplicate, minimize, ColorSet};
pub use partitions::{Partition, Partitions};

use crate::block::ColorNeeds;
use crate::color::{ColorIndex, BLACK};
use crate::palette::{Palette, PaletteError, MAX_PALETTES, PALETTE_SIZE};
use std::collections::BTreeSet;

/// Errors that can occur while assigning palettes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineError {
    /// The color sets cannot be packed into the available palettes
    TooManyPalettes {
        /// Sets that already fill a whole palette
        finalized: Vec<ColorSet>,
        /// Sets that could not be merged, if merging was attempted
        remaining: Option<Vec<ColorSet>>,
    },

    /// A single block needs more colors than one palette holds
    SetTooLarge { set: ColorSet, palette_size: usize },

    /// Merge search examined more strategies than allowed
    SearchBudgetExceeded { budget: u64 },

    /// Limits outside what the hardware supports
    InvalidLimits {
        max_palettes: usize,
        palette_size: usize,
    },

    /// The chosen layout could not be turned into a palette
    Palette(PaletteError),
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::TooManyPalettes {
                finalized,
                remaining,
            } => {
                write!(f, "Too many palettes: finalized {}", set_list(finalized))?;
                if let Some(remaining) = remaining {
                    write!(f, ", to merge {}", set_list(remaining))?;
                }
                Ok(())
            }
            EngineError::SetTooLarge { set, palette_size } => write!(
                f,
                "Color set {} does not fit in a palette of {} colors",
                set, palette_size
            ),
            EngineError::SearchBudgetExceeded { budget } => {
                write!(f, "Merge search exceeded budget of {} strategies", budget)
            }
            EngineError::InvalidLimits {
                max_palettes,
                palette_size,
            } => write!(
                f,
                "Invalid limits: {} palettes of {} colors (max {} of {})",
                max_palettes, palette_size, MAX_PALETTES, PALETTE_SIZE
            ),
            EngineError::Palette(e) => write!(f, "Palette error: {}", e),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Palette(e) => Some(e),
            _ => None,
        }
    }
}

impl From<PaletteError> for EngineError {
    fn from(e: PaletteError) -> Self {
        EngineError::Palette(e)
    }
}

fn set_list(sets: &[ColorSet]) -> String {
    if sets.is_empty() {
        return "none".to_string();
    }
    sets.iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Palette assignment engine
///
/// Holds only the limits of the search; every call is independent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteEngine {
    /// Number of palettes available
    max_palettes: usize,

    /// Colors per palette, background included
    palette_size: usize,

    /// Maximum number of merge strategies to examine (None = unlimited)
    search_budget: Option<u64>,
}

impl Default for PaletteEngine {
    fn default() -> Self {
        PaletteEngine {
            max_palettes: MAX_PALETTES,
            palette_size: PALETTE_SIZE,
            search_budget: None,
        }
    }
}

impl PaletteEngine {
    /// Create an engine with the hardware limits
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an engine with tighter limits
    ///
    /// Both limits must be between 1 and the hardware maximum of 4.
    pub fn with_limits(max_palettes: usize, palette_size: usize) -> Result<Self, EngineError> {
        if !(1..=MAX_PALETTES).contains(&max_palettes) || !(1..=PALETTE_SIZE).contains(&palette_size)
        {
            return Err(EngineError::InvalidLimits {
                max_palettes,
                palette_size,
            });
        }
        Ok(PaletteEngine {
            max_palettes,
            palette_size,
            search_budget: None,
        })
    }

    /// Limit how many merge strategies a single search may examine
    pub fn with_search_budget(mut self, budget: Option<u64>) -> Self {
        self.search_budget = budget;
        self
    }

    pub fn max_palettes(&self) -> usize {
        self.max_palettes
    }

    pub fn palette_size(&self) -> usize {
        self.palette_size
    }

    pub fn search_budget(&self) -> Option<u64> {
        self.search_budget
    }

    /// Build a palette for a color-need manifest
    ///
    /// # Arguments
    ///
    /// * `manifest` - One need set per block, in block scan order
    ///
    /// # Returns
    ///
    /// A palette in which every block's needs are a subset of some row
    pub fn make_palette(&self, manifest: &[ColorNeeds]) -> Result<Palette, EngineError> {
        let unique = deduplicate(manifest);
        let minimal = minimize(&unique);
        log::debug!(
            "{} blocks, {} unique color sets, {} after minimizing",
            manifest.len(),
            unique.len(),
            minimal.len()
        );

        let palette = self.find_assignment(&minimal)?;
        log::info!("Selected palette {}", palette);
        Ok(palette)
    }

    /// Pack a minimal color-set collection into palettes
    ///
    /// `minimal` should come from [`minimize`]. Sets already at the palette
    /// size are kept as they are; the rest are merged using the first
    /// partition, in [`Partitions`] order, that fits the remaining slots and
    /// leaves a shared background color.
    pub fn find_assignment(&self, minimal: &[ColorSet]) -> Result<Palette, EngineError> {
        if minimal.is_empty() {
            // Nothing constrains the layout
            let mut palette = Palette::with_background(BLACK);
            palette.add_row(&[BLACK])?;
            return Ok(palette);
        }

        if let Some(set) = minimal.iter().find(|set| set.len() > self.palette_size) {
            return Err(EngineError::SetTooLarge {
                set: set.clone(),
                palette_size: self.palette_size,
            });
        }

        let (finalized, remaining): (Vec<ColorSet>, Vec<ColorSet>) = minimal
            .iter()
            .cloned()
            .partition(|set| set.len() == self.palette_size);
        log::debug!(
            "{} finalized color sets, {} to merge",
            finalized.len(),
            remaining.len()
        );

        let (background, combined) = if remaining.is_empty() {
            self.finalized_only(finalized)?
        } else {
            self.search_merges(&finalized, &remaining)?
        };

        let mut palette = Palette::with_background(background);
        for colors in &combined {
            let row: Vec<ColorIndex> = colors.iter().copied().collect();
            palette.add_row(&row)?;
        }
        Ok(palette)
    }

    /// Layout when every set already fills a palette
    fn finalized_only(
        &self,
        finalized: Vec<ColorSet>,
    ) -> Result<(ColorIndex, Vec<BTreeSet<ColorIndex>>), EngineError> {
        if finalized.len() > self.max_palettes {
            return Err(EngineError::TooManyPalettes {
                finalized,
                remaining: None,
            });
        }
        let combined: Vec<BTreeSet<ColorIndex>> = finalized.iter().map(to_color_tree).collect();
        match select_background(&combined) {
            Some(background) => Ok((background, combined)),
            None => Err(EngineError::TooManyPalettes {
                finalized,
                remaining: None,
            }),
        }
    }

    /// Try merge strategies for `remaining` until one yields a legal layout
    fn search_merges(
        &self,
        finalized: &[ColorSet],
        remaining: &[ColorSet],
    ) -> Result<(ColorIndex, Vec<BTreeSet<ColorIndex>>), EngineError> {
        let available = self.max_palettes.saturating_sub(finalized.len());
        let base: Vec<BTreeSet<ColorIndex>> = finalized.iter().map(to_color_tree).collect();

        let mut examined: u64 = 0;
        for strategy in Partitions::with_max_groups(remaining.len(), available) {
            examined += 1;
            if let Some(budget) = self.search_budget {
                if examined > budget {
                    return Err(EngineError::SearchBudgetExceeded { budget });
                }
            }

            let Some(merged) = merge_color_sets(remaining, &strategy, self.palette_size) else {
                log::trace!("Strategy {:?} overflows a palette", strategy);
                continue;
            };
            let combined: Vec<BTreeSet<ColorIndex>> =
                base.iter().cloned().chain(merged).collect();

            match select_background(&combined) {
                Some(background) => {
                    log::debug!(
                        "Strategy {:?} accepted after {} tries, background {:02x}",
                        strategy,
                        examined,
                        background
                    );
                    return Ok((background, combined));
                }
                None => log::trace!("Strategy {:?} has no shared background", strategy),
            }
        }

        Err(EngineError::TooManyPalettes {
            finalized: finalized.to_vec(),
            remaining: Some(remaining.to_vec()),
        })
    }
}

/// Union the color sets of each group in a merge strategy
///
/// # Returns
///
/// `None` if any group needs more than `palette_size` colors
fn merge_color_sets(
    collection: &[ColorSet],
    strategy: &Partition,
    palette_size: usize,
) -> Option<Vec<BTreeSet<ColorIndex>>> {
    strategy
        .iter()
        .map(|group| {
            let merged: BTreeSet<ColorIndex> = group
                .iter()
                .flat_map(|&i| collection[i].as_slice().iter().copied())
                .collect();
            (merged.len() <= palette_size).then_some(merged)
        })
        .collect()
}

fn to_color_tree(set: &ColorSet) -> BTreeSet<ColorIndex> {
    set.as_slice().iter().copied().collect()
}

/// Build a palette for a manifest using the hardware limits
pub fn make_palette(manifest: &[ColorNeeds]) -> Result<Palette, EngineError> {
    PaletteEngine::new().make_palette(manifest)
}
