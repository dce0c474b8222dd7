// Palette module - finalized background palettes
//
// A palette holds one background color shared by every row and up to four
// rows of up to four colors. Each row starts with the background color.
// Rows are also kept as sets so a block's needs can be matched quickly.

mod codec;

pub use codec::parse_palette;

use crate::block::ColorNeeds;
use crate::color::ColorIndex;
use std::collections::BTreeSet;

/// Maximum number of background palettes the hardware provides
pub const MAX_PALETTES: usize = 4;

/// Number of colors in one hardware palette, background included
pub const PALETTE_SIZE: usize = 4;

/// Errors produced while building, parsing or querying a palette
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// A row does not contain the background color
    Background {
        background: Option<ColorIndex>,
        group: Vec<ColorIndex>,
    },

    /// Malformed palette text
    Parse {
        text: String,
        position: usize,
        message: String,
    },

    /// No row satisfies a block's needs
    NoMatchingRow { needs: Vec<ColorIndex> },

    /// A fifth row was added
    TooManyRows,

    /// A row holds more than four colors
    RowTooLarge { group: Vec<ColorIndex> },
}

impl std::fmt::Display for PaletteError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PaletteError::Background { background, group } => match background {
                Some(bg) => write!(
                    f,
                    "Background color {:02x} missing from palette {}",
                    bg,
                    hex_list(group)
                ),
                None => write!(f, "No background color set for palette {}", hex_list(group)),
            },
            PaletteError::Parse {
                text,
                position,
                message,
            } => write!(
                f,
                "Palette parse error in \"{}\" at position {}: {}",
                text, position, message
            ),
            PaletteError::NoMatchingRow { needs } => {
                write!(f, "No palette row contains colors {}", hex_list(needs))
            }
            PaletteError::TooManyRows => {
                write!(f, "Palette cannot hold more than {} rows", MAX_PALETTES)
            }
            PaletteError::RowTooLarge { group } => write!(
                f,
                "Palette row {} has more than {} colors",
                hex_list(group),
                PALETTE_SIZE
            ),
        }
    }
}

impl std::error::Error for PaletteError {}

fn hex_list(colors: &[ColorIndex]) -> String {
    let values: Vec<String> = colors.iter().map(|c| format!("{:02x}", c)).collect();
    format!("[{}]", values.join(" "))
}

/// A finalized set of background palettes
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    /// Color shared by every row
    background: Option<ColorIndex>,

    /// Rows, background color first
    rows: Vec<Vec<ColorIndex>>,

    /// Same rows as sets, for subset queries
    row_sets: Vec<BTreeSet<ColorIndex>>,
}

impl Palette {
    /// Create an empty palette with no background color
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty palette with the given background color
    pub fn with_background(background: ColorIndex) -> Self {
        Palette {
            background: Some(background),
            ..Self::default()
        }
    }

    /// Background color, if one has been set
    pub fn background(&self) -> Option<ColorIndex> {
        self.background
    }

    /// Set the background color
    ///
    /// Rows already present must contain the new color; they are reordered
    /// so it comes first.
    pub fn set_background(&mut self, background: ColorIndex) -> Result<(), PaletteError> {
        if let Some(row) = self.rows.iter().find(|row| !row.contains(&background)) {
            return Err(PaletteError::Background {
                background: Some(background),
                group: row.clone(),
            });
        }
        self.background = Some(background);
        for row in self.rows.iter_mut() {
            *row = with_background_first(background, row);
        }
        Ok(())
    }

    /// Append a row
    ///
    /// The row must contain the background color. It is stored with the
    /// background first and the remaining colors in their given order.
    /// Repeated colors are stored once.
    pub fn add_row(&mut self, group: &[ColorIndex]) -> Result<(), PaletteError> {
        let background = match self.background {
            Some(bg) if group.contains(&bg) => bg,
            background => {
                return Err(PaletteError::Background {
                    background,
                    group: group.to_vec(),
                })
            }
        };
        if self.rows.len() >= MAX_PALETTES {
            return Err(PaletteError::TooManyRows);
        }

        let row = with_background_first(background, group);
        if row.len() > PALETTE_SIZE {
            return Err(PaletteError::RowTooLarge {
                group: group.to_vec(),
            });
        }
        self.row_sets.push(row.iter().copied().collect());
        self.rows.push(row);
        Ok(())
    }

    /// Find the first row containing every color a block needs
    ///
    /// # Returns
    ///
    /// The row index and the row
    pub fn select(&self, needs: &ColorNeeds) -> Result<(usize, &[ColorIndex]), PaletteError> {
        let want: BTreeSet<ColorIndex> = needs.colors().collect();
        self.row_sets
            .iter()
            .position(|row| want.is_subset(row))
            .map(|i| (i, self.rows[i].as_slice()))
            .ok_or_else(|| PaletteError::NoMatchingRow {
                needs: want.into_iter().collect(),
            })
    }

    /// Palette row index for every block of a manifest
    ///
    /// Fails on the first block whose needs no row satisfies.
    pub fn assign(&self, manifest: &[ColorNeeds]) -> Result<Vec<usize>, PaletteError> {
        manifest
            .iter()
            .map(|needs| self.select(needs).map(|(index, _)| index))
            .collect()
    }

    /// Get a row by index
    pub fn get(&self, index: usize) -> Option<&[ColorIndex]> {
        self.rows.get(index).map(Vec::as_slice)
    }

    /// Iterate over the rows
    pub fn rows(&self) -> impl Iterator<Item = &[ColorIndex]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Background palette RAM image ($3F00-$3F0F)
    ///
    /// Every slot is padded with the background color, and slots without a
    /// row are filled with it entirely.
    pub fn to_bytes(&self) -> [u8; MAX_PALETTES * PALETTE_SIZE] {
        let fill = self.background.unwrap_or(crate::color::BLACK);
        let mut bytes = [fill; MAX_PALETTES * PALETTE_SIZE];
        for (i, row) in self.rows.iter().enumerate() {
            bytes[i * PALETTE_SIZE..i * PALETTE_SIZE + row.len()].copy_from_slice(row);
        }
        bytes
    }
}

/// Reorder a group so the background comes first
///
/// Repeated colors collapse into one entry.
fn with_background_first(background: ColorIndex, group: &[ColorIndex]) -> Vec<ColorIndex> {
    let mut row = vec![background];
    for &color in group {
        if !row.contains(&color) {
            row.push(color);
        }
    }
    row
}

#[cfg(test)]
mod tests {
    use super::*;

    fn needs(colors: &[ColorIndex]) -> ColorNeeds {
        ColorNeeds::from_colors(colors).expect("at most four colors")
    }

    #[test]
    fn test_add_row_moves_background_first() {
        let mut palette = Palette::with_background(0x0F);
        palette.add_row(&[0x30, 0x16, 0x0F]).expect("valid row");
        assert_eq!(palette.get(0), Some(&[0x0F, 0x30, 0x16][..]));
    }

    #[test]
    fn test_add_row_collapses_repeats() {
        let mut palette = Palette::with_background(0x0F);
        palette.add_row(&[0x0F, 0x01, 0x01]).expect("valid row");
        assert_eq!(palette.get(0), Some(&[0x0F, 0x01][..]));
    }

    #[test]
    fn test_add_row_requires_background() {
        let mut palette = Palette::with_background(0x0F);
        let err = palette.add_row(&[0x30, 0x16]).unwrap_err();
        assert_eq!(
            err,
            PaletteError::Background {
                background: Some(0x0F),
                group: vec![0x30, 0x16]
            }
        );

        let mut palette = Palette::new();
        assert!(matches!(
            palette.add_row(&[0x30]),
            Err(PaletteError::Background {
                background: None,
                ..
            })
        ));
    }

    #[test]
    fn test_row_limits() {
        let mut palette = Palette::with_background(0x0F);
        assert!(matches!(
            palette.add_row(&[0x0F, 1, 2, 3, 4]),
            Err(PaletteError::RowTooLarge { .. })
        ));
        for _ in 0..MAX_PALETTES {
            palette.add_row(&[0x0F]).expect("room for row");
        }
        assert_eq!(palette.add_row(&[0x0F]), Err(PaletteError::TooManyRows));
    }

    #[test]
    fn test_set_background_reorders_rows() {
        let mut palette = Palette::with_background(0x01);
        palette.add_row(&[0x01, 0x02, 0x03]).expect("valid row");
        palette.set_background(0x03).expect("row contains 03");
        assert_eq!(palette.get(0), Some(&[0x03, 0x01, 0x02][..]));
        assert!(palette.set_background(0x30).is_err());
        assert_eq!(palette.background(), Some(0x03));
    }

    #[test]
    fn test_select_first_superset() {
        let mut palette = Palette::with_background(0x0F);
        palette.add_row(&[0x0F, 0x01, 0x11]).expect("valid row");
        palette.add_row(&[0x0F, 0x01, 0x16, 0x30]).expect("valid row");

        assert_eq!(palette.select(&needs(&[0x01])).expect("match").0, 0);
        let (index, row) = palette.select(&needs(&[0x30, 0x0F])).expect("match");
        assert_eq!(index, 1);
        assert_eq!(row, &[0x0F, 0x01, 0x16, 0x30]);
        assert_eq!(palette.select(&ColorNeeds::new()).expect("match").0, 0);
    }

    #[test]
    fn test_select_miss() {
        let mut palette = Palette::with_background(0x0F);
        palette.add_row(&[0x0F, 0x01]).expect("valid row");
        assert_eq!(
            palette.select(&needs(&[0x16, 0x01])),
            Err(PaletteError::NoMatchingRow {
                needs: vec![0x01, 0x16]
            })
        );
    }

    #[test]
    fn test_assign_manifest() {
        let mut palette = Palette::with_background(0x0F);
        palette.add_row(&[0x0F, 0x01]).expect("valid row");
        palette.add_row(&[0x0F, 0x16]).expect("valid row");

        let manifest = [needs(&[0x16]), needs(&[0x0F]), needs(&[0x01, 0x0F])];
        assert_eq!(palette.assign(&manifest), Ok(vec![1, 0, 0]));
        assert!(palette.assign(&[needs(&[0x01, 0x16])]).is_err());
    }

    #[test]
    fn test_get_out_of_range() {
        let palette = Palette::with_background(0x0F);
        assert_eq!(palette.get(0), None);
        assert!(palette.is_empty());
    }

    #[test]
    fn test_to_bytes_pads_with_background() {
        let mut palette = Palette::with_background(0x0F);
        palette.add_row(&[0x0F, 0x00, 0x10, 0x30]).expect("valid row");
        palette.add_row(&[0x06, 0x0F]).expect("valid row");
        assert_eq!(
            palette.to_bytes(),
            [
                0x0F, 0x00, 0x10, 0x30, //
                0x0F, 0x06, 0x0F, 0x0F, //
                0x0F, 0x0F, 0x0F, 0x0F, //
                0x0F, 0x0F, 0x0F, 0x0F,
            ]
        );
    }
}
