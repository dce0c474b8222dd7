// Palette text format
//
//   palette := "P/" row+
//   row     := hexbyte ("-" hexbyte){0,3} "/"
//   hexbyte := two hexadecimal digits
//
// A value may appear only once per row.
//
// Example: P/0f-00-10-30/0f-06-16-26/

use super::{Palette, PaletteError, MAX_PALETTES, PALETTE_SIZE};
use crate::color::ColorIndex;
use std::fmt;
use std::str::FromStr;

impl fmt::Display for Palette {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "P/")?;
        for row in self.rows() {
            let values: Vec<String> = row.iter().map(|c| format!("{:02x}", c)).collect();
            write!(f, "{}/", values.join("-"))?;
        }
        Ok(())
    }
}

impl FromStr for Palette {
    type Err = PaletteError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        parse_palette(text)
    }
}

/// Parse a palette from its text form
///
/// The first color of the first row becomes the background color.
pub fn parse_palette(text: &str) -> Result<Palette, PaletteError> {
    PaletteParser::new(text).parse()
}

/// Cursor over the palette text
struct PaletteParser<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> PaletteParser<'a> {
    fn new(text: &'a str) -> Self {
        PaletteParser { text, pos: 0 }
    }

    fn parse(mut self) -> Result<Palette, PaletteError> {
        self.expect_literal(b'P')?;
        self.expect_literal(b'/')?;

        let mut palette = Palette::new();
        for n in 0..MAX_PALETTES {
            let Some(first) = self.fetch_hex() else {
                if n == 0 {
                    return Err(self.error("Expected: hex value"));
                }
                break;
            };
            if n == 0 {
                palette.set_background(first)?;
            }

            let mut row = vec![first];
            for _ in 1..PALETTE_SIZE {
                if !self.fetch_literal(b'-') {
                    break;
                }
                let start = self.pos;
                let value = self
                    .fetch_hex()
                    .ok_or_else(|| self.error("Invalid hex value"))?;
                if row.contains(&value) {
                    return Err(self.error_at(start, "Repeated value"));
                }
                row.push(value);
            }
            self.expect_literal(b'/')?;
            palette.add_row(&row)?;
        }

        if self.pos < self.text.len() {
            return Err(self.error("Expected: end of input"));
        }
        Ok(palette)
    }

    fn fetch_literal(&mut self, want: u8) -> bool {
        if self.text.as_bytes().get(self.pos) == Some(&want) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect_literal(&mut self, want: u8) -> Result<(), PaletteError> {
        if self.fetch_literal(want) {
            Ok(())
        } else {
            Err(self.error(&format!("Expected: \"{}\"", want as char)))
        }
    }

    /// Read exactly two hex digits; the cursor only moves on success
    fn fetch_hex(&mut self) -> Option<ColorIndex> {
        let digits = self.text.as_bytes().get(self.pos..self.pos + 2)?;
        if !digits.iter().all(u8::is_ascii_hexdigit) {
            return None;
        }
        let value = std::str::from_utf8(digits)
            .ok()
            .and_then(|s| u8::from_str_radix(s, 16).ok())?;
        self.pos += 2;
        Some(value)
    }

    fn error(&self, message: &str) -> PaletteError {
        self.error_at(self.pos, message)
    }

    fn error_at(&self, position: usize, message: &str) -> PaletteError {
        PaletteError::Parse {
            text: self.text.to_string(),
            position,
            message: message.to_string(),
        }
    }
}
