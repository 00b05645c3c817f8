//! The colours used to tell categories apart in charts and tables.

use std::{fs, path::Path};

use serde::Deserialize;

use crate::Error;

/// The number of colour slots in a palette.
pub const PALETTE_SIZE: usize = 8;

/// The slot reserved for categories without a usable category ID.
pub const OTHER_SLOT: usize = PALETTE_SIZE - 1;

const DEFAULT_COLORS: [&str; PALETTE_SIZE] = [
    "#3b82f6", // blue
    "#ef4444", // red
    "#10b981", // green
    "#f59e0b", // amber
    "#8b5cf6", // violet
    "#ec4899", // pink
    "#14b8a6", // teal
    "#9ca3af", // grey, other
];

/// An ordered list of eight CSS colours, one per category slot.
///
/// Category IDs start at one, so a category with ID `n` is drawn with the
/// colour in slot `n - 1`. The last slot is the fallback colour.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "Vec<String>")]
pub struct Palette {
    colors: [String; PALETTE_SIZE],
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.map(str::to_owned),
        }
    }
}

impl TryFrom<Vec<String>> for Palette {
    type Error = Error;

    fn try_from(colors: Vec<String>) -> Result<Self, Self::Error> {
        let count = colors.len();
        let colors: [String; PALETTE_SIZE] = colors.try_into().map_err(|_| {
            Error::InvalidPalette(format!("expected {PALETTE_SIZE} colours, got {count}"))
        })?;

        Ok(Self { colors })
    }
}

impl Palette {
    /// Parse a palette from a JSON array of eight colour strings.
    ///
    /// # Errors
    /// Returns [Error::InvalidPalette] if the text is not a JSON array of
    /// exactly eight strings.
    pub fn from_json(text: &str) -> Result<Self, Error> {
        serde_json::from_str(text).map_err(|error| Error::InvalidPalette(error.to_string()))
    }

    /// Read a palette from a JSON file at `path`.
    ///
    /// # Errors
    /// Returns [Error::Io] if the file cannot be read, or
    /// [Error::InvalidPalette] if it does not hold a valid palette.
    pub fn load(path: &Path) -> Result<Self, Error> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// The colour for a category with the given ID.
    ///
    /// Missing IDs, zero, and IDs past the end of the palette use the fallback colour.
    pub fn color_for(&self, category_id: Option<u8>) -> &str {
        let slot = category_id
            .and_then(|id| usize::from(id).checked_sub(1))
            .filter(|&slot| slot < PALETTE_SIZE)
            .unwrap_or(OTHER_SLOT);

        &self.colors[slot]
    }

    /// The fallback colour.
    pub fn other_color(&self) -> &str {
        &self.colors[OTHER_SLOT]
    }
}
