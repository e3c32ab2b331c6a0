//! Score label colours

use serde::{Deserialize, Serialize};

/// 8-bit RGB colour, alpha is left to the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

/// Rainbow cycled through by the score label, one step per tick
pub const RAINBOW: [Color; 7] = [
    Color::rgb(255, 0, 0),
    Color::rgb(255, 127, 0),
    Color::rgb(255, 255, 0),
    Color::rgb(0, 255, 0),
    Color::rgb(0, 0, 255),
    Color::rgb(75, 0, 130),
    Color::rgb(148, 0, 211),
];

/// Cyclic cursor into a palette
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteCursor {
    index: usize,
}

impl PaletteCursor {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Return the colour under the cursor and step forward, wrapping at the end
    pub fn advance(&mut self, palette: &[Color]) -> Option<Color> {
        if palette.is_empty() {
            return None;
        }
        let color = palette[self.index % palette.len()];
        self.index = (self.index + 1) % palette.len();
        Some(color)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cursor_wraps_after_full_cycle() {
        let mut cursor = PaletteCursor::default();
        let first = cursor.advance(&RAINBOW);
        for _ in 1..RAINBOW.len() {
            cursor.advance(&RAINBOW);
        }
        assert_eq!(cursor.index(), 0);
        assert_eq!(cursor.advance(&RAINBOW), first);
    }

    #[test]
    fn test_empty_palette() {
        let mut cursor = PaletteCursor::default();
        assert_eq!(cursor.advance(&[]), None);
        assert_eq!(cursor.index(), 0);
    }
}
