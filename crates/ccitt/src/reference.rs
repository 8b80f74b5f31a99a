//! # Reference line
//!
//! The row above the one being decoded, searched for changing elements.

use crate::{options::Photometric, Color};

/// A read-only view of the row above the coding line
#[derive(Debug, Copy, Clone)]
pub enum ReferenceScanline<'a> {
    /// The all-white line above the first row
    Imaginary {
        /// Width in pixels
        width: usize,
    },
    /// A decoded row, packed MSB-first
    Row {
        /// At least `(width + 7) / 8` bytes
        bits: &'a [u8],
        /// Width in pixels
        width: usize,
        /// Bit value used for black pixels
        ink: bool,
    },
}

impl<'a> ReferenceScanline<'a> {
    /// The line above the first row
    pub fn imaginary(width: usize) -> Self {
        Self::Imaginary { width }
    }

    /// View a packed row
    ///
    /// # Panics
    ///
    /// Searching the row panics if `bits` holds fewer than `width` bits.
    pub fn row(bits: &'a [u8], width: usize, photometric: Photometric) -> Self {
        debug_assert!(bits.len() * 8 >= width);
        Self::Row {
            bits,
            width,
            ink: photometric.ink(),
        }
    }

    /// Width in pixels
    pub fn width(&self) -> usize {
        match *self {
            Self::Imaginary { width } | Self::Row { width, .. } => width,
        }
    }

    /// Color of the pixel at `x`, white to the left of the row
    pub fn color_at(&self, x: usize) -> Color {
        match *self {
            Self::Imaginary { .. } => Color::White,
            Self::Row { bits, ink, .. } => {
                let bit = (bits[x / 8] >> (7 - x % 8)) & 1 == 1;
                Color::from(bit == ink)
            }
        }
    }

    /// First changing element at or after `from`, or the width if there is none
    pub fn next_change(&self, from: usize) -> usize {
        let (bits, width, ink) = match *self {
            Self::Imaginary { width } => return width,
            Self::Row { bits, width, ink } => (bits, width, ink),
        };
        if from >= width {
            return width;
        }

        let prev = if from == 0 {
            Color::White
        } else {
            self.color_at(from - 1)
        };
        let same = if prev.is_black() == ink { 0xFF } else { 0x00 };

        let mut x = from;
        while x < width {
            if x % 8 == 0 && x + 8 <= width && bits[x / 8] == same {
                x += 8;
                continue;
            }
            if self.color_at(x) != prev {
                return x;
            }
            x += 1;
        }
        width
    }

    /// `b1`: the first changing element right of `a0` with the color opposite
    /// to `color`, where `a0 = None` is the position before the first pixel
    pub fn find_b1(&self, a0: Option<usize>, color: Color) -> usize {
        if let Self::Imaginary { width } = *self {
            return if a0.is_none() && color != Color::White {
                0
            } else {
                width
            };
        }
        let width = self.width();
        let mut x = a0.map_or(0, |a0| a0 + 1);
        loop {
            x = self.next_change(x);
            if x >= width || self.color_at(x) != color {
                return x;
            }
            x += 1;
        }
    }

    /// `b2`: the next changing element after `b1`
    pub fn find_b2(&self, b1: usize) -> usize {
        self.next_change(b1 + 1)
    }
}
