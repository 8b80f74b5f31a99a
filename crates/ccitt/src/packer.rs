//! # Row packing

use crate::{options::Photometric, Color, ErrorKind};

/// Writes runs of pixels into one packed output row.
///
/// Pixels are packed MSB-first. Every bit of the row is written, so the
/// row does not need to be cleared beforehand.
#[derive(Debug)]
pub struct RowBitPacker<'a> {
    row: &'a mut [u8],
    width: usize,
    pos: usize,
    ink: bool,
}

impl<'a> RowBitPacker<'a> {
    /// Create a packer for a row of `width` pixels
    pub fn new(row: &'a mut [u8], width: usize, photometric: Photometric) -> Self {
        debug_assert!(row.len() * 8 >= width);
        Self {
            row,
            width,
            pos: 0,
            ink: photometric.ink(),
        }
    }

    /// Pixels written so far
    pub fn position(&self) -> usize {
        self.pos
    }

    /// Width of the row
    pub fn width(&self) -> usize {
        self.width
    }

    /// Whether all pixels of the row have been written
    pub fn is_complete(&self) -> bool {
        self.pos >= self.width
    }

    /// Append `len` pixels of `color`
    pub fn write_run(&mut self, color: Color, len: usize) -> Result<(), ErrorKind> {
        let end = self.pos.checked_add(len).ok_or(ErrorKind::RowOverflow)?;
        if end > self.width {
            return Err(ErrorKind::RowOverflow);
        }
        self.set(self.pos, end, color.is_black() == self.ink);
        self.pos = end;
        Ok(())
    }

    /// Write `color` up to (excluding) column `to`
    pub fn fill_to(&mut self, to: usize, color: Color) -> Result<(), ErrorKind> {
        match to.checked_sub(self.pos) {
            Some(len) => self.write_run(color, len),
            None => Err(ErrorKind::InvalidCodeWord),
        }
    }

    /// Fill the rest of the row with white and finish it
    pub fn fill_white(mut self) {
        let width = self.width;
        self.set(self.pos, width, !self.ink);
        self.pos = width;
        self.end_row();
    }

    /// Zero the padding bits after the last pixel
    pub fn end_row(self) {
        let bytes = (self.width + 7) / 8;
        if self.width % 8 != 0 {
            self.row[bytes - 1] &= 0xFF_u8 << (8 - self.width % 8);
        }
        for byte in &mut self.row[bytes..] {
            *byte = 0;
        }
    }

    fn set(&mut self, start: usize, end: usize, value: bool) {
        let fill = if value { 0xFF } else { 0x00 };
        let mut x = start;
        while x < end {
            let i = x / 8;
            let offset = x % 8;
            if offset == 0 && x + 8 <= end {
                self.row[i] = fill;
                x += 8;
                continue;
            }
            let n = (8 - offset).min(end - x);
            // n bits starting at offset, counted from the MSB
            let mask = ((0xFF_u16 << (8 - n)) as u8) >> offset;
            self.row[i] = (self.row[i] & !mask) | (fill & mask);
            x += n;
        }
    }
}
