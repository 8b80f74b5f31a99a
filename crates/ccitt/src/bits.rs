//! # Bit Cursor and Writer

use std::io::{self, Read};

use crate::{ErrorKind, FaxError, FaxResult};

/// Order of writing/reading bits to/from a byte (TIFF `FillOrder` tag)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FillOrder {
    /// A byte is iterated from most- to least-significant bit
    #[default]
    MsbToLsb = 1,
    /// A byte is iterated from lest- to most-significant bit
    LsbToMsb = 2,
}

impl FillOrder {
    /// Turn a physical byte into its logical, MSB-first form
    pub fn apply(self, byte: u8) -> u8 {
        match self {
            FillOrder::MsbToLsb => byte,
            FillOrder::LsbToMsb => byte.reverse_bits(),
        }
    }
}

/// A forward-only source of compressed bytes
pub trait ByteSource {
    /// Fetch the next byte, `None` at the end of the data
    fn next_byte(&mut self) -> io::Result<Option<u8>>;
}

impl ByteSource for std::slice::Iter<'_, u8> {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        Ok(self.next().copied())
    }
}

impl<R: Read> ByteSource for io::Bytes<R> {
    fn next_byte(&mut self) -> io::Result<Option<u8>> {
        self.next().transpose()
    }
}

/// Reads single bits from a [`ByteSource`], MSB-first in logical order.
///
/// At most one byte is held back from the source. The cursor never reads
/// more than `budget` bytes.
#[derive(Debug)]
pub struct BitCursor<S> {
    source: S,
    fill_order: FillOrder,
    budget: usize,
    loaded: usize,
    current: u8,
    /// Unread bits left in `current`
    avail: u8,
    bits_read: u64,
    row_start: u64,
    /// Value of `bits_read` right after the last one bit
    last_one: u64,
}

impl<S: ByteSource> BitCursor<S> {
    /// Creates a new cursor that reads at most `budget` bytes
    pub fn new(source: S, budget: usize) -> Self {
        Self {
            source,
            fill_order: FillOrder::MsbToLsb,
            budget,
            loaded: 0,
            current: 0,
            avail: 0,
            bits_read: 0,
            row_start: 0,
            last_one: 0,
        }
    }

    /// Update the fill order. This should be done before
    /// the first read, otherwise the resulting stream
    /// may be corrupt, but it's not unsound.
    pub fn set_fill_order(&mut self, fill_order: FillOrder) {
        self.fill_order = fill_order;
    }

    fn load(&mut self) -> FaxResult<bool> {
        if self.loaded >= self.budget {
            return Ok(false);
        }
        match self.source.next_byte() {
            Ok(Some(byte)) => {
                self.current = self.fill_order.apply(byte);
                self.avail = 8;
                self.loaded += 1;
                Ok(true)
            }
            Ok(None) => Ok(false),
            Err(e) => Err(FaxError::io(e, self.bits_read)),
        }
    }

    /// Read the next bit
    pub fn read_bit(&mut self) -> FaxResult<bool> {
        if self.avail == 0 && !self.load()? {
            return Err(self.error(ErrorKind::UnexpectedEndOfData));
        }
        self.avail -= 1;
        self.bits_read += 1;
        let bit = (self.current >> self.avail) & 1 == 1;
        if bit {
            self.last_one = self.bits_read;
        }
        Ok(bit)
    }

    /// Read the next `n` bits (at most 32) as an unsigned integer, first bit most significant
    pub fn read_bits(&mut self, n: u8) -> FaxResult<u32> {
        debug_assert!(n <= 32);
        let mut value = 0;
        for _ in 0..n {
            value = (value << 1) | u32::from(self.read_bit()?);
        }
        Ok(value)
    }

    /// Whether at least one more bit can be read
    pub fn has_more(&mut self) -> FaxResult<bool> {
        if self.avail > 0 {
            Ok(true)
        } else {
            self.load()
        }
    }

    /// Skip the rest of a partially consumed byte
    pub fn align(&mut self) {
        if self.avail > 0 && self.avail < 8 {
            self.bits_read += u64::from(self.avail);
            self.avail = 0;
        }
    }

    /// Whether the cursor sits on a byte boundary
    pub fn is_aligned(&self) -> bool {
        self.avail == 0 || self.avail == 8
    }

    /// Remember the current position as the start of a row
    pub fn mark_row_start(&mut self) {
        self.row_start = self.bits_read;
    }

    /// Bits consumed since [`BitCursor::mark_row_start`]
    pub fn bits_since_row_start(&self) -> u64 {
        self.bits_read - self.row_start
    }

    /// Whether every bit read since [`BitCursor::mark_row_start`] was zero
    pub fn only_zeros_since_row_start(&self) -> bool {
        self.last_one <= self.row_start
    }

    /// Consume the rest of the input. Returns whether all of it was zero
    /// bits, stopping early at the first byte holding a one.
    pub fn only_zeros_remain(&mut self) -> FaxResult<bool> {
        let rest = u16::from(self.current) & ((1_u16 << self.avail) - 1);
        self.bits_read += u64::from(self.avail);
        self.avail = 0;
        if rest != 0 {
            return Ok(false);
        }
        while self.load()? {
            self.bits_read += u64::from(self.avail);
            self.avail = 0;
            if self.current != 0 {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// Total bits consumed
    pub fn position(&self) -> u64 {
        self.bits_read
    }

    /// Bytes touched so far, including a partially consumed one
    pub fn bytes_consumed(&self) -> usize {
        if self.avail == 8 {
            // looked ahead, nothing consumed yet
            self.loaded - 1
        } else {
            self.loaded
        }
    }

    pub(crate) fn error(&self, kind: ErrorKind) -> FaxError {
        FaxError::new(kind, self.bits_read)
    }
}

/// A bitwise writer
#[derive(Debug, Default)]
pub struct BitWriter {
    buffer: Vec<u8>,
    curr: u8,
    /// Bits already placed in `curr`
    used: u8,
}

impl BitWriter {
    /// Creates a new instance
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a single bit
    pub fn write(&mut self, b: bool) {
        self.curr = (self.curr << 1) | u8::from(b);
        self.used += 1;
        if self.used == 8 {
            self.buffer.push(self.curr);
            self.curr = 0;
            self.used = 0;
        }
    }

    /// Write the lowest `len` bits of `val`, most significant first
    pub fn write_bits(&mut self, val: u32, len: u8) {
        for i in (0..len).rev() {
            self.write((val >> i) & 1 == 1);
        }
    }

    /// Write `count` copies of the same bit
    pub fn write_run(&mut self, b: bool, mut count: usize) {
        while count > 0 && self.used != 0 {
            self.write(b);
            count -= 1;
        }
        let fill = if b { 0xFF } else { 0x00 };
        self.buffer.extend(std::iter::repeat(fill).take(count / 8));
        for _ in 0..count % 8 {
            self.write(b);
        }
    }

    /// Number of bits written so far
    pub fn bit_len(&self) -> usize {
        self.buffer.len() * 8 + usize::from(self.used)
    }

    /// Pad the current byte with zero bits
    pub fn flush(&mut self) {
        if self.used > 0 {
            self.buffer.push(self.curr << (8 - self.used));
            self.curr = 0;
            self.used = 0;
        }
    }

    /// Flush and return the buffer in the requested physical bit order
    pub fn done(mut self, fill_order: FillOrder) -> Vec<u8> {
        self.flush();
        if fill_order == FillOrder::LsbToMsb {
            for byte in &mut self.buffer {
                *byte = byte.reverse_bits();
            }
        }
        self.buffer
    }
}

#[cfg(test)]
mod tests {
    use super::{BitCursor, BitWriter, FillOrder};
    use crate::ErrorKind;

    #[test]
    fn test_fill_order_apply() {
        assert_eq!(FillOrder::MsbToLsb.apply(0b1000_0001), 0b1000_0001);
        assert_eq!(FillOrder::LsbToMsb.apply(0b0000_0001), 0b1000_0000);
        assert_eq!(FillOrder::LsbToMsb.apply(0b0000_0110), 0b0110_0000);
    }

    #[test]
    fn test_read_bits_msb_first() {
        let data: &[u8] = &[0b1010_0000, 0b1111_0000];
        let mut cursor = BitCursor::new(data.iter(), data.len());
        assert_eq!(cursor.read_bits(3).unwrap(), 0b101);
        assert_eq!(cursor.read_bits(9).unwrap(), 0b0_0000_1111);
        assert_eq!(cursor.position(), 12);
    }

    #[test]
    fn test_read_bits_lsb_first() {
        let data: &[u8] = &[0b0000_0101];
        let mut cursor = BitCursor::new(data.iter(), data.len());
        cursor.set_fill_order(FillOrder::LsbToMsb);
        assert_eq!(cursor.read_bits(3).unwrap(), 0b101);
    }

    #[test]
    fn test_budget() {
        let data: &[u8] = &[0xFF, 0xFF];
        let mut cursor = BitCursor::new(data.iter(), 1);
        assert_eq!(cursor.read_bits(8).unwrap(), 0xFF);
        assert!(!cursor.has_more().unwrap());
        let err = cursor.read_bit().unwrap_err();
        assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfData);
        assert_eq!(err.bit_offset(), 8);
    }

    #[test]
    fn test_align_and_row_bits() {
        let data: &[u8] = &[0xFF, 0x80];
        let mut cursor = BitCursor::new(data.iter(), data.len());
        cursor.mark_row_start();
        cursor.read_bits(3).unwrap();
        assert_eq!(cursor.bits_since_row_start(), 3);
        assert!(!cursor.only_zeros_since_row_start());
        assert!(!cursor.is_aligned());
        cursor.align();
        assert!(cursor.is_aligned());
        assert_eq!(cursor.position(), 8);
        assert!(cursor.has_more().unwrap());
        // looking ahead does not count as consumed
        assert_eq!(cursor.bytes_consumed(), 1);
        cursor.align();
        cursor.mark_row_start();
        assert!(cursor.only_zeros_since_row_start());
        assert!(cursor.read_bit().unwrap());
        assert_eq!(cursor.bytes_consumed(), 2);
    }

    #[test]
    fn test_only_zeros_remain() {
        let data: &[u8] = &[0b1000_0000, 0x00, 0x00];
        let mut cursor = BitCursor::new(data.iter(), data.len());
        assert!(cursor.read_bit().unwrap());
        assert!(cursor.only_zeros_remain().unwrap());
        assert_eq!(cursor.position(), 24);
        assert_eq!(cursor.bytes_consumed(), 3);

        let data: &[u8] = &[0b1000_0000, 0x00, 0x01];
        let mut cursor = BitCursor::new(data.iter(), data.len());
        cursor.read_bit().unwrap();
        assert!(!cursor.only_zeros_remain().unwrap());

        // the budget ends the input
        let mut cursor = BitCursor::new(data.iter(), 2);
        cursor.read_bit().unwrap();
        assert!(cursor.only_zeros_remain().unwrap());
    }

    #[test]
    fn test_io_source() {
        let data: &[u8] = &[0b0100_0000];
        let mut cursor = BitCursor::new(std::io::Read::bytes(data), 1);
        assert!(!cursor.read_bit().unwrap());
        assert!(cursor.read_bit().unwrap());
    }

    #[test]
    fn test_bit_writer_write_bits() {
        let mut bw = BitWriter::new();
        bw.write_bits(0b000011110000, 12);
        bw.write_bits(0b1010, 4);

        assert_eq!(&bw.buffer, &[0b00001111, 0b00001010]);

        bw.write_bits(0b111111, 6);
        assert_eq!(bw.curr, 0b111111);
        assert_eq!(bw.bit_len(), 22);

        bw.write_bits(0b000000, 6);
        assert_eq!(&bw.buffer, &[0b00001111, 0b00001010, 0b11111100]);

        bw.write_bits(0b1111, 4);
        assert_eq!(
            &bw.buffer,
            &[0b00001111, 0b00001010, 0b11111100, 0b00001111]
        );
        assert_eq!(bw.used, 0);
    }

    #[test]
    fn test_bit_writer_run_and_done() {
        let mut bw = BitWriter::new();
        bw.write(true);
        bw.write_run(false, 10);
        bw.write_run(true, 9);
        assert_eq!(bw.bit_len(), 20);
        assert_eq!(
            bw.done(FillOrder::MsbToLsb),
            vec![0b1000_0000, 0b0001_1111, 0b1111_0000]
        );

        let mut bw = BitWriter::new();
        bw.write_bits(0b110, 3);
        assert_eq!(bw.done(FillOrder::LsbToMsb), vec![0b0000_0011]);
    }
}
