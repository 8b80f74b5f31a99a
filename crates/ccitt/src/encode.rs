//! # Encoder
//!
//! Writes packed rows as Modified Huffman, T.4 1D or T.6 data, in the
//! layout the decoders of this crate read.

use log::debug;

use crate::{
    bits::BitWriter,
    options::{Compression, DecodeOptions},
    reference::ReferenceScanline,
    tables::{
        makeup_code, mode_code, terminating_code, EOL, EOL_LEN, MODE_HORIZONTAL, MODE_PASS,
        MODE_V0, MODE_VL1, MODE_VL2, MODE_VL3, MODE_VR1, MODE_VR2, MODE_VR3,
    },
    Color, ErrorKind, FaxError, FaxResult, Feature,
};

/// Mode ids of the vertical modes, indexed by `a1 - b1 + 3`
const VERTICAL: [u16; 7] = [
    MODE_VL3, MODE_VL2, MODE_VL1, MODE_V0, MODE_VR1, MODE_VR2, MODE_VR3,
];

/// EOLs in a return to control (RTC) sequence
const RTC_EOLS: usize = 6;

/// The encoder
#[derive(Debug, Clone)]
pub struct Encoder {
    width: usize,
    options: DecodeOptions,
}

impl Encoder {
    /// Create a new encoder for rows of `width` pixels. The options are the
    /// ones a decoder needs to read the result.
    pub fn new(width: usize, options: DecodeOptions) -> Self {
        Self { width, options }
    }

    /// Encode `rows` packed rows, each padded to a full byte
    pub fn encode(&self, pixels: &[u8], rows: usize) -> FaxResult<Vec<u8>> {
        let stride = self.width.div_ceil(8);
        let needed = stride.saturating_mul(rows);
        if pixels.len() < needed {
            let bit_offset = (pixels.len() as u64) * 8;
            return Err(FaxError::new(ErrorKind::UnexpectedEndOfData, bit_offset)
                .at_row(pixels.len() / stride));
        }

        let mut output = BitWriter::new();
        match self.options.compression {
            Compression::ModifiedHuffman => {
                for row in 0..rows {
                    self.write_row_1d(&mut output, &self.row(pixels, row));
                    output.flush();
                }
            }
            Compression::Group3 => {
                if self.options.two_dimensional_coding {
                    let kind = ErrorKind::UnsupportedFeature(Feature::MixedCoding);
                    return Err(FaxError::new(kind, 0));
                }
                self.write_eol(&mut output);
                for row in 0..rows {
                    self.write_row_1d(&mut output, &self.row(pixels, row));
                    self.write_eol(&mut output);
                }
                for _ in 1..RTC_EOLS {
                    self.write_eol(&mut output);
                }
            }
            Compression::Group4 => {
                let mut reference = ReferenceScanline::imaginary(self.width);
                for row in 0..rows {
                    let coding = self.row(pixels, row);
                    self.write_row_2d(&mut output, &reference, &coding);
                    reference = coding;
                }
                // EOFB
                output.write_bits(EOL, EOL_LEN);
                output.write_bits(EOL, EOL_LEN);
            }
        }

        let bytes = output.done(self.options.fill_order);
        debug!(
            "Encoded {} rows of {} pixels as {:?} into {} bytes",
            rows,
            self.width,
            self.options.compression,
            bytes.len()
        );
        Ok(bytes)
    }

    fn row<'p>(&self, pixels: &'p [u8], row: usize) -> ReferenceScanline<'p> {
        let stride = self.width.div_ceil(8);
        let start = row * stride;
        ReferenceScanline::row(
            &pixels[start..start + stride],
            self.width,
            self.options.photometric,
        )
    }

    fn write_eol(&self, output: &mut BitWriter) {
        if self.options.eol_padding {
            // the EOL ends on a byte boundary
            let fill = (8 - (output.bit_len() + usize::from(EOL_LEN)) % 8) % 8;
            output.write_run(false, fill);
        }
        output.write_bits(EOL, EOL_LEN);
    }

    fn write_row_1d(&self, output: &mut BitWriter, row: &ReferenceScanline<'_>) {
        if self.width == 0 {
            return;
        }
        let mut color = Color::White;
        let mut start = 0;
        let mut end = row.next_change(0);
        loop {
            write_len(output, color, end - start);
            if end >= self.width {
                break;
            }
            start = end;
            end = row.next_change(end + 1);
            color.invert();
        }
    }

    fn write_row_2d(
        &self,
        output: &mut BitWriter,
        reference: &ReferenceScanline<'_>,
        coding: &ReferenceScanline<'_>,
    ) {
        let mut a0: Option<usize> = None;
        let mut color = Color::White;

        while a0.map_or(self.width > 0, |a0| a0 < self.width) {
            let a1 = coding.next_change(a0.map_or(0, |a0| a0 + 1));
            let b1 = reference.find_b1(a0, color);
            let b2 = reference.find_b2(b1);

            if b2 < a1 {
                write_mode(output, MODE_PASS);
                a0 = Some(b2);
            } else if let Some(&id) = (a1 + 3)
                .checked_sub(b1)
                .and_then(|index| VERTICAL.get(index))
            {
                write_mode(output, id);
                a0 = Some(a1);
                color.invert();
            } else {
                let a2 = coding.next_change(a1 + 1);
                write_mode(output, MODE_HORIZONTAL);
                write_len(output, color, a1 - a0.unwrap_or(0));
                write_len(output, color.opposite(), a2 - a1);
                a0 = Some(a2);
            }
        }
    }
}

/// Encode a buffer of packed rows
pub fn encode_strip(
    pixels: &[u8],
    width: usize,
    rows: usize,
    options: DecodeOptions,
) -> FaxResult<Vec<u8>> {
    Encoder::new(width, options).encode(pixels, rows)
}

fn write_mode(output: &mut BitWriter, id: u16) {
    let (code, len) = mode_code(id);
    output.write_bits(code, len);
}

fn write_len(output: &mut BitWriter, color: Color, mut len: usize) {
    while len >= 2560 {
        let (code, bits) = makeup_code(color, 2560);
        output.write_bits(code, bits);
        len -= 2560;
    }
    if len >= 64 {
        let (code, bits) = makeup_code(color, len / 64 * 64);
        output.write_bits(code, bits);
        len %= 64;
    }
    let (code, bits) = terminating_code(color, len);
    output.write_bits(code, bits);
}
