//! # CCITT Group 4 2D-encoding
//!
//! Every row is coded relative to the row above it (the reference line);
//! the first row is coded against an imaginary white line.
//!
//! Spec: ITU-T Recommendation T.6 (11/88) <https://www.itu.int/rec/T-REC-T.6-198811-I/en>

use log::{debug, trace};

use crate::{
    bits::{BitCursor, ByteSource},
    mode::{decode_mode, Mode},
    packer::RowBitPacker,
    reference::ReferenceScanline,
    runs::decode_run,
    strip::{Rows, StripEnd},
    Color, ErrorKind, FaxResult, Feature,
};

enum RowEnd {
    Complete,
    /// An EOL after `pixels` pixels of the row
    EndOfBlock { pixels: usize },
}

/// # Group 4 (T.6) Decoder
#[derive(Debug, Default)]
pub(crate) struct TwoDimensionalDecoder {}

impl TwoDimensionalDecoder {
    /// Create a new instance
    pub(crate) fn new() -> Self {
        Self {}
    }

    /// Decode rows until all are done or the data ends.
    /// Returns the number of decoded rows.
    pub(crate) fn decode<S: ByteSource>(
        &self,
        cursor: &mut BitCursor<S>,
        rows: &mut Rows<'_>,
    ) -> FaxResult<(usize, StripEnd)> {
        for row in 0..rows.count() {
            cursor.mark_row_start();
            if !cursor.has_more()? {
                return Ok((row, StripEnd::EndOfData));
            }

            let (reference, packer) = rows.with_reference(row);
            match decode_row(cursor, &reference, packer) {
                Ok(RowEnd::Complete) => {}
                Ok(RowEnd::EndOfBlock { pixels }) => {
                    let decoded = if pixels > 0 { row + 1 } else { row };
                    return Ok((decoded, StripEnd::EndOfBlock));
                }
                Err(e) => {
                    if cursor.only_zeros_since_row_start()
                        && cursor.only_zeros_remain().map_err(|e| e.at_row(row))?
                    {
                        debug!("Only fill bits after row {}", row);
                        return Ok((row, StripEnd::EndOfData));
                    }
                    return Err(e.at_row(row));
                }
            }

            trace!("Row {} ends at bit {}", row, cursor.position());
            rows.row_done(row, cursor)?;
        }
        Ok((rows.count(), StripEnd::RowCount))
    }
}

fn decode_row<S: ByteSource>(
    cursor: &mut BitCursor<S>,
    reference: &ReferenceScanline<'_>,
    mut packer: RowBitPacker<'_>,
) -> FaxResult<RowEnd> {
    // `None` is the imaginary position left of the first pixel
    let mut a0: Option<usize> = None;
    let mut color = Color::White;

    while !packer.is_complete() {
        let mode = decode_mode(cursor)?;
        match mode {
            Mode::Pass => {
                let b1 = reference.find_b1(a0, color);
                let b2 = reference.find_b2(b1);
                packer
                    .fill_to(b2, color)
                    .map_err(|kind| cursor.error(kind))?;
                a0 = Some(b2);
            }
            Mode::Horizontal => {
                let first = decode_run(cursor, color)?;
                let second = decode_run(cursor, color.opposite())?;
                packer
                    .write_run(color, first)
                    .and_then(|()| packer.write_run(color.opposite(), second))
                    .map_err(|kind| cursor.error(kind))?;
                a0 = Some(packer.position());
            }
            Mode::Vertical(offset) => {
                let b1 = reference.find_b1(a0, color);
                let a1 = b1
                    .checked_add_signed(offset.into())
                    .ok_or_else(|| cursor.error(ErrorKind::InvalidCodeWord))?;
                packer
                    .fill_to(a1, color)
                    .map_err(|kind| cursor.error(kind))?;
                color.invert();
                a0 = Some(a1);
            }
            Mode::Eol => {
                let pixels = packer.position();
                trace!("EOL after {} pixels", pixels);
                packer.fill_white();
                return Ok(RowEnd::EndOfBlock { pixels });
            }
            Mode::Extension1D | Mode::Extension2D => {
                return Err(cursor.error(ErrorKind::UnsupportedFeature(Feature::Extension)));
            }
        }
    }

    packer.end_row();
    Ok(RowEnd::Complete)
}

#[cfg(test)]
#[allow(clippy::unusual_byte_groupings)]
mod tests {
    use crate::{
        options::{Compression, DecodeOptions},
        strip::{decode_strip, StripDecoder, StripEnd},
        ErrorKind,
    };

    fn g4() -> DecodeOptions {
        DecodeOptions::new(Compression::Group4)
    }

    #[test]
    fn test_all_white_row() {
        // V0 at b1 = width
        let out = decode_strip(&[0b1000_0000], 8, 1, g4()).unwrap();
        assert_eq!(out, [0x00]);

        // H W8 B0: 001 10011 0000110111
        let data: &[u8] = &[0b001_10011, 0b00001101, 0b11_000000];
        let out = decode_strip(data, 8, 1, g4()).unwrap();
        assert_eq!(out, [0x00]);
    }

    #[test]
    fn test_vertical_modes() {
        // row 0: H W2 B3 (001 0111 10), V0 -> ..XXX...
        // row 1: VR1 (a1 = 3), VL1 (a1 = 4), V0 -> ...X....
        let data: &[u8] = &[0b001_0111_1, 0b0_1_011_010, 0b1_0000000];
        let out = decode_strip(data, 8, 2, g4()).unwrap();
        assert_eq!(out, [0b0011_1000, 0b0001_0000]);
    }

    #[test]
    fn test_pass_mode() {
        // row 0: H W2 B6 (001 0111 0010) -> ..XXXXXX
        // row 1: P with b2 = width -> all white
        let data: &[u8] = &[0b001_0111_0, 0b010_0001_0];
        let out = decode_strip(data, 8, 2, g4()).unwrap();
        assert_eq!(out, [0b0011_1111, 0x00]);
    }

    #[test]
    fn test_row_overflow() {
        // H W6 B3 on a row of 8: 001 1110 10
        let data: &[u8] = &[0b001_1110_1, 0b0_0000000];
        let decoder = StripDecoder::new(8, g4());
        let mut out = [0xAA; 2];
        let err = decoder
            .decode(data.iter(), data.len(), 2, &mut out)
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RowOverflow);
        assert_eq!(err.row(), 0);
        // the second row is untouched
        assert_eq!(out[1], 0xAA);
    }

    #[test]
    fn test_vertical_left_of_a0() {
        // row 0: ..XXX... as above; row 1: VL3 twice
        let data: &[u8] = &[0b001_0111_1, 0b0_1_000001, 0b0_0000010];
        let err = decode_strip(data, 8, 2, g4()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidCodeWord);
        assert_eq!(err.row(), 1);
    }

    #[test]
    fn test_eofb() {
        // row 0: V0, then EOFB
        let data: &[u8] = &[0b1_0000000, 0b00001_000, 0b00000000, 0b1000_0000];
        let decoder = StripDecoder::new(8, g4());
        let mut out = [0xFF; 4];
        let summary = decoder
            .decode(data.iter(), data.len(), 4, &mut out)
            .unwrap();
        assert_eq!(out, [0x00; 4]);
        assert_eq!(summary.end, StripEnd::EndOfBlock);
        assert_eq!(summary.rows_decoded, 1);
        assert_eq!(summary.rows_filled, 3);
    }

    #[test]
    fn test_eol_mid_row() {
        // H W2 B2, then EOL: the rest of the row is white
        let data: &[u8] = &[0b001_0111_1, 0b1_0000000, 0b00001_000];
        let decoder = StripDecoder::new(8, g4());
        let mut out = [0xFF; 2];
        let summary = decoder
            .decode(data.iter(), data.len(), 2, &mut out)
            .unwrap();
        assert_eq!(out, [0b0011_0000, 0x00]);
        assert_eq!(summary.rows_decoded, 1);
        assert_eq!(summary.rows_filled, 1);
    }
}
