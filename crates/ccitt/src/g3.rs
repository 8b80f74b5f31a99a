//! # CCITT Group 3 1D-encoding
//!
//! Modified Huffman (TIFF compression 2) and T.4 one-dimensional coding
//! (TIFF compression 3). Every row is coded on its own, as alternating
//! white and black runs starting with white.
//!
//! Spec: ITU-T Recommendation T.4 (07/03) <https://www.itu.int/rec/T-REC-T.4-200307-I/en>

use log::{debug, trace};

use crate::{
    bits::{BitCursor, ByteSource},
    packer::RowBitPacker,
    runs::{decode_run, decode_run_or_eol, RunCode},
    strip::{Rows, StripEnd},
    tables::{EOL, EOL_LEN},
    Color, ErrorKind, FaxResult,
};

/// Length of an EOL with fill bits in front, when it starts the data
const PADDED_EOL_LEN: u8 = 16;

enum RowEnd {
    Complete,
    EndOfBlock,
}

/// # Group 3 (T.4) 1D Decoder
#[derive(Debug)]
pub(crate) struct OneDimensionalDecoder {
    /// EOLs separate the rows and one precedes the first row
    with_eols: bool,
    /// EOLs may be preceded by fill bits
    eol_padding: bool,
    /// Rows start on a byte boundary
    byte_aligned: bool,
}

impl OneDimensionalDecoder {
    /// Modified Huffman: no EOLs, byte aligned rows
    pub(crate) fn modified_huffman() -> Self {
        Self {
            with_eols: false,
            eol_padding: false,
            byte_aligned: true,
        }
    }

    /// T.4 1D coding
    pub(crate) fn group3(eol_padding: bool) -> Self {
        Self {
            with_eols: true,
            eol_padding,
            byte_aligned: false,
        }
    }

    /// Decode rows until all are done or the data ends.
    /// Returns the number of decoded rows.
    pub(crate) fn decode<S: ByteSource>(
        &self,
        cursor: &mut BitCursor<S>,
        rows: &mut Rows<'_>,
    ) -> FaxResult<(usize, StripEnd)> {
        // consecutive EOLs without a run in between
        let mut eols = 0;
        if self.with_eols {
            let len = if self.eol_padding {
                PADDED_EOL_LEN
            } else {
                EOL_LEN
            };
            if cursor.read_bits(len)? != EOL {
                return Err(cursor.error(ErrorKind::InvalidCodeWord));
            }
            eols = 1;
        }

        for row in 0..rows.count() {
            cursor.mark_row_start();
            if !cursor.has_more()? {
                return Ok((row, StripEnd::EndOfData));
            }

            match self.decode_row(cursor, rows.packer(row), &mut eols) {
                Ok(RowEnd::Complete) => {}
                Ok(RowEnd::EndOfBlock) => return Ok((row, StripEnd::EndOfBlock)),
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

            if self.byte_aligned && cursor.bits_since_row_start() % 8 != 0 {
                cursor.align();
            }
            trace!("Row {} ends at bit {}", row, cursor.position());
            rows.row_done(row, cursor)?;
        }
        Ok((rows.count(), StripEnd::RowCount))
    }

    fn decode_row<S: ByteSource>(
        &self,
        cursor: &mut BitCursor<S>,
        mut packer: RowBitPacker<'_>,
        eols: &mut u8,
    ) -> FaxResult<RowEnd> {
        let mut color = Color::White;
        let mut first = true;

        while !packer.is_complete() {
            let len = if first && self.with_eols {
                match decode_run_or_eol(cursor, color, self.eol_padding)? {
                    RunCode::Eol => {
                        *eols += 1;
                        if *eols >= 2 {
                            return Ok(RowEnd::EndOfBlock);
                        }
                        continue;
                    }
                    RunCode::Run(len) => len,
                }
            } else {
                decode_run(cursor, color)?
            };

            if first {
                first = false;
                *eols = 0;
                if len == 0 {
                    // the row starts with black
                    color = Color::Black;
                    continue;
                }
            }
            packer
                .write_run(color, len)
                .map_err(|kind| cursor.error(kind))?;
            color.invert();
        }

        packer.end_row();
        Ok(RowEnd::Complete)
    }
}
