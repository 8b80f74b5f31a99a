//! # Run length decoding
//!
//! A run is zero or more make-up code words followed by exactly one
//! terminating code word, all from the table of the run's color.

use crate::{
    bits::{BitCursor, ByteSource},
    tables::{CodeTable, Step, EOL_LEN},
    Color, ErrorKind, FaxResult,
};

/// Widest window (fill bits included) searched for an EOL when fill bits are allowed
pub const PADDED_EOL_WINDOW: u8 = 24;

/// A run length, or an end-of-line marker where a row may begin
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RunCode {
    /// A complete run of this many pixels
    Run(usize),
    /// `000000000001`, possibly preceded by fill bits
    Eol,
}

/// Decode one complete run of `color`
pub fn decode_run<S: ByteSource>(cursor: &mut BitCursor<S>, color: Color) -> FaxResult<usize> {
    match decode(cursor, color, None)? {
        RunCode::Run(len) => Ok(len),
        RunCode::Eol => Err(cursor.error(ErrorKind::InvalidCodeWord)),
    }
}

/// Decode one complete run of `color`, or an EOL in its place.
///
/// With `eol_padding`, up to [`PADDED_EOL_WINDOW`] bits of zeros and the
/// final one bit are accepted, otherwise the EOL must be exactly 12 bits.
pub fn decode_run_or_eol<S: ByteSource>(
    cursor: &mut BitCursor<S>,
    color: Color,
    eol_padding: bool,
) -> FaxResult<RunCode> {
    let window = if eol_padding {
        PADDED_EOL_WINDOW
    } else {
        EOL_LEN
    };
    decode(cursor, color, Some(window))
}

fn decode<S: ByteSource>(
    cursor: &mut BitCursor<S>,
    color: Color,
    eol_window: Option<u8>,
) -> FaxResult<RunCode> {
    let table = CodeTable::runs(color);
    let mut total: usize = 0;
    let mut node = 0;
    // bits of the current code word, and whether all of them were zero
    let mut len: u8 = 0;
    let mut zeros = true;

    loop {
        let bit = cursor.read_bit()?;
        len += 1;
        zeros &= !bit;

        match table.step(&mut node, bit) {
            Step::Partial => {}
            Step::Match(run) => {
                total = total.saturating_add(usize::from(run));
                if run < 64 {
                    return Ok(RunCode::Run(total));
                }
                len = 0;
                zeros = true;
            }
            Step::Invalid => {
                return match eol_window {
                    Some(window) if zeros && total == 0 => scan_eol(cursor, len, window),
                    _ => Err(cursor.error(ErrorKind::InvalidCodeWord)),
                };
            }
        }
    }
}

/// Having read `len` zero bits, read on until the one bit that ends an EOL
fn scan_eol<S: ByteSource>(cursor: &mut BitCursor<S>, mut len: u8, window: u8) -> FaxResult<RunCode> {
    loop {
        if len >= window {
            return Err(cursor.error(ErrorKind::InvalidCodeWord));
        }
        let bit = cursor.read_bit()?;
        len += 1;
        if bit {
            return if len >= EOL_LEN {
                Ok(RunCode::Eol)
            } else {
                Err(cursor.error(ErrorKind::InvalidCodeWord))
            };
        }
    }
}
