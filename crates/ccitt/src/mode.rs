//! # 2D mode words

use crate::{
    bits::{BitCursor, ByteSource},
    tables::{
        CodeTable, Step, MODES, MODE_EXT_1D, MODE_EXT_2D, MODE_HORIZONTAL, MODE_PASS, MODE_V0,
        MODE_VL1, MODE_VL2, MODE_VL3, MODE_VR1, MODE_VR2, MODE_VR3,
    },
    ErrorKind, FaxResult, Feature,
};

/// The 5 bits that turn an extension prefix into an EOL (`0000000` + `00001`)
const EOL_TAIL: u32 = 0b00001;

/// A 2D coding mode
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Mode {
    /// `0001`
    Pass,
    /// `001`
    Horizontal,
    /// Vertical mode with `a1 - b1` in `-3..=3`
    Vertical(i8),
    /// `0000000` extension
    Extension1D,
    /// `0000001` extension
    Extension2D,
    /// End of line
    Eol,
}

impl Mode {
    fn from_id(id: u16) -> Option<Self> {
        Some(match id {
            MODE_PASS => Mode::Pass,
            MODE_HORIZONTAL => Mode::Horizontal,
            MODE_V0 => Mode::Vertical(0),
            MODE_VR1 => Mode::Vertical(1),
            MODE_VR2 => Mode::Vertical(2),
            MODE_VR3 => Mode::Vertical(3),
            MODE_VL1 => Mode::Vertical(-1),
            MODE_VL2 => Mode::Vertical(-2),
            MODE_VL3 => Mode::Vertical(-3),
            MODE_EXT_2D => Mode::Extension2D,
            MODE_EXT_1D => Mode::Extension1D,
            _ => return None,
        })
    }
}

/// Read a single mode word without interpreting extensions
pub fn read_mode_word<S: ByteSource>(cursor: &mut BitCursor<S>) -> FaxResult<Mode> {
    let table: &CodeTable = &MODES;
    let mut node = 0;
    loop {
        let bit = cursor.read_bit()?;
        match table.step(&mut node, bit) {
            Step::Partial => {}
            Step::Match(id) => {
                return Mode::from_id(id).ok_or_else(|| cursor.error(ErrorKind::InvalidCodeWord))
            }
            Step::Invalid => return Err(cursor.error(ErrorKind::InvalidCodeWord)),
        }
    }
}

/// Read the next mode word.
///
/// Some encoders write an EOL as if it was an extension code word, so an
/// extension followed by `00001` is returned as [`Mode::Eol`]. Any other
/// extension is [`Feature::Extension`].
pub fn decode_mode<S: ByteSource>(cursor: &mut BitCursor<S>) -> FaxResult<Mode> {
    match read_mode_word(cursor)? {
        Mode::Extension1D | Mode::Extension2D => {
            if cursor.read_bits(5)? == EOL_TAIL {
                Ok(Mode::Eol)
            } else {
                Err(cursor.error(ErrorKind::UnsupportedFeature(Feature::Extension)))
            }
        }
        mode => Ok(mode),
    }
}
