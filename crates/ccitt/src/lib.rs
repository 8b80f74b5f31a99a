#![warn(missing_docs)]
//! # CCITT fax decoding for TIFF strips
//!
//! Decodes Modified Huffman (TIFF compression 2), T.4 1D (Group 3, TIFF
//! compression 3) and T.6 (Group 4, TIFF compression 4) data into packed
//! rows of 1 bit per pixel. Each row starts on a byte boundary.
//!
//! ```
//! use tiff_ccitt::{decode_strip, Compression, DecodeOptions};
//!
//! // a single T.6 row of 8 white pixels (V0), followed by EOFB
//! let data = [0b1000_0000, 0b0000_1000, 0b0000_0000, 0b1000_0000];
//! let rows = decode_strip(&data, 8, 1, DecodeOptions::new(Compression::Group4))?;
//! assert_eq!(rows, [0x00]);
//! # Ok::<(), tiff_ccitt::FaxError>(())
//! ```

mod ascii_art;
pub mod bits;
mod color;
mod encode;
mod error;
mod g3;
mod g4;
pub mod mode;
mod options;
pub mod packer;
pub mod reference;
pub mod runs;
mod strip;
pub mod tables;

pub use ascii_art::{ascii_art, pbm_to_io_writer, BorderDrawing, BoxDrawing, ASCII, UNICODE};
pub use bits::{BitCursor, BitWriter, ByteSource, FillOrder};
pub use color::Color;
pub use encode::{encode_strip, Encoder};
pub use error::{ErrorKind, FaxError, FaxResult, Feature};
pub use options::{Compression, DecodeOptions, Photometric, T4Options, T6Options};
pub use strip::{decode_strip, StripDecoder, StripEnd, StripSummary};
