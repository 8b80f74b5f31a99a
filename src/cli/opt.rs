use std::{fmt, str::FromStr};

use clap::Args;
use thiserror::Error;
use tiff_ccitt::{Compression, DecodeOptions, FillOrder, Photometric};

/// The coding scheme of a strip
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Scheme {
    /// Modified Huffman (TIFF compression 2)
    ModifiedHuffman,
    /// T.4 1D with EOLs (TIFF compression 3)
    Group3,
    /// T.6 (TIFF compression 4)
    #[default]
    Group4,
}

#[derive(Debug, Error)]
#[error("Use one of `mh`, `g3` or `g4`")]
/// Failed to parse a scheme name
pub struct SchemeError;

impl FromStr for Scheme {
    type Err = SchemeError;
    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val {
            "mh" | "rle" | "2" => Ok(Self::ModifiedHuffman),
            "g3" | "t4" | "3" => Ok(Self::Group3),
            "g4" | "t6" | "4" => Ok(Self::Group4),
            _ => Err(SchemeError),
        }
    }
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::ModifiedHuffman => "mh",
            Self::Group3 => "g3",
            Self::Group4 => "g4",
        })
    }
}

impl From<Scheme> for Compression {
    fn from(scheme: Scheme) -> Self {
        match scheme {
            Scheme::ModifiedHuffman => Compression::ModifiedHuffman,
            Scheme::Group3 => Compression::Group3,
            Scheme::Group4 => Compression::Group4,
        }
    }
}

/// The format to write a decoded strip in
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum Format {
    /// Portable Bitmap Format
    #[default]
    Pbm,
    /// Portable Network Graphic
    Png,
    /// Box drawing characters on the console
    Ascii,
}

#[derive(Debug, Error)]
#[error("Use one of `pbm`, `png` or `ascii`")]
/// Failed to parse a format name
pub struct FormatError;

impl FromStr for Format {
    type Err = FormatError;
    fn from_str(val: &str) -> Result<Self, Self::Err> {
        match val {
            "pbm" => Ok(Self::Pbm),
            "png" => Ok(Self::Png),
            "ascii" | "txt" => Ok(Self::Ascii),
            _ => Err(FormatError),
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pbm => "pbm",
            Self::Png => "png",
            Self::Ascii => "ascii",
        })
    }
}

/// How a strip is coded
#[derive(Debug, Args)]
pub struct Coding {
    /// The coding scheme: "mh", "g3" or "g4"
    #[clap(default_value_t, long, short = 'c')]
    pub compression: Scheme,
    /// EOLs are padded to end on a byte boundary (Group 3 only)
    #[clap(long)]
    pub eol_padding: bool,
    /// Bytes are filled starting at the least significant bit
    #[clap(long)]
    pub lsb_first: bool,
    /// Black pixels are 0 bits
    #[clap(long)]
    pub black_is_zero: bool,
}

impl Coding {
    /// The library options for these flags
    pub fn options(&self) -> DecodeOptions {
        let fill_order = if self.lsb_first {
            FillOrder::LsbToMsb
        } else {
            FillOrder::MsbToLsb
        };
        let photometric = if self.black_is_zero {
            Photometric::BlackIsZero
        } else {
            Photometric::WhiteIsZero
        };
        DecodeOptions::new(self.compression.into())
            .with_eol_padding(self.eol_padding)
            .with_fill_order(fill_order)
            .with_photometric(photometric)
    }
}

#[cfg(test)]
mod tests {
    use super::{Format, Scheme};

    #[test]
    fn test_names() {
        for scheme in [Scheme::ModifiedHuffman, Scheme::Group3, Scheme::Group4] {
            assert_eq!(scheme.to_string().parse::<Scheme>().unwrap(), scheme);
        }
        for format in [Format::Pbm, Format::Png, Format::Ascii] {
            assert_eq!(format.to_string().parse::<Format>().unwrap(), format);
        }
        assert!("g5".parse::<Scheme>().is_err());
    }
}
