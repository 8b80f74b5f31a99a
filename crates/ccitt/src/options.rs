//! # Decoding options
//!
//! The TIFF tags that select and parameterize a CCITT decoder.

use bitflags::bitflags;

use crate::{bits::FillOrder, ErrorKind, FaxError, FaxResult, Feature};

bitflags! {
    /// The `T4Options` tag (292)
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct T4Options: u32 {
        /// Rows may be coded 2D (Modified READ)
        const TWO_DIMENSIONAL = 1 << 0;
        /// Uncompressed mode may be used
        const UNCOMPRESSED = 1 << 1;
        /// Fill bits are inserted so that every EOL ends on a byte boundary
        const FILL_BITS = 1 << 2;
    }
}

bitflags! {
    /// The `T6Options` tag (293)
    #[derive(Debug, Copy, Clone, PartialEq, Eq)]
    pub struct T6Options: u32 {
        /// Uncompressed mode may be used
        const UNCOMPRESSED = 1 << 1;
    }
}

/// The CCITT schemes of the TIFF `Compression` tag
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Compression {
    /// Modified Huffman run length encoding (2)
    ModifiedHuffman,
    /// T.4 bi-level encoding (3)
    Group3,
    /// T.6 bi-level encoding (4)
    #[default]
    Group4,
}

impl Compression {
    /// Map a `Compression` tag value
    pub fn from_tiff(value: u16) -> Option<Self> {
        match value {
            2 => Some(Self::ModifiedHuffman),
            3 => Some(Self::Group3),
            4 => Some(Self::Group4),
            _ => None,
        }
    }

    /// The `Compression` tag value
    pub fn tiff_value(self) -> u16 {
        match self {
            Self::ModifiedHuffman => 2,
            Self::Group3 => 3,
            Self::Group4 => 4,
        }
    }
}

/// Which bit value stands for a black pixel
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
pub enum Photometric {
    /// 0 is white, 1 is black
    #[default]
    WhiteIsZero,
    /// 0 is black, 1 is white
    BlackIsZero,
}

impl Photometric {
    /// Map a `PhotometricInterpretation` tag value
    pub fn from_tiff(value: u16) -> Option<Self> {
        match value {
            0 => Some(Self::WhiteIsZero),
            1 => Some(Self::BlackIsZero),
            _ => None,
        }
    }

    /// Bit value of a black pixel
    pub fn ink(self) -> bool {
        self == Self::WhiteIsZero
    }
}

impl FillOrder {
    /// Map a `FillOrder` tag value
    pub fn from_tiff(value: u16) -> Option<Self> {
        match value {
            1 => Some(Self::MsbToLsb),
            2 => Some(Self::LsbToMsb),
            _ => None,
        }
    }
}

/// Options for decoding a strip
#[derive(Debug, Default, Copy, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub struct DecodeOptions {
    /// The coding scheme
    pub compression: Compression,
    /// T.4 rows may be 2D coded
    pub two_dimensional_coding: bool,
    /// T.4 EOLs may be preceded by fill bits
    pub eol_padding: bool,
    /// Bit order within the input bytes
    pub fill_order: FillOrder,
    /// Bit values of the output
    pub photometric: Photometric,
}

impl DecodeOptions {
    /// Options for the given scheme, everything else default
    pub fn new(compression: Compression) -> Self {
        Self {
            compression,
            ..Self::default()
        }
    }

    /// Allow or forbid T.4 2D rows
    pub fn with_two_dimensional_coding(mut self, value: bool) -> Self {
        self.two_dimensional_coding = value;
        self
    }

    /// Allow or forbid fill bits before EOLs
    pub fn with_eol_padding(mut self, value: bool) -> Self {
        self.eol_padding = value;
        self
    }

    /// Set the bit order of the input
    pub fn with_fill_order(mut self, fill_order: FillOrder) -> Self {
        self.fill_order = fill_order;
        self
    }

    /// Set the bit values of the output
    pub fn with_photometric(mut self, photometric: Photometric) -> Self {
        self.photometric = photometric;
        self
    }

    /// Build the options from raw TIFF tag values. Absent option tags are 0,
    /// an absent `FillOrder` is 1.
    pub fn from_tiff(
        compression: u16,
        t4_options: u32,
        t6_options: u32,
        fill_order: u16,
        photometric: u16,
    ) -> FaxResult<Self> {
        let unsupported = |feature| FaxError::new(ErrorKind::UnsupportedFeature(feature), 0);

        let compression = Compression::from_tiff(compression)
            .ok_or_else(|| unsupported(Feature::Compression(compression)))?;
        let fill_order = FillOrder::from_tiff(fill_order)
            .ok_or_else(|| unsupported(Feature::FillOrder(fill_order)))?;
        let photometric = Photometric::from_tiff(photometric)
            .ok_or_else(|| unsupported(Feature::Photometric(photometric)))?;

        let mut options = Self::new(compression)
            .with_fill_order(fill_order)
            .with_photometric(photometric);
        match compression {
            Compression::ModifiedHuffman => {}
            Compression::Group3 => {
                let flags = T4Options::from_bits_truncate(t4_options);
                if flags.contains(T4Options::UNCOMPRESSED) {
                    return Err(unsupported(Feature::UncompressedMode));
                }
                options.two_dimensional_coding = flags.contains(T4Options::TWO_DIMENSIONAL);
                options.eol_padding = flags.contains(T4Options::FILL_BITS);
            }
            Compression::Group4 => {
                let flags = T6Options::from_bits_truncate(t6_options);
                if flags.contains(T6Options::UNCOMPRESSED) {
                    return Err(unsupported(Feature::UncompressedMode));
                }
            }
        }
        Ok(options)
    }
}
