//! # Strip decoding
//!
//! Entry points that decode the compressed rows of one TIFF strip into a
//! caller-owned buffer of packed rows.

use std::sync::atomic::{AtomicBool, Ordering};

use log::{debug, warn};

use crate::{
    bits::{BitCursor, ByteSource},
    g3::OneDimensionalDecoder,
    g4::TwoDimensionalDecoder,
    options::{Compression, DecodeOptions, Photometric},
    packer::RowBitPacker,
    reference::ReferenceScanline,
    ErrorKind, FaxError, FaxResult, Feature,
};

/// Why decoding a strip stopped
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum StripEnd {
    /// All requested rows were decoded
    RowCount,
    /// An EOFB (T.6) or RTC (T.4) ended the data
    EndOfBlock,
    /// The input ran out on a row boundary
    EndOfData,
}

/// The outcome of a successful decode
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct StripSummary {
    /// Rows taken from the input
    pub rows_decoded: usize,
    /// Rows filled with white after the input ended
    pub rows_filled: usize,
    /// Input bytes read, including a partially used last byte
    pub bytes_consumed: usize,
    /// Why decoding stopped
    pub end: StripEnd,
}

/// One row decoding strategy per coding scheme
#[derive(Debug)]
pub(crate) enum DecodingMode {
    OneDimensional(OneDimensionalDecoder),
    TwoDimensional(TwoDimensionalDecoder),
}

impl DecodingMode {
    fn select(options: &DecodeOptions) -> FaxResult<Self> {
        match options.compression {
            Compression::ModifiedHuffman => Ok(Self::OneDimensional(
                OneDimensionalDecoder::modified_huffman(),
            )),
            Compression::Group3 if options.two_dimensional_coding => Err(FaxError::new(
                ErrorKind::UnsupportedFeature(Feature::MixedCoding),
                0,
            )),
            Compression::Group3 => Ok(Self::OneDimensional(OneDimensionalDecoder::group3(
                options.eol_padding,
            ))),
            Compression::Group4 => Ok(Self::TwoDimensional(TwoDimensionalDecoder::new())),
        }
    }
}

/// The destination rows of a decode call
pub(crate) struct Rows<'a> {
    out: &'a mut [u8],
    count: usize,
    width: usize,
    stride: usize,
    photometric: Photometric,
    cancel: Option<&'a AtomicBool>,
}

impl<'a> Rows<'a> {
    /// Number of rows requested
    pub(crate) fn count(&self) -> usize {
        self.count
    }

    /// A packer for row `row`
    pub(crate) fn packer(&mut self, row: usize) -> RowBitPacker<'_> {
        let start = row * self.stride;
        RowBitPacker::new(
            &mut self.out[start..start + self.stride],
            self.width,
            self.photometric,
        )
    }

    /// A packer for row `row`, and a view of the row above it
    pub(crate) fn with_reference(
        &mut self,
        row: usize,
    ) -> (ReferenceScanline<'_>, RowBitPacker<'_>) {
        let (done, rest) = self.out.split_at_mut(row * self.stride);
        let reference = match row.checked_sub(1) {
            None => ReferenceScanline::imaginary(self.width),
            Some(prev) => ReferenceScanline::row(
                &done[prev * self.stride..],
                self.width,
                self.photometric,
            ),
        };
        let packer = RowBitPacker::new(&mut rest[..self.stride], self.width, self.photometric);
        (reference, packer)
    }

    /// Called after row `row` is complete. Stops before the next row if
    /// the decode was cancelled.
    pub(crate) fn row_done<S: ByteSource>(
        &self,
        row: usize,
        cursor: &BitCursor<S>,
    ) -> FaxResult<()> {
        let next = row + 1;
        match self.cancel {
            Some(flag) if next < self.count && flag.load(Ordering::Relaxed) => {
                Err(cursor.error(ErrorKind::Cancelled).at_row(next))
            }
            _ => Ok(()),
        }
    }
}

/// Decodes CCITT strips of a fixed width
#[derive(Debug, Clone)]
pub struct StripDecoder {
    width: usize,
    options: DecodeOptions,
}

impl StripDecoder {
    /// Create a new decoder for rows of `width` pixels
    pub fn new(width: usize, options: DecodeOptions) -> Self {
        Self { width, options }
    }

    /// Width of a row in pixels
    pub fn width(&self) -> usize {
        self.width
    }

    /// Bytes per decoded row
    pub fn stride(&self) -> usize {
        self.width.div_ceil(8)
    }

    /// The options this decoder was created with
    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }

    /// Decode `rows` rows from at most `budget` bytes of `source` into `out`.
    ///
    /// `out` must hold at least `rows * stride` bytes. If the input ends
    /// early on a row boundary or with an end-of-block code, the remaining
    /// rows are white.
    pub fn decode<S: ByteSource>(
        &self,
        source: S,
        budget: usize,
        rows: usize,
        out: &mut [u8],
    ) -> FaxResult<StripSummary> {
        self.run(source, budget, rows, out, None)
    }

    /// Like [`StripDecoder::decode`], but stops with [`ErrorKind::Cancelled`]
    /// once `cancel` is set. The flag is checked after every row.
    pub fn decode_cancellable<S: ByteSource>(
        &self,
        source: S,
        budget: usize,
        rows: usize,
        out: &mut [u8],
        cancel: &AtomicBool,
    ) -> FaxResult<StripSummary> {
        self.run(source, budget, rows, out, Some(cancel))
    }

    fn run<S: ByteSource>(
        &self,
        source: S,
        budget: usize,
        rows: usize,
        out: &mut [u8],
        cancel: Option<&AtomicBool>,
    ) -> FaxResult<StripSummary> {
        let mode = DecodingMode::select(&self.options)?;
        let stride = self.stride();
        let expected = rows.saturating_mul(stride);
        if out.len() < expected {
            let kind = ErrorKind::OutputTooSmall {
                expected,
                actual: out.len(),
            };
            return Err(FaxError::new(kind, 0));
        }

        debug!(
            "Decoding {:?} strip of {}x{} pixels from {} bytes",
            self.options.compression, self.width, rows, budget
        );

        let mut cursor = BitCursor::new(source, budget);
        cursor.set_fill_order(self.options.fill_order);
        let mut target = Rows {
            out: &mut out[..expected],
            count: rows,
            width: self.width,
            stride,
            photometric: self.options.photometric,
            cancel,
        };

        let (rows_decoded, end) = match &mode {
            DecodingMode::OneDimensional(decoder) => decoder.decode(&mut cursor, &mut target)?,
            DecodingMode::TwoDimensional(decoder) => decoder.decode(&mut cursor, &mut target)?,
        };

        let rows_filled = rows - rows_decoded;
        if rows_filled > 0 {
            warn!(
                "{:?} after {} of {} rows, filling {} rows with white",
                end, rows_decoded, rows, rows_filled
            );
            for row in rows_decoded..rows {
                target.packer(row).fill_white();
            }
        }

        Ok(StripSummary {
            rows_decoded,
            rows_filled,
            bytes_consumed: cursor.bytes_consumed(),
            end,
        })
    }
}

/// Decode a strip held in memory into a new buffer of packed rows
pub fn decode_strip(
    data: &[u8],
    width: usize,
    rows: usize,
    options: DecodeOptions,
) -> FaxResult<Vec<u8>> {
    let decoder = StripDecoder::new(width, options);
    let mut out = vec![0; decoder.stride() * rows];
    decoder.decode(data.iter(), data.len(), rows, &mut out)?;
    Ok(out)
}
