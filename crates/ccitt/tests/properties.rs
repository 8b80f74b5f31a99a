#![allow(clippy::unusual_byte_groupings)]

use tiff_ccitt::{
    decode_strip,
    mode::{decode_mode, Mode},
    reference::ReferenceScanline,
    BitCursor, Color, Compression, DecodeOptions, ErrorKind, FillOrder, Photometric,
    Feature, StripDecoder, StripEnd,
};

fn g4() -> DecodeOptions {
    DecodeOptions::new(Compression::Group4)
}

#[test]
fn group3_requires_leading_eol() {
    // W8, EOL, W8 without the EOL in front
    let data: &[u8] = &[0b10011_000, 0b00000000, 0b1_10011_00];
    let decoder = StripDecoder::new(8, DecodeOptions::new(Compression::Group3));
    let mut out = [0x55; 2];
    let err = decoder.decode(data.iter(), data.len(), 2, &mut out).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidCodeWord);
    assert_eq!(out, [0x55; 2]);
}

#[test]
fn group4_rejects_runs_past_the_row() {
    // row 0: V0; row 1: VR1 with b1 = 8
    let data: &[u8] = &[0b1_011_0000];
    let err = decode_strip(data, 8, 2, g4()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::RowOverflow);
    assert_eq!(err.row(), 1);
}

#[test]
fn extension_words() {
    let data: &[u8] = &[0b0000001_0, 0b0001_0000];
    let mut cursor = BitCursor::new(data.iter(), data.len());
    assert_eq!(decode_mode(&mut cursor).unwrap(), Mode::Eol);

    // the same word starting a strip ends it
    let decoder = StripDecoder::new(8, g4());
    let mut out = [0xFF; 2];
    let summary = decoder.decode(data.iter(), data.len(), 2, &mut out).unwrap();
    assert_eq!(summary.end, StripEnd::EndOfBlock);
    assert_eq!(summary.rows_decoded, 0);
    assert_eq!(out, [0x00; 2]);

    // uncompressed mode entry (0000001 111)
    let data: &[u8] = &[0b0000001_1, 0b11_000000];
    let err = decode_strip(data, 8, 1, g4()).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFeature(Feature::Extension));
    assert_eq!(err.row(), 0);
}

#[test]
fn reversed_bytes_with_lsb_fill_order() {
    // Modified Huffman, width 8: W3 B2 W3, pad, W0 B8
    let data: [u8; 4] = [0b1000_11_10, 0b00_000000, 0b00110101, 0b000101_00];
    let reversed: Vec<u8> = data.iter().map(|b| b.reverse_bits()).collect();

    let msb = DecodeOptions::new(Compression::ModifiedHuffman);
    let lsb = msb.with_fill_order(FillOrder::LsbToMsb);
    let expected = decode_strip(&data, 8, 2, msb).unwrap();
    assert_eq!(expected, [0b0001_1000, 0xFF]);
    assert_eq!(decode_strip(&reversed, 8, 2, lsb).unwrap(), expected);
}

#[test]
fn black_is_zero_inverts_the_output() {
    let data: &[u8] = &[0b1000_11_10, 0b00_000000];
    let options =
        DecodeOptions::new(Compression::ModifiedHuffman).with_photometric(Photometric::BlackIsZero);
    assert_eq!(decode_strip(data, 8, 1, options).unwrap(), [0b1110_0111]);

    // padding bits stay zero: W3 B2 W1 on a row of 6
    let data: &[u8] = &[0b1000_11_00, 0b0111_0000];
    assert_eq!(decode_strip(data, 6, 1, options).unwrap(), [0b1110_0100]);
}

#[test]
fn white_group4_row() {
    let out = decode_strip(&[0b1000_0000], 8, 1, g4()).unwrap();
    assert_eq!(out, [0x00]);
}

#[test]
fn uniform_rows_have_no_changing_elements() {
    let white = [0x00; 3];
    let black = [0xFF; 3];
    for row in [
        ReferenceScanline::imaginary(20),
        ReferenceScanline::row(&white, 20, Photometric::WhiteIsZero),
        ReferenceScanline::row(&black, 20, Photometric::BlackIsZero),
    ] {
        let b1 = row.find_b1(None, Color::White);
        assert_eq!(b1, 20);
        assert_eq!(row.find_b2(b1), 20);
    }

    let row = ReferenceScanline::row(&black, 20, Photometric::WhiteIsZero);
    assert_eq!(row.find_b1(None, Color::White), 0);
    assert_eq!(row.find_b1(Some(0), Color::Black), 20);
    assert_eq!(row.find_b2(0), 20);
}

#[test]
fn budget_limits_the_input() {
    // H W8 B0, cut after two bytes
    let data: &[u8] = &[0b001_10011, 0b00001101, 0b11_000000];
    let decoder = StripDecoder::new(8, g4());
    let mut out = [0x00; 1];
    let err = decoder.decode(data.iter(), 2, 1, &mut out).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnexpectedEndOfData);
    assert_eq!(err.row(), 0);

    let summary = decoder.decode(data.iter(), 3, 1, &mut out).unwrap();
    assert_eq!(summary.rows_decoded, 1);
    assert_eq!(summary.bytes_consumed, 3);
}

#[test]
fn options_from_tiff_tags() {
    let options = DecodeOptions::from_tiff(3, 0b101, 0, 1, 0).unwrap();
    let err = decode_strip(&[0x00, 0x10], 8, 1, options).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFeature(Feature::MixedCoding));

    let err = DecodeOptions::from_tiff(4, 0, 0b10, 1, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFeature(Feature::UncompressedMode));

    let err = DecodeOptions::from_tiff(5, 0, 0, 1, 0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::UnsupportedFeature(Feature::Compression(5)));
}
