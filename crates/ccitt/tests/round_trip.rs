use color_eyre::eyre;
use tiff_ccitt::{
    decode_strip, encode_strip, Compression, DecodeOptions, FillOrder, Photometric,
    StripDecoder, StripEnd,
};

/// Deterministic pseudo random numbers
struct Lcg(u64);

impl Lcg {
    fn next(&mut self) -> usize {
        self.0 = self
            .0
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        (self.0 >> 33) as usize
    }

    fn run(&mut self) -> usize {
        1 + match self.next() % 8 {
            0 => self.next() % 3000,
            1 | 2 => self.next() % 200,
            _ => self.next() % 12,
        }
    }
}

/// Rows of random runs
fn noise(width: usize, rows: usize, seed: u64) -> Vec<Vec<bool>> {
    let mut rng = Lcg(seed);
    (0..rows)
        .map(|_| {
            let mut row = Vec::with_capacity(width);
            let mut black = rng.next() % 2 == 0;
            while row.len() < width {
                let len = rng.run().min(width - row.len());
                row.extend(std::iter::repeat(black).take(len));
                black = !black;
            }
            row
        })
        .collect()
}

/// Filled circles, so that neighboring rows are similar
fn circles(width: usize, rows: usize) -> Vec<Vec<bool>> {
    let shapes = [(width / 3, rows / 3, width / 4), (width * 2 / 3, rows / 2, width / 5)];
    (0..rows)
        .map(|y| {
            (0..width)
                .map(|x| {
                    shapes.iter().any(|&(cx, cy, r)| {
                        let dx = x.abs_diff(cx);
                        let dy = y.abs_diff(cy);
                        dx * dx + dy * dy < r * r
                    })
                })
                .collect()
        })
        .collect()
}

fn pack(image: &[Vec<bool>], width: usize, photometric: Photometric) -> Vec<u8> {
    let stride = width.div_ceil(8);
    let ink = photometric == Photometric::WhiteIsZero;
    let mut out = vec![0; stride * image.len()];
    for (y, row) in image.iter().enumerate() {
        for (x, &black) in row.iter().enumerate() {
            if black == ink {
                out[y * stride + x / 8] |= 0x80_u8 >> (x % 8);
            }
        }
    }
    out
}

const SCHEMES: [Compression; 3] = [
    Compression::ModifiedHuffman,
    Compression::Group3,
    Compression::Group4,
];

fn assert_round_trip(image: &[Vec<bool>], width: usize, options: DecodeOptions) {
    let pixels = pack(image, width, options.photometric);
    let rows = image.len();
    let encoded = encode_strip(&pixels, width, rows, options).unwrap();
    let decoded = decode_strip(&encoded, width, rows, options).unwrap();
    assert_eq!(decoded, pixels, "{:?}, width {}", options, width);
}

#[test]
fn round_trip_noise() {
    for width in [1, 7, 8, 13, 200, 1728, 3000] {
        let image = noise(width, 12, width as u64);
        for compression in SCHEMES {
            assert_round_trip(&image, width, DecodeOptions::new(compression));
        }
    }
}

#[test]
fn round_trip_circles() {
    for width in [64, 250, 2600] {
        let image = circles(width, 40);
        for compression in SCHEMES {
            for photometric in [Photometric::WhiteIsZero, Photometric::BlackIsZero] {
                let options = DecodeOptions::new(compression).with_photometric(photometric);
                assert_round_trip(&image, width, options);
            }
        }
    }
}

#[test]
fn round_trip_padded_eols() {
    let options = DecodeOptions::new(Compression::Group3).with_eol_padding(true);
    for width in [5, 100, 1000] {
        assert_round_trip(&noise(width, 9, 7), width, options);
    }
}

#[test]
fn round_trip_uniform_rows() {
    let width = 77;
    let image = vec![vec![false; width], vec![true; width], vec![true; width], vec![false; width]];
    for compression in SCHEMES {
        assert_round_trip(&image, width, DecodeOptions::new(compression));
    }
}

#[test]
fn lsb_first_matches_msb_first() -> eyre::Result<()> {
    let width = 300;
    let image = circles(width, 30);
    let pixels = pack(&image, width, Photometric::WhiteIsZero);
    for compression in SCHEMES {
        let msb = DecodeOptions::new(compression);
        let lsb = msb.with_fill_order(FillOrder::LsbToMsb);

        let msb_data = encode_strip(&pixels, width, 30, msb)?;
        let lsb_data = encode_strip(&pixels, width, 30, lsb)?;
        let reversed: Vec<u8> = msb_data.iter().map(|b| b.reverse_bits()).collect();
        assert_eq!(lsb_data, reversed);

        assert_eq!(decode_strip(&lsb_data, width, 30, lsb)?, pixels);
        assert_eq!(decode_strip(&msb_data, width, 30, msb)?, pixels);
    }
    Ok(())
}

#[test]
fn short_strip_is_filled_white() -> eyre::Result<()> {
    let width = 40;
    let image = noise(width, 3, 99);
    let pixels = pack(&image, width, Photometric::WhiteIsZero);
    let expected_end = [
        (Compression::ModifiedHuffman, StripEnd::EndOfData),
        (Compression::Group3, StripEnd::EndOfBlock),
        (Compression::Group4, StripEnd::EndOfBlock),
    ];
    for (compression, end) in expected_end {
        let options = DecodeOptions::new(compression);
        let data = encode_strip(&pixels, width, 3, options)?;

        let decoder = StripDecoder::new(width, options);
        let mut out = vec![0xFF; decoder.stride() * 5];
        let summary = decoder.decode(data.iter(), data.len(), 5, &mut out)?;
        assert_eq!(summary.end, end, "{:?}", compression);
        assert_eq!(summary.rows_decoded, 3);
        assert_eq!(summary.rows_filled, 2);
        assert_eq!(&out[..pixels.len()], &pixels[..]);
        assert!(out[pixels.len()..].iter().all(|&b| b == 0));
    }
    Ok(())
}

#[test]
fn decode_from_reader() -> eyre::Result<()> {
    let width = 120;
    let image = circles(width, 16);
    let pixels = pack(&image, width, Photometric::WhiteIsZero);
    let options = DecodeOptions::new(Compression::Group4);
    let data = encode_strip(&pixels, width, 16, options)?;

    let decoder = StripDecoder::new(width, options);
    let mut out = vec![0; pixels.len()];
    let reader = std::io::Read::bytes(&data[..]);
    let summary = decoder.decode(reader, data.len(), 16, &mut out)?;
    assert_eq!(out, pixels);
    assert_eq!(summary.end, StripEnd::RowCount);
    // the EOFB is not read
    assert!(summary.bytes_consumed < data.len());
    Ok(())
}

#[test]
fn bytes_consumed_by_rows() -> eyre::Result<()> {
    let width = 16;
    let pixels = pack(&noise(width, 4, 5), width, Photometric::WhiteIsZero);
    let options = DecodeOptions::new(Compression::ModifiedHuffman);
    let data = encode_strip(&pixels, width, 4, options)?;

    let decoder = StripDecoder::new(width, options);
    let mut out = vec![0; pixels.len()];
    let summary = decoder.decode(data.iter(), data.len(), 4, &mut out)?;
    // Modified Huffman rows end on byte boundaries, nothing else follows
    assert_eq!(summary.bytes_consumed, data.len());
    assert_eq!(summary.end, StripEnd::RowCount);
    Ok(())
}
