use std::num::TryFromIntError;

use image::{GrayImage, Luma};
use tiff_ccitt::{reference::ReferenceScanline, Color, Photometric};

/// Luma values below this are black
const THRESHOLD: u8 = 128;

/// Turn packed rows into a grayscale image
pub fn to_image(
    bitmap: &[u8],
    width: usize,
    photometric: Photometric,
) -> Result<GrayImage, TryFromIntError> {
    let stride = width.div_ceil(8);
    let height = if stride > 0 { bitmap.len() / stride } else { 0 };
    let image = GrayImage::from_fn(u32::try_from(width)?, u32::try_from(height)?, |x, y| {
        let start = y as usize * stride;
        let row = ReferenceScanline::row(&bitmap[start..start + stride], width, photometric);
        match row.color_at(x as usize) {
            Color::Black => Luma([0]),
            Color::White => Luma([255]),
        }
    });
    Ok(image)
}

/// Pack the pixels of an image into rows of 1 bit per pixel.
///
/// Returns the bitmap, the width and the number of rows.
pub fn pack_image(image: &GrayImage, photometric: Photometric) -> (Vec<u8>, usize, usize) {
    let (width, height) = image.dimensions();
    let (width, height) = (width as usize, height as usize);
    let stride = width.div_ceil(8);
    let ink = photometric.ink();

    let mut bitmap = vec![0; stride * height];
    for (x, y, pixel) in image.enumerate_pixels() {
        let black = pixel.0[0] < THRESHOLD;
        if black == ink {
            let (x, y) = (x as usize, y as usize);
            bitmap[y * stride + x / 8] |= 0x80_u8 >> (x % 8);
        }
    }
    (bitmap, width, height)
}

#[cfg(test)]
mod tests {
    use image::{GrayImage, Luma};
    use tiff_ccitt::Photometric;

    use super::{pack_image, to_image};

    #[test]
    fn test_pack_image() {
        let image = GrayImage::from_fn(10, 2, |x, y| {
            if (x + y) % 3 == 0 {
                Luma([0])
            } else {
                Luma([255])
            }
        });
        for photometric in [Photometric::WhiteIsZero, Photometric::BlackIsZero] {
            let (bitmap, width, height) = pack_image(&image, photometric);
            assert_eq!((width, height), (10, 2));
            assert_eq!(bitmap.len(), 4);
            assert_eq!(to_image(&bitmap, width, photometric).unwrap(), image);
        }
    }
}
