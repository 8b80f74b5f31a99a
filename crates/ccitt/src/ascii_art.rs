//! # Draw decoded rows as ascii-art or PBM
use std::{fmt, io};

use crate::{options::Photometric, reference::ReferenceScanline, Color};

/// Characters of the top or bottom border
#[derive(Debug)]
pub struct BorderDrawing {
    /// Left corner
    pub left: char,
    /// Repeated for every column
    pub middle: char,
    /// Right corner
    pub right: char,
}

/// Characters used to draw a bitmap
#[derive(Debug)]
pub struct BoxDrawing {
    /// Top border
    pub top: BorderDrawing,
    /// Left of every row
    pub left: char,
    /// Right of every row
    pub right: char,
    /// Bottom border
    pub bottom: BorderDrawing,
    /// A black pixel
    pub ink: char,
    /// A white pixel
    pub no_ink: char,
}

const ASCII_BORDER: BorderDrawing = BorderDrawing {
    left: '+',
    middle: '-',
    right: '+',
};

/// Plain ASCII characters
pub const ASCII: &BoxDrawing = &BoxDrawing {
    top: ASCII_BORDER,
    left: '|',
    right: '|',
    bottom: ASCII_BORDER,
    ink: '#',
    no_ink: ' ',
};

/// Box drawing characters
pub const UNICODE: &BoxDrawing = &BoxDrawing {
    top: BorderDrawing {
        left: '╔',
        middle: '═',
        right: '╗',
    },
    left: '║',
    right: '║',
    bottom: BorderDrawing {
        left: '╚',
        middle: '═',
        right: '╝',
    },
    ink: '█',
    no_ink: ' ',
};

fn border<W: fmt::Write>(w: &mut W, border: &BorderDrawing, width: usize) -> fmt::Result {
    w.write_char(border.left)?;
    for _ in 0..width {
        w.write_char(border.middle)?;
    }
    w.write_char(border.right)?;
    w.write_char('\n')
}

/// Draw packed rows (each padded to a full byte) using characters
pub fn ascii_art<W: fmt::Write>(
    w: &mut W,
    b: &BoxDrawing,
    bitmap: &[u8],
    width: usize,
    photometric: Photometric,
) -> fmt::Result {
    let stride = width.div_ceil(8);
    border(w, &b.top, width)?;
    if stride > 0 {
        for row in bitmap.chunks_exact(stride) {
            let row = ReferenceScanline::row(row, width, photometric);
            w.write_char(b.left)?;
            for x in 0..width {
                w.write_char(match row.color_at(x) {
                    Color::Black => b.ink,
                    Color::White => b.no_ink,
                })?;
            }
            w.write_char(b.right)?;
            w.write_char('\n')?;
        }
    }
    border(w, &b.bottom, width)
}

/// Write packed rows as a binary PBM (`P4`) image
pub fn pbm_to_io_writer<W: io::Write>(
    w: &mut W,
    bitmap: &[u8],
    width: usize,
    photometric: Photometric,
) -> io::Result<()> {
    let stride = width.div_ceil(8);
    let height = if stride > 0 { bitmap.len() / stride } else { 0 };
    writeln!(w, "P4")?;
    writeln!(w, "{} {}", width, height)?;
    if stride == 0 {
        return Ok(());
    }
    match photometric {
        // PBM uses 1 for black
        Photometric::WhiteIsZero => w.write_all(&bitmap[..height * stride])?,
        Photometric::BlackIsZero => {
            for row in bitmap[..height * stride].chunks_exact(stride) {
                let mut inverted: Vec<u8> = row.iter().map(|b| !b).collect();
                if width % 8 != 0 {
                    if let Some(last) = inverted.last_mut() {
                        *last &= 0xFF_u8 << (8 - width % 8);
                    }
                }
                w.write_all(&inverted)?;
            }
        }
    }
    Ok(())
}
