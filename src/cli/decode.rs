use std::{fs::File, io::BufWriter, path::PathBuf};

use clap::Parser;
use color_eyre::eyre::{self, WrapErr};
use image::ImageFormat;
use log::{info, warn};
use tiff_ccitt::{ascii_art, pbm_to_io_writer, StripDecoder, StripEnd, UNICODE};

use super::{
    opt::{Coding, Format},
    raster::to_image,
};

#[derive(Parser, Debug)]
/// Decode a raw CCITT strip
pub struct DecodeOpts {
    /// The compressed strip (e.g. the bytes of one TIFF strip)
    pub file: PathBuf,
    /// Width of a row in pixels
    #[clap(long, short = 'W')]
    pub width: usize,
    /// Number of rows in the strip
    #[clap(long, short = 'R')]
    pub rows: usize,
    #[clap(flatten)]
    pub coding: Coding,
    /// Format of the output. Valid choices are:
    ///
    /// "pbm", "png" and "ascii"
    #[clap(default_value_t, long, short = 'F')]
    pub format: Format,
    /// Where to store the output
    #[clap(long, short = 'o')]
    pub out: Option<PathBuf>,
}

pub fn run(opt: DecodeOpts) -> eyre::Result<()> {
    let buffer = std::fs::read(&opt.file)
        .wrap_err_with(|| format!("Failed to open file: `{}`", opt.file.display()))?;

    let options = opt.coding.options();
    let decoder = StripDecoder::new(opt.width, options);
    let mut bitmap = vec![0; decoder.stride() * opt.rows];
    let summary = decoder
        .decode(buffer.iter(), buffer.len(), opt.rows, &mut bitmap)
        .wrap_err("Failed to decode strip")?;

    info!(
        "Decoded {} rows from {} of {} bytes",
        summary.rows_decoded,
        summary.bytes_consumed,
        buffer.len()
    );
    if summary.end != StripEnd::RowCount {
        warn!("Strip ended early ({:?})", summary.end);
    }

    match opt.format {
        Format::Ascii => {
            let mut out = String::new();
            ascii_art(&mut out, UNICODE, &bitmap, opt.width, options.photometric)?;
            print!("{}", out);
        }
        Format::Pbm => {
            let out_path = opt.out.unwrap_or_else(|| opt.file.with_extension("pbm"));
            let file = File::create(&out_path)?;
            let mut writer = BufWriter::new(file);
            pbm_to_io_writer(&mut writer, &bitmap, opt.width, options.photometric)?;
            info!("Saved image as '{}'", out_path.display());
        }
        Format::Png => {
            let out_path = opt.out.unwrap_or_else(|| opt.file.with_extension("png"));
            let image = to_image(&bitmap, opt.width, options.photometric)?;
            image.save_with_format(&out_path, ImageFormat::Png)?;
            info!("Saved image as '{}'", out_path.display());
        }
    }
    Ok(())
}
