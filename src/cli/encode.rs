use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::{self, WrapErr};
use log::info;
use tiff_ccitt::encode_strip;

use super::{opt::Coding, raster::pack_image};

#[derive(Parser, Debug)]
/// Encode an image as a raw CCITT strip
pub struct EncodeOpts {
    /// The image to encode (e.g. *.PNG)
    pub file: PathBuf,
    #[clap(flatten)]
    pub coding: Coding,
    /// Where to store the strip
    #[clap(long, short = 'o')]
    pub out: Option<PathBuf>,
}

pub fn run(opt: EncodeOpts) -> eyre::Result<()> {
    let image = image::open(&opt.file)
        .wrap_err_with(|| format!("Failed to open image: `{}`", opt.file.display()))?
        .into_luma8();

    let options = opt.coding.options();
    let (bitmap, width, rows) = pack_image(&image, options.photometric);
    let strip = encode_strip(&bitmap, width, rows, options)?;

    let out_path = opt
        .out
        .unwrap_or_else(|| opt.file.with_extension(opt.coding.compression.to_string()));
    std::fs::write(&out_path, &strip)?;
    info!(
        "Saved {}x{} pixels as '{}' ({} bytes)",
        width,
        rows,
        out_path.display(),
        strip.len()
    );
    Ok(())
}
