//! # Fax strip tool
#![warn(missing_docs)]

use clap::{Parser, Subcommand};

use fax_strip::cli::{self, decode::DecodeOpts, encode::EncodeOpts};

#[derive(Parser)]
/// Decode and encode CCITT Group 3/4 compressed TIFF strips
struct Options {
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Decode a raw strip into an image
    Decode(DecodeOpts),
    /// Encode an image into a raw strip
    Encode(EncodeOpts),
}

fn main() -> color_eyre::Result<()> {
    let opt: Options = cli::init()?;
    match opt.command {
        Command::Decode(opt) => cli::decode::run(opt),
        Command::Encode(opt) => cli::encode::run(opt),
    }
}
