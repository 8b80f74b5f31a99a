//! # Fax strip tool
//!
//! Command line helpers around the `tiff-ccitt` decoder.

pub mod cli;
