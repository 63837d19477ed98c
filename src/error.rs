use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::pixel_format::PixelFormat;

/// Result type alias for conversion operations.
pub type Result<T> = std::result::Result<T, ConvertError>;

/// Errors raised while planning or running a conversion.
#[derive(Error, Debug)]
pub enum ConvertError {
    #[error("output color space is undefined")]
    UndefinedDestinationFormat,

    #[error("input color space is undefined")]
    UndefinedSourceFormat,

    #[error("cannot open input {}: {source}", path.display())]
    InputUnreadable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot create output {}: {source}", path.display())]
    OutputUnwritable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("input ended at pixel {pixel} of {expected}")]
    TruncatedInput { pixel: u64, expected: u64 },

    #[error("unsupported conversion: {from} -> {to}")]
    UnsupportedPair { from: PixelFormat, to: PixelFormat },

    #[error(
        "image resolutions do not match: input {}x{}, output {}x{}",
        input.0,
        input.1,
        output.0,
        output.1
    )]
    DimensionMismatch {
        input: (u32, u32),
        output: (u32, u32),
    },

    #[error("image has no pixels: {width}x{height}")]
    EmptyImage { width: u32, height: u32 },

    #[error("{0} file name is not specified")]
    MissingPath(&'static str),

    #[error("interrupted at pixel {pixel}")]
    Interrupted { pixel: u64 },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}
