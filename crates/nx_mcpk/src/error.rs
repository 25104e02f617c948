//! Error types that can be emitted from this library

use miette::Diagnostic;
use thiserror::Error;

/// Error type for library
#[derive(Error, Diagnostic, Debug)]
pub enum Error {
    /// Transparent warpper for [`std::io::Error`]
    #[error(transparent)]
    IOError(#[from] std::io::Error),

    /// Transparent warpper for [`binrw::Error`]
    #[error(transparent)]
    BinRWError(#[from] binrw::Error),

    /// file is an invalid mcpk container
    #[error("file is an invalid mcpk container: {0}")]
    #[diagnostic(code(nx_mcpk::malformed))]
    MalformedContainer(&'static str),

    /// zstd failed to process the payload
    #[error("zstd failed to process the payload")]
    #[diagnostic(
        code(nx_mcpk::zstd),
        help("the frame may be corrupt or larger than the size declared in the header")
    )]
    Zstd(#[source] std::io::Error),

    /// payload of {0} bytes is too large
    #[error("payload of {0} bytes is too large for the size field")]
    PayloadTooLarge(usize),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
