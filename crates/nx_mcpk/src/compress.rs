//! Wrapping payloads into MCPK containers
//!

use binrw::BinWrite;
use bon::Builder;
use std::io::{Cursor, Write};
use tracing::{debug, instrument};
use zstd::bulk::Compressor;
use zstd::zstd_safe::{CParameter, FrameFormat};

use crate::error::{Error, Result};
use crate::types::McpkHeader;

/// zstd level used unless configured otherwise
pub const DEFAULT_LEVEL: i32 = 20;

/// Options for how the payload should be compressed
#[derive(Debug, Clone, Copy, Builder)]
pub struct CompressOptions {
    /// The zstd compression level
    #[builder(default = DEFAULT_LEVEL)]
    pub level: i32,

    /// Whether zstd searches for long distance matches
    #[builder(default = true)]
    pub long_distance_matching: bool,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Compress `buffer` into an MCPK container with the default options
///
/// ```
/// # fn doit() -> nx_mcpk::error::Result<()>
/// # {
/// let container = nx_mcpk::compress(b"Hello, World!")?;
/// assert!(nx_mcpk::is_compressed(&container));
///
/// // Only the size rounded up to the next 4096 bytes is stored
/// let payload = nx_mcpk::decompress(&container)?;
/// assert_eq!(payload.len(), 4096);
/// assert_eq!(&payload[..13], b"Hello, World!");
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
pub fn compress(buffer: &[u8]) -> Result<Vec<u8>> {
    compress_with_options(buffer, &CompressOptions::default())
}

/// Compress `buffer` into an MCPK container
///
/// The header only keeps the length rounded up to a multiple of 4096, callers that need the
/// exact length back have to store it themselves.
#[instrument(skip(buffer), fields(size = buffer.len()), err)]
pub fn compress_with_options(buffer: &[u8], options: &CompressOptions) -> Result<Vec<u8>> {
    let header = McpkHeader::for_len(buffer.len())?;

    let mut compressor = Compressor::new(options.level).map_err(Error::Zstd)?;
    for parameter in [
        CParameter::Format(FrameFormat::Magicless),
        CParameter::ContentSizeFlag(false),
        CParameter::ChecksumFlag(false),
        CParameter::DictIdFlag(false),
        CParameter::EnableLongDistanceMatching(options.long_distance_matching),
    ] {
        compressor.set_parameter(parameter).map_err(Error::Zstd)?;
    }

    let frame = compressor.compress(buffer).map_err(Error::Zstd)?;
    debug!(flags = header.flags, frame = frame.len(), "compressed payload");

    let mut writer = Cursor::new(Vec::with_capacity(McpkHeader::SIZE + frame.len()));
    header.write(&mut writer)?;
    writer.write_all(&frame)?;

    Ok(writer.into_inner())
}
