//! Unwrapping payloads from MCPK containers
//!

use binrw::BinRead;
use std::io::Cursor;
use tracing::{debug, instrument};
use zstd::bulk::Decompressor;
use zstd::zstd_safe::{DParameter, FrameFormat};

use crate::error::{Error, Result};
use crate::types::{McpkHeader, MAX_PAYLOAD_SIZE};

/// Whether `buffer` starts with the MCPK magic
pub fn is_compressed(buffer: &[u8]) -> bool {
    buffer.starts_with(McpkHeader::MAGIC)
}

/// Size of the payload declared by the container header, without decompressing it
pub fn decompressed_size(buffer: &[u8]) -> Result<usize> {
    declared_size(&read_header(buffer)?)
}

/// Decompress the payload of an MCPK container
///
/// The result is always exactly as long as the size declared in the header, which is the
/// original length rounded up to a multiple of 4096. The bytes past the original length are
/// zeroes.
#[instrument(skip_all, fields(size = buffer.len()), err)]
pub fn decompress(buffer: &[u8]) -> Result<Vec<u8>> {
    let header = read_header(buffer)?;
    let size = declared_size(&header)?;

    let mut decompressor = Decompressor::new().map_err(Error::Zstd)?;
    decompressor
        .set_parameter(DParameter::Format(FrameFormat::Magicless))
        .map_err(Error::Zstd)?;

    let mut output = vec![0u8; size];
    let written = decompressor
        .decompress_to_buffer(&buffer[McpkHeader::SIZE..], &mut output[..])
        .map_err(Error::Zstd)?;
    debug!(written, size, "decompressed payload");

    Ok(output)
}

fn read_header(buffer: &[u8]) -> Result<McpkHeader> {
    if buffer.len() < McpkHeader::SIZE {
        return Err(Error::MalformedContainer("buffer is shorter than the header"));
    }
    if !is_compressed(buffer) {
        return Err(Error::MalformedContainer("expected MCPK magic"));
    }

    Ok(McpkHeader::read(&mut Cursor::new(buffer))?)
}

fn declared_size(header: &McpkHeader) -> Result<usize> {
    usize::try_from(header.decompressed_size())
        .ok()
        .filter(|&size| size <= MAX_PAYLOAD_SIZE)
        .ok_or(Error::MalformedContainer(
            "declared size exceeds the largest payload",
        ))
}
