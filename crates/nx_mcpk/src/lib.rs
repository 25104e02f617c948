//! This library handles reading from and creating **MCPK** compression containers.
//!
//! # MCPK Container Format Documentation
//!
//! MCPK wraps a single zstd compressed payload, most commonly a model resource. Containers are
//! typically identified with the `.mc` extension appended to the name of the payload.
//!
//! ## File Structure
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: "MCPK"                                            |
//! | 0x0004         | Version                | 4 bytes: `01 01 00 00`                                     |
//! | 0x0008         | Flags                  | 4 bytes: Encoded size of the payload                       |
//! | 0x000C         | Frame                  | A zstd frame without its magic number                      |
//!
//! ### Flags
//!
//! The low 4 bits hold a shift and the bits from 5 upwards hold a count. The decompressed size
//! is `(flags >> 5) << (flags & 0xF)`. Writers always use a shift of 12, so the size is stored as
//! a number of 4096 byte pages and the exact length of the payload is lost.
//!
//! ### Frame
//!
//! The frame is written without a content size, checksum or dictionary id. Decompressing it into a
//! zeroed buffer of the declared size yields the payload followed by zero padding.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.mc`
//! - **Endianness**: Little-endian for all multi-byte integers
//!

pub mod compress;
pub mod decompress;
pub mod error;
pub mod types;

pub use compress::{compress, compress_with_options, CompressOptions};
pub use decompress::{decompress, decompressed_size, is_compressed};
