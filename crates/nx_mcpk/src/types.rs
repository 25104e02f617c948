//! Base types for structure of MCPK file.

use binrw::{BinRead, BinWrite};

use crate::error::{Error, Result};

/// Granularity of the size stored in the header
pub const PAGE_SIZE: usize = 0x1000;

/// Largest payload whose rounded size still fits the 32 bit size computation
pub const MAX_PAYLOAD_SIZE: usize = u32::MAX as usize - (PAGE_SIZE - 1);

/// Shift applied to the page count when decoding the size, stored in the low bits of the flags
const PAGE_SHIFT: u32 = 12;

/// MCPK file header
///
/// Always little endian. The zstd frame follows directly after it.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq, Eq)]
#[brw(little, magic = b"MCPK")]
pub struct McpkHeader {
    /// Format version, `1.1.0.0`
    pub version: [u8; 4],

    /// Page count shifted left by 5, plus the shift that turns pages into bytes
    pub flags: u32,
}

impl McpkHeader {
    pub const MAGIC: &'static [u8; 4] = b"MCPK";
    pub const SIZE: usize = 12;
    pub const VERSION: [u8; 4] = [1, 1, 0, 0];

    /// Build a header for a payload of `len` bytes.
    ///
    /// The length is rounded up to the next page, the exact length is lost.
    pub fn for_len(len: usize) -> Result<Self> {
        if len > MAX_PAYLOAD_SIZE {
            return Err(Error::PayloadTooLarge(len));
        }

        let pages = (len.next_multiple_of(PAGE_SIZE) >> PAGE_SHIFT) as u32;
        Ok(Self {
            version: Self::VERSION,
            flags: (pages << 5) + PAGE_SHIFT,
        })
    }

    /// Size of the decompressed payload as declared by the flags
    pub fn decompressed_size(&self) -> u64 {
        ((self.flags >> 5) as u64) << (self.flags & 0xF)
    }
}
