//! This library handles reading from and creating **SARC** archives used by Nintendo titles.
//!
//! # SARC Archive Format Documentation
//!
//! SARC is a flat archive that bundles many assets of a game into a single file. Archives are
//! usually identified with the `.sarc` extension, or with an extension that describes their role
//! (`.pack`, `.bars`, `.szs` once compressed).
//!
//! ## File Structure
//!
//! A SARC file consists of three fixed headers, a node table, a name table and the data region.
//! All integers use the byte order given by the byte order mark.
//!
//! | Offset (bytes) | Field                  | Description                                                |
//! |----------------|------------------------|------------------------------------------------------------|
//! | 0x0000         | Magic number           | 4 bytes: "SARC"                                            |
//! | 0x0004         | Header Length          | 2 bytes: Always 0x14                                       |
//! | 0x0006         | Byte Order Mark        | 2 bytes: `FF FE` for little endian, `FE FF` for big endian |
//! | 0x0008         | File Size              | 4 bytes: Size of the whole archive                         |
//! | 0x000C         | Data Start             | 4 bytes: Offset to the data region                         |
//! | 0x0010         | Version                | 2 bytes: Always 0x0100                                     |
//! | 0x0012         | Reserved               | 2 bytes                                                    |
//! | 0x0014         | Magic number           | 4 bytes: "SFAT"                                            |
//! | 0x0018         | Header Length          | 2 bytes: Always 0x0C                                       |
//! | 0x001A         | Node Count             | 2 bytes: Number of files in the archive                    |
//! | 0x001C         | Hash Key               | 4 bytes: Name hash multiplier, usually 0x65                |
//!
//! ### Node Table
//!
//! Directly after the SFAT header follows one 16 byte node per file, in archive order.
//!
//! | Offset (bytes) | Field                  | Description                                             |
//! |----------------|------------------------|---------------------------------------------------------|
//! | 0x0000         | Name Hash              | 4 bytes: Hash of the file name                          |
//! | 0x0004         | Attributes             | 4 bytes: 0x01000000 and the name offset divided by 4    |
//! | 0x0008         | Data Start             | 4 bytes: Start of the data, relative to the data region |
//! | 0x000C         | Data End               | 4 bytes: End of the data, relative to the data region   |
//!
//! - **Name Hash**: see [`hash()`]. Hashes are written for other tools, this crate looks files up
//!   by name.
//! - **Attributes**: a name table offset is only present when bit 24 is set.
//!
//! ### Name Table
//!
//! After the node table follows an 8 byte SFNT header ("SFNT", length 0x08, 2 reserved bytes) and
//! the file names. Every name is stored as UTF-8 with a null terminator, padded with zeroes to a
//! multiple of 4 bytes.
//!
//! ### Data Region
//!
//! The file contents start at **Data Start**. Each file is padded to the alignment its format
//! requires (see [`sniff()`]), except for the last file, which is never padded.
//!
//! ## Additional Information
//!
//! - **File Extension**: `.sarc`
//! - **Endianness**: Little-endian on Switch, big-endian on Wii U
//! - **Compression**: None, archives are commonly wrapped by an outer compression format
//!

pub mod archive;
pub mod error;
pub mod hash;
pub mod read;
pub mod sniff;
pub mod types;
pub mod write;

pub use archive::ArchiveData;
pub use binrw::Endian;
pub use hash::hash;
pub use read::{unpack, SarcArchive, SarcFile};
pub use sniff::{sniff, FileType};
pub use write::{pack, pack_with_options, PackedArchive, SarcWriter, SarcWriterOptions};
