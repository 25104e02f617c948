//! Base types for structure of SARC file.

use binrw::{BinRead, BinWrite, Endian};

/// Value of the byte order mark in the archive's own byte order
pub const BYTE_ORDER_MARK: u16 = 0xFEFF;

/// Version written into every archive header
pub const SARC_VERSION: u16 = 0x0100;

/// Key used for hashing file names unless configured otherwise
pub const DEFAULT_HASH_KEY: u32 = 0x65;

/// Node attribute bit marking that the node owns a name table entry
pub const HAS_NAME_FLAG: u32 = 0x0100_0000;

/// SARC file header
///
/// Defines the header of the SARC file which always starts with "SARC". The byte order of every
/// following integer is given by the byte order mark.
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq)]
#[brw(magic = b"SARC")]
pub struct SarcHeader {
    /// The size of this header, always 20
    pub header_len: u16,

    /// Always `0xFEFF` once read with the right byte order
    pub byte_order_mark: u16,

    /// The size of the whole archive
    pub file_size: u32,

    /// The offset from the beginning of the file where the data region starts
    pub data_start: u32,

    /// Format version, `0x0100`
    pub version: u16,

    #[allow(dead_code)]
    pub reserved: u16,
}

impl SarcHeader {
    pub const MAGIC: &'static [u8; 4] = b"SARC";
    pub const SIZE: usize = 20;
}

impl Default for SarcHeader {
    fn default() -> Self {
        Self {
            header_len: Self::SIZE as u16,
            byte_order_mark: BYTE_ORDER_MARK,
            file_size: Default::default(),
            data_start: Default::default(),
            version: SARC_VERSION,
            reserved: Default::default(),
        }
    }
}

/// SFAT (file allocation table) header
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq)]
#[brw(magic = b"SFAT")]
pub struct SfatHeader {
    /// The size of this header, always 12
    pub header_len: u16,

    /// The number of nodes following this header
    pub node_count: u16,

    /// Multiplier used when hashing the file names
    pub hash_key: u32,
}

impl SfatHeader {
    pub const MAGIC: &'static [u8; 4] = b"SFAT";
    pub const SIZE: usize = 12;
}

impl Default for SfatHeader {
    fn default() -> Self {
        Self {
            header_len: Self::SIZE as u16,
            node_count: Default::default(),
            hash_key: DEFAULT_HASH_KEY,
        }
    }
}

/// SFAT node
///
/// Defines an entry in the SARC file
#[derive(BinRead, BinWrite, Debug, Default, Copy, Clone, PartialEq)]
pub struct SfatNode {
    /// Hash of the file name, see [`crate::hash::hash`]
    pub name_hash: u32,

    /// Has-name flag and the name table offset divided by 4
    pub attributes: u32,

    /// Start of the data, relative to the data region
    pub data_start: u32,

    /// End of the data, relative to the data region
    pub data_end: u32,
}

impl SfatNode {
    pub const SIZE: usize = 16;

    /// Build the attribute field for a name stored at `name_offset` in the name table.
    ///
    /// Returns `None` if the offset can't be represented in the 16 bit field.
    pub fn attributes_for(name_offset: u32) -> Option<u32> {
        let words = name_offset / 4;
        (words <= 0xFFFF).then_some(words | HAS_NAME_FLAG)
    }

    /// Whether this node has a name table entry
    pub fn has_name(&self) -> bool {
        self.attributes & HAS_NAME_FLAG != 0
    }

    /// Byte offset of this node's name within the name table
    pub fn name_offset(&self) -> usize {
        (self.attributes & 0xFFFF) as usize * 4
    }
}

/// SFNT (file name table) header
#[derive(BinRead, BinWrite, Debug, Copy, Clone, PartialEq)]
#[brw(magic = b"SFNT")]
pub struct SfntHeader {
    /// The size of this header, always 8
    pub header_len: u16,

    #[allow(dead_code)]
    pub reserved: u16,
}

impl SfntHeader {
    pub const MAGIC: &'static [u8; 4] = b"SFNT";
    pub const SIZE: usize = 8;
}

impl Default for SfntHeader {
    fn default() -> Self {
        Self {
            header_len: Self::SIZE as u16,
            reserved: Default::default(),
        }
    }
}

/// Size of the three fixed headers combined
pub const FIXED_HEADER_SIZE: usize = SarcHeader::SIZE + SfatHeader::SIZE + SfntHeader::SIZE;

/// Work out the byte order from the two raw bytes of the byte order mark
pub fn endian_from_bom(bom: [u8; 2]) -> Option<Endian> {
    match bom {
        [0xFF, 0xFE] => Some(Endian::Little),
        [0xFE, 0xFF] => Some(Endian::Big),
        _ => None,
    }
}

/// Round `value` up to the next multiple of `alignment`
pub(crate) fn align_up(value: usize, alignment: u32) -> usize {
    match alignment {
        0 | 1 => value,
        alignment => value.next_multiple_of(alignment as usize),
    }
}

#[cfg(test)]
mod test {
    use std::io::Cursor;

    use binrw::{BinRead, BinWrite, Endian};
    use pretty_assertions::assert_eq;

    use crate::error::Result;
    use crate::types::{
        align_up, endian_from_bom, SarcHeader, SfatHeader, SfatNode, SfntHeader, HAS_NAME_FLAG,
    };

    #[test]
    fn read_little_endian_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x53, 0x41, 0x52, 0x43,
            0x14, 0x00,
            0xFF, 0xFE,
            0x3F, 0x00, 0x00, 0x00,
            0x3C, 0x00, 0x00, 0x00,
            0x00, 0x01,
            0x00, 0x00,
        ]);

        let expected = SarcHeader {
            file_size: 63,
            data_start: 60,
            ..Default::default()
        };

        assert_eq!(SarcHeader::read_le(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn read_big_endian_header() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x53, 0x41, 0x52, 0x43,
            0x00, 0x14,
            0xFE, 0xFF,
            0x00, 0x00, 0x00, 0x3F,
            0x00, 0x00, 0x00, 0x3C,
            0x01, 0x00,
            0x00, 0x00,
        ]);

        let expected = SarcHeader {
            file_size: 63,
            data_start: 60,
            ..Default::default()
        };

        assert_eq!(SarcHeader::read_be(&mut input)?, expected);

        Ok(())
    }

    #[test]
    fn read_header_with_bad_magic() {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x53, 0x41, 0x52, 0x44,
            0x14, 0x00,
            0xFF, 0xFE,
            0x28, 0x00, 0x00, 0x00,
            0x28, 0x00, 0x00, 0x00,
            0x00, 0x01,
            0x00, 0x00,
        ]);

        assert!(SarcHeader::read_le(&mut input).is_err());
    }

    #[test]
    fn write_sfat_header() -> Result<()> {
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x53, 0x46, 0x41, 0x54,
            0x0C, 0x00,
            0x02, 0x00,
            0x65, 0x00, 0x00, 0x00,
        ];

        let header = SfatHeader {
            node_count: 2,
            ..Default::default()
        };

        let mut actual = Vec::new();
        header.write_le(&mut Cursor::new(&mut actual))?;

        assert_eq!(actual, expected);

        Ok(())
    }

    #[test]
    fn write_sfnt_header_big_endian() -> Result<()> {
        #[rustfmt::skip]
        let expected: Vec<u8> = vec![
            0x53, 0x46, 0x4E, 0x54,
            0x00, 0x08,
            0x00, 0x00,
        ];

        let mut actual = Vec::new();
        SfntHeader::default().write_options(&mut Cursor::new(&mut actual), Endian::Big, ())?;

        assert_eq!(actual, expected);

        Ok(())
    }

    #[test]
    fn read_node() -> Result<()> {
        #[rustfmt::skip]
        let mut input = Cursor::new(vec![
            0x41, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x01,
            0x00, 0x20, 0x00, 0x00,
            0x0B, 0x20, 0x00, 0x00,
        ]);

        let node = SfatNode::read_le(&mut input)?;
        assert_eq!(
            node,
            SfatNode {
                name_hash: 65,
                attributes: HAS_NAME_FLAG | 3,
                data_start: 0x2000,
                data_end: 0x200B,
            }
        );
        assert!(node.has_name());
        assert_eq!(node.name_offset(), 12);

        Ok(())
    }

    #[test]
    fn node_attributes() {
        assert_eq!(SfatNode::attributes_for(0), Some(0x0100_0000));
        assert_eq!(SfatNode::attributes_for(8), Some(0x0100_0002));
        assert_eq!(SfatNode::attributes_for(0x3FFFC), Some(0x0100_FFFF));
        assert_eq!(SfatNode::attributes_for(0x40000), None);
        assert!(!SfatNode::default().has_name());
    }

    #[test]
    fn byte_order_marks() {
        assert_eq!(endian_from_bom([0xFF, 0xFE]), Some(Endian::Little));
        assert_eq!(endian_from_bom([0xFE, 0xFF]), Some(Endian::Big));
        assert_eq!(endian_from_bom([0x00, 0x00]), None);
    }

    #[test]
    fn align_values() {
        assert_eq!(align_up(0, 4), 0);
        assert_eq!(align_up(3, 4), 4);
        assert_eq!(align_up(0x2001, 0x2000), 0x4000);
        assert_eq!(align_up(7, 6), 12);
        assert_eq!(align_up(7, 0), 7);
    }
}
