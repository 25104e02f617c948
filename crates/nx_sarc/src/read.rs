//! Types for reading SARC archives
//!

use binrw::{BinRead, Endian};
use std::io::Cursor;
use tracing::{debug, instrument, warn};

use crate::{
    archive::ArchiveData,
    error::{Error, FileNotFoundError, MalformedContainerError, Result},
    sniff::{self, FileType},
    types::{endian_from_bom, SarcHeader, SfatHeader, SfatNode, SfntHeader},
};

/// Node metadata of a SARC file entry
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SarcFileData {
    /// Hash of the file name as stored in the node
    pub name_hash: u32,
    /// Start of the data relative to the data region
    pub data_start: u32,
    /// End of the data relative to the data region
    pub data_end: u32,
}

/// A borrowed entry of a [`SarcArchive`]
#[derive(Debug, Clone, Copy)]
pub struct SarcFile<'a> {
    name: &'a str,
    data: &'a [u8],
    meta: &'a SarcFileData,
}

impl<'a> SarcFile<'a> {
    /// Get the name of the file
    ///
    /// # Warnings
    ///
    /// It is dangerous to use this name directly when extracting an archive.
    /// It may contain an absolute path (`/etc/shadow`), or break out of the
    /// current directory (`../runtime`).
    pub fn name(&self) -> &'a str {
        self.name
    }

    /// Get the contents of the file
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Get the size of the file, in bytes
    pub fn size(&self) -> usize {
        self.data.len()
    }

    /// Get the name hash stored in the node table
    pub fn name_hash(&self) -> u32 {
        self.meta.name_hash
    }

    /// Get the starting offset of the data, relative to the data region
    pub fn data_start(&self) -> u32 {
        self.meta.data_start
    }

    /// Get the ending offset of the data, relative to the data region
    pub fn data_end(&self) -> u32 {
        self.meta.data_end
    }

    /// Guess the type of the file from its contents
    pub fn file_type(&self) -> FileType {
        sniff::sniff(self.data)
    }
}

/// SARC archive reader
///
/// The whole archive is parsed up front, files are kept in node table order.
///
/// ```no_run
/// fn list_sarc_contents(buffer: &[u8]) -> nx_sarc::error::Result<()> {
///     let sarc = nx_sarc::SarcArchive::new(buffer)?;
///
///     for i in 0..sarc.len() {
///         let file = sarc.by_index(i)?;
///         println!("Filename: {} ({} bytes)", file.name(), file.size());
///     }
///
///     Ok(())
/// }
/// ```
#[derive(Debug, Clone)]
pub struct SarcArchive {
    endian: Endian,
    hash_key: u32,
    files: ArchiveData,
    nodes: Vec<SarcFileData>,
}

impl SarcArchive {
    /// Parse a SARC archive from a buffer
    #[instrument(skip_all, fields(size = buffer.len()), err)]
    pub fn new(buffer: &[u8]) -> Result<SarcArchive> {
        let endian = detect_endian(buffer)?;
        let mut cursor = Cursor::new(buffer);

        let header: SarcHeader =
            read_section(&mut cursor, endian, "SARC", Some(SarcHeader::MAGIC), SarcHeader::SIZE)?;
        cursor.set_position(header.header_len as u64);

        let start = cursor.position();
        let sfat: SfatHeader =
            read_section(&mut cursor, endian, "SFAT", Some(SfatHeader::MAGIC), SfatHeader::SIZE)?;
        cursor.set_position(start + sfat.header_len as u64);

        let nodes = (0..sfat.node_count)
            .map(|_| read_section::<SfatNode>(&mut cursor, endian, "SFAT", None, SfatNode::SIZE))
            .collect::<Result<Vec<_>>>()?;

        let start = cursor.position();
        let sfnt: SfntHeader =
            read_section(&mut cursor, endian, "SFNT", Some(SfntHeader::MAGIC), SfntHeader::SIZE)?;
        cursor.set_position(start + sfnt.header_len as u64);

        let names_start = cursor.position() as usize;
        let data_start = header.data_start as usize;
        if data_start < names_start || data_start > buffer.len() {
            return Err(MalformedContainerError::DataStart(header.data_start).into());
        }

        debug!(
            ?endian,
            nodes = sfat.node_count,
            hash_key = sfat.hash_key,
            data_start,
            "parsed sarc tables"
        );

        let names = &buffer[names_start..data_start];
        let payload = &buffer[data_start..];

        let mut files = ArchiveData::with_capacity(nodes.len());
        for (index, node) in nodes.iter().enumerate() {
            if !node.has_name() {
                return Err(Error::MissingNameEntry(index));
            }

            let name = read_name(names, node.name_offset())
                .ok_or(MalformedContainerError::NameOutOfBounds { index })?;
            let name = String::from_utf8(name.to_vec())?;
            if name.trim().is_empty() {
                warn!(index, "node references an empty file name");
            }

            let data = payload
                .get(node.data_start as usize..node.data_end as usize)
                .ok_or(MalformedContainerError::DataOutOfBounds { index })?;

            files.add(name, data.to_vec())?;
        }

        Ok(SarcArchive {
            endian,
            hash_key: sfat.hash_key,
            files,
            nodes: nodes
                .iter()
                .map(|node| SarcFileData {
                    name_hash: node.name_hash,
                    data_start: node.data_start,
                    data_end: node.data_end,
                })
                .collect(),
        })
    }

    /// Number of files contained in this archive
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether this archive contains no files
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Byte order the archive was stored in
    pub fn endian(&self) -> Endian {
        self.endian
    }

    /// Multiplier the archive's name hashes were computed with
    pub fn hash_key(&self) -> u32 {
        self.hash_key
    }

    /// Returns an iterator over all the file names in this archive, in node table order
    pub fn file_names(&self) -> impl Iterator<Item = &str> {
        self.files.names()
    }

    /// Get the index of a file entry by name, if it's present.
    #[inline(always)]
    pub fn index_for_name(&self, name: &str) -> Option<usize> {
        self.files.index_of(name)
    }

    /// Get the name of a file entry, if it's present.
    #[inline(always)]
    pub fn name_for_index(&self, index: usize) -> Option<&str> {
        self.files.get_index(index).map(|(name, _)| name)
    }

    /// Search for a file entry by name
    pub fn by_name(&self, name: &str) -> Result<SarcFile<'_>> {
        let Some(index) = self.files.index_of(name) else {
            return Err(Error::FileNotFound(FileNotFoundError::Name(
                name.to_owned(),
            )));
        };
        self.by_index(index)
    }

    /// Get a contained file by index
    pub fn by_index(&self, file_number: usize) -> Result<SarcFile<'_>> {
        let (name, data) = self
            .files
            .get_index(file_number)
            .ok_or(Error::FileNotFound(FileNotFoundError::Index(file_number)))?;

        Ok(SarcFile {
            name,
            data,
            meta: &self.nodes[file_number],
        })
    }

    /// Borrow the parsed files
    pub fn data(&self) -> &ArchiveData {
        &self.files
    }

    /// Unwrap and return the parsed files
    pub fn into_data(self) -> ArchiveData {
        self.files
    }
}

/// Parse a SARC archive into its files, in node table order
pub fn unpack(buffer: &[u8]) -> Result<ArchiveData> {
    SarcArchive::new(buffer).map(SarcArchive::into_data)
}

fn detect_endian(buffer: &[u8]) -> Result<Endian> {
    let header = buffer
        .get(..SarcHeader::SIZE)
        .ok_or(MalformedContainerError::Truncated { section: "SARC" })?;

    if !header.starts_with(SarcHeader::MAGIC) {
        return Err(MalformedContainerError::BadMagic { section: "SARC" }.into());
    }

    let bom = [header[6], header[7]];
    endian_from_bom(bom).ok_or_else(|| MalformedContainerError::ByteOrderMark(bom).into())
}

fn read_section<T>(
    cursor: &mut Cursor<&[u8]>,
    endian: Endian,
    section: &'static str,
    magic: Option<&[u8; 4]>,
    size: usize,
) -> Result<T>
where
    T: for<'a> BinRead<Args<'a> = ()>,
{
    let start = cursor.position() as usize;
    let bytes = cursor
        .get_ref()
        .get(start..start.saturating_add(size))
        .ok_or(MalformedContainerError::Truncated { section })?;

    if magic.is_some_and(|magic| !bytes.starts_with(magic)) {
        return Err(MalformedContainerError::BadMagic { section }.into());
    }

    Ok(T::read_options(cursor, endian, ())?)
}

fn read_name(names: &[u8], offset: usize) -> Option<&[u8]> {
    let rest = names.get(offset..)?;
    let end = rest.iter().position(|&b| b == b'\0')?;
    Some(&rest[..end])
}
