//! Types for writing SARC archives
//!

use binrw::{BinWrite, Endian};
use bon::Builder;
use std::io::{self, Cursor, Write};
use tracing::{debug, instrument, Level};

use crate::archive::ArchiveData;
use crate::error::{Error, Result};
use crate::hash::hash;
use crate::sniff::{self, DEFAULT_ALIGNMENT};
use crate::types::{
    align_up, SarcHeader, SfatHeader, SfatNode, SfntHeader, DEFAULT_HASH_KEY, FIXED_HEADER_SIZE,
};

/// Options for how the SARC file should be written
#[derive(Debug, Clone, Copy, Builder)]
pub struct SarcWriterOptions {
    /// Byte order of every integer in the archive
    #[builder(default = Endian::Little)]
    pub endian: Endian,

    /// Multiplier used when hashing file names
    #[builder(default = DEFAULT_HASH_KEY)]
    pub hash_key: u32,

    /// Alignment to report instead of the largest alignment required by the contents
    pub alignment: Option<u32>,
}

impl Default for SarcWriterOptions {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// A serialized archive together with the alignment it requires when embedded elsewhere
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackedArchive {
    pub alignment: u32,
    pub buffer: Vec<u8>,
}

/// Pack files into a little endian archive, optionally overriding the reported alignment
pub fn pack(data: &ArchiveData, alignment: Option<u32>) -> Result<PackedArchive> {
    pack_with_options(
        data,
        &SarcWriterOptions::builder()
            .maybe_alignment(alignment)
            .build(),
    )
}

/// Pack files into an archive
///
/// Files are written in the order of `data`. Every file but the last is padded to the alignment
/// its contents require.
#[instrument(skip_all, fields(files = data.len()), err)]
pub fn pack_with_options(data: &ArchiveData, options: &SarcWriterOptions) -> Result<PackedArchive> {
    let node_count = u16::try_from(data.len()).map_err(|_| Error::TooManyEntries(data.len()))?;

    let mut nodes = Vec::with_capacity(data.len());
    let mut names = Vec::new();
    let mut payload = Vec::new();
    let mut max_alignment = DEFAULT_ALIGNMENT;

    for (index, (name, file)) in data.iter().enumerate() {
        check_name(name)?;

        let attributes = u32::try_from(names.len())
            .ok()
            .and_then(SfatNode::attributes_for)
            .ok_or(Error::NameTableTooLarge)?;

        names.extend_from_slice(name.as_bytes());
        names.push(b'\0');
        names.resize(align_up(names.len(), 4), 0);

        let alignment = sniff::alignment(file);
        max_alignment = max_alignment.max(alignment);

        let data_start = to_u32(payload.len())?;
        payload.extend_from_slice(file);
        let data_end = to_u32(payload.len())?;

        if index + 1 < data.len() {
            payload.resize(align_up(payload.len(), alignment), 0);
        }

        nodes.push(SfatNode {
            name_hash: hash(name, options.hash_key),
            attributes,
            data_start,
            data_end,
        });
    }

    let data_start = FIXED_HEADER_SIZE + nodes.len() * SfatNode::SIZE + names.len();
    let file_size = data_start + payload.len();
    let alignment = options.alignment.unwrap_or(max_alignment);

    debug!(
        data_start,
        file_size,
        names = names.len(),
        alignment,
        "computed sarc layout"
    );

    let header = SarcHeader {
        file_size: to_u32(file_size)?,
        data_start: to_u32(data_start)?,
        ..Default::default()
    };
    let sfat = SfatHeader {
        node_count,
        hash_key: options.hash_key,
        ..Default::default()
    };

    let mut writer = Cursor::new(Vec::with_capacity(file_size));
    header.write_options(&mut writer, options.endian, ())?;
    sfat.write_options(&mut writer, options.endian, ())?;
    for node in &nodes {
        node.write_options(&mut writer, options.endian, ())?;
    }
    SfntHeader::default().write_options(&mut writer, options.endian, ())?;
    writer.write_all(&names)?;
    writer.write_all(&payload)?;

    Ok(PackedArchive {
        alignment,
        buffer: writer.into_inner(),
    })
}

fn check_name(name: &str) -> Result<()> {
    if name.contains('\0') {
        return Err(Error::InvalidName(name.to_owned()));
    }
    Ok(())
}

fn to_u32(value: usize) -> Result<u32> {
    u32::try_from(value).map_err(|_| Error::ArchiveTooLarge)
}

/// SARC archive generator
///
/// ```
/// # fn doit() -> nx_sarc::error::Result<()>
/// # {
/// use std::io::Write;
/// use nx_sarc::{SarcWriter, SarcWriterOptions};
///
/// let mut sarc = SarcWriter::new(SarcWriterOptions::default());
///
/// sarc.start_file("hello_world.txt")?;
/// sarc.write_all(b"Hello, World!")?;
///
/// let packed = sarc.finish()?;
/// assert_eq!(&packed.buffer[..4], b"SARC");
///
/// # Ok(())
/// # }
/// # doit().unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct SarcWriter {
    options: SarcWriterOptions,
    files: ArchiveData,
    current: Option<(String, Vec<u8>)>,
}

impl SarcWriter {
    /// Initializes the archive.
    ///
    /// Before writing to this object, the [`SarcWriter::start_file`] function should be called.
    pub fn new(options: SarcWriterOptions) -> SarcWriter {
        SarcWriter {
            options,
            files: ArchiveData::new(),
            current: None,
        }
    }

    /// Returns true if a file is currently open for writing.
    pub const fn is_writing_file(&self) -> bool {
        self.current.is_some()
    }

    /// Start a new file, finishing the previous one
    #[instrument(skip(self, name), err)]
    pub fn start_file(&mut self, name: impl ToString) -> Result<()> {
        let name = name.to_string();
        check_name(&name)?;

        self.finish_file()?;
        if self.files.contains(&name) {
            return Err(Error::DuplicateName(name));
        }

        self.current = Some((name, Vec::new()));
        Ok(())
    }

    fn finish_file(&mut self) -> Result<()> {
        if let Some((name, data)) = self.current.take() {
            self.files.add(name, data)?;
        }
        Ok(())
    }

    /// Finish the last file and lay out the archive
    #[instrument(skip(self), err)]
    pub fn finish(mut self) -> Result<PackedArchive> {
        self.finish_file()?;
        pack_with_options(&self.files, &self.options)
    }
}

impl Write for SarcWriter {
    #[instrument(skip_all, err, ret(level = Level::TRACE), fields(size = buf.len()))]
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let Some((_, data)) = self.current.as_mut() else {
            return Err(io::Error::new(
                io::ErrorKind::Other,
                "No file has been started",
            ));
        };
        data.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use binrw::Endian;
    use pretty_assertions::{assert_eq, assert_str_eq};
    use std::io::Write;
    use tracing_test::traced_test;

    use crate::archive::ArchiveData;
    use crate::error::{Error, Result};
    use crate::write::{pack, pack_with_options, SarcWriter, SarcWriterOptions};

    #[traced_test]
    #[test]
    fn sarc_empty_write() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            // SARC
            0x53, 0x41, 0x52, 0x43, 0x14, 0x00, 0xFF, 0xFE,
            0x28, 0x00, 0x00, 0x00,
            0x28, 0x00, 0x00, 0x00,
            0x00, 0x01, 0x00, 0x00,
            // SFAT
            0x53, 0x46, 0x41, 0x54, 0x0C, 0x00, 0x00, 0x00,
            0x65, 0x00, 0x00, 0x00,
            // SFNT
            0x53, 0x46, 0x4E, 0x54, 0x08, 0x00, 0x00, 0x00,
        ];

        let packed = pack(&ArchiveData::new(), None)?;
        assert_eq!(packed.alignment, 4);
        assert_str_eq!(
            format!("{:02X?}", packed.buffer),
            format!("{:02X?}", expected)
        );

        Ok(())
    }

    #[traced_test]
    #[test]
    fn sarc_single_entry_write() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            // SARC
            0x53, 0x41, 0x52, 0x43, 0x14, 0x00, 0xFF, 0xFE,
            0x3F, 0x00, 0x00, 0x00,
            0x3C, 0x00, 0x00, 0x00,
            0x00, 0x01, 0x00, 0x00,
            // SFAT
            0x53, 0x46, 0x41, 0x54, 0x0C, 0x00, 0x01, 0x00,
            0x65, 0x00, 0x00, 0x00,
            // Nodes
            0x41, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x01,
            0x00, 0x00, 0x00, 0x00,
            0x03, 0x00, 0x00, 0x00,
            // SFNT
            0x53, 0x46, 0x4E, 0x54, 0x08, 0x00, 0x00, 0x00,
            // Names
            0x41, 0x00, 0x00, 0x00,
            // Data
            0x01, 0x02, 0x03,
        ];

        let data = ArchiveData::from_iter([("A", vec![0x01, 0x02, 0x03])]);
        let packed = pack(&data, None)?;
        assert_eq!(packed.buffer.len(), 63);
        assert_str_eq!(
            format!("{:02X?}", packed.buffer),
            format!("{:02X?}", expected)
        );

        Ok(())
    }

    #[test]
    fn sarc_big_endian_write() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            // SARC
            0x53, 0x41, 0x52, 0x43, 0x00, 0x14, 0xFE, 0xFF,
            0x00, 0x00, 0x00, 0x3F,
            0x00, 0x00, 0x00, 0x3C,
            0x01, 0x00, 0x00, 0x00,
            // SFAT
            0x53, 0x46, 0x41, 0x54, 0x00, 0x0C, 0x00, 0x01,
            0x00, 0x00, 0x00, 0x65,
            // Nodes
            0x00, 0x00, 0x00, 0x41,
            0x01, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x03,
            // SFNT
            0x53, 0x46, 0x4E, 0x54, 0x00, 0x08, 0x00, 0x00,
            // Names
            0x41, 0x00, 0x00, 0x00,
            // Data
            0x01, 0x02, 0x03,
        ];

        let data = ArchiveData::from_iter([("A", vec![0x01, 0x02, 0x03])]);
        let options = SarcWriterOptions::builder().endian(Endian::Big).build();
        let packed = pack_with_options(&data, &options)?;
        assert_str_eq!(
            format!("{:02X?}", packed.buffer),
            format!("{:02X?}", expected)
        );

        Ok(())
    }

    #[test]
    fn sarc_pads_all_but_last_entry() -> Result<()> {
        #[rustfmt::skip]
        let expected = vec![
            // SARC
            0x53, 0x41, 0x52, 0x43, 0x14, 0x00, 0xFF, 0xFE,
            0x60, 0x00, 0x00, 0x00,
            0x54, 0x00, 0x00, 0x00,
            0x00, 0x01, 0x00, 0x00,
            // SFAT
            0x53, 0x46, 0x41, 0x54, 0x0C, 0x00, 0x02, 0x00,
            0x65, 0x00, 0x00, 0x00,
            // Nodes
            0xA6, 0x26, 0x00, 0x00,
            0x00, 0x00, 0x00, 0x01,
            0x00, 0x00, 0x00, 0x00,
            0x05, 0x00, 0x00, 0x00,

            0x38, 0x14, 0x14, 0x06,
            0x01, 0x00, 0x00, 0x01,
            0x08, 0x00, 0x00, 0x00,
            0x0C, 0x00, 0x00, 0x00,
            // SFNT
            0x53, 0x46, 0x4E, 0x54, 0x08, 0x00, 0x00, 0x00,
            // Names
            0x61, 0x61, 0x00, 0x00,
            0x62, 0x62, 0x62, 0x62, 0x00, 0x00, 0x00, 0x00,
            // Data
            0x41, 0x41, 0x4D, 0x50, 0x01, 0x00, 0x00, 0x00,
            0x41, 0x41, 0x4D, 0x50,
        ];

        let data = ArchiveData::from_iter([
            ("aa", b"AAMP\x01".to_vec()),
            ("bbbb", b"AAMP".to_vec()),
        ]);
        let packed = pack(&data, None)?;
        assert_eq!(packed.alignment, 8);
        assert_str_eq!(
            format!("{:02X?}", packed.buffer),
            format!("{:02X?}", expected)
        );

        Ok(())
    }

    #[test]
    fn alignment_is_largest_required() -> Result<()> {
        let data = ArchiveData::from_iter([
            ("a", b"AAMP".to_vec()),
            ("b", b"BNTX".to_vec()),
            ("c", vec![0x00]),
        ]);

        assert_eq!(pack(&data, None)?.alignment, 0x1000);
        assert_eq!(pack(&data, Some(0x20))?.alignment, 0x20);

        Ok(())
    }

    #[test]
    fn custom_hash_key() -> Result<()> {
        let data = ArchiveData::from_iter([("ab", vec![])]);
        let options = SarcWriterOptions::builder().hash_key(31).build();
        let packed = pack_with_options(&data, &options)?;

        assert_eq!(&packed.buffer[0x1C..0x20], &[31u8, 0x00, 0x00, 0x00]);
        assert_eq!(
            &packed.buffer[0x20..0x24],
            &(97u32 * 31 + 98).to_le_bytes()
        );

        Ok(())
    }

    #[test]
    fn too_many_entries() {
        let data = ArchiveData::from_iter((0..=u16::MAX as u32).map(|i| (i.to_string(), vec![])));

        assert!(matches!(
            pack(&data, None),
            Err(Error::TooManyEntries(65536))
        ));
    }

    #[traced_test]
    #[test]
    fn sarc_writer_matches_pack() -> Result<()> {
        let mut writer = SarcWriter::new(SarcWriterOptions::default());
        writer.start_file("hello.txt")?;
        writer.write_all(b"Hello")?;
        writer.write_all(b" World")?;
        writer.start_file("Test.byml")?;
        writer.write_all(b"YB")?;
        assert!(writer.is_writing_file());

        let data = ArchiveData::from_iter([
            ("hello.txt", b"Hello World".to_vec()),
            ("Test.byml", b"YB".to_vec()),
        ]);

        assert_eq!(writer.finish()?, pack(&data, None)?);

        Ok(())
    }

    #[test]
    fn sarc_writer_errors() -> Result<()> {
        let mut writer = SarcWriter::new(SarcWriterOptions::default());
        assert!(!writer.is_writing_file());
        assert!(writer.write(b"data").is_err());

        writer.start_file("a")?;
        writer.start_file("b")?;
        assert!(matches!(
            writer.start_file("a"),
            Err(Error::DuplicateName(name)) if name == "a"
        ));

        Ok(())
    }

    #[test]
    fn names_with_null_bytes() -> Result<()> {
        let data = ArchiveData::from_iter([("a\0b", vec![1u8]), ("c", vec![2u8])]);
        assert!(matches!(
            pack(&data, None),
            Err(Error::InvalidName(name)) if name == "a\0b"
        ));

        let data = ArchiveData::from_iter([("a\0x", vec![1u8]), ("a", vec![2u8])]);
        assert!(matches!(pack(&data, None), Err(Error::InvalidName(_))));

        let mut writer = SarcWriter::new(SarcWriterOptions::default());
        writer.start_file("a")?;
        writer.write_all(b"kept")?;
        assert!(matches!(
            writer.start_file("a\0b"),
            Err(Error::InvalidName(_))
        ));
        assert!(writer.is_writing_file());

        Ok(())
    }
}
