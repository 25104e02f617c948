//! Guessing the type and required alignment of an archived file from its magic.
//!
//! Both guesses are driven by ordered rule tables where the first matching rule wins. New
//! formats only need a new row, the reader and writer never change.

use byteorder::{BigEndian, ByteOrder, LittleEndian};

/// Alignment used for data that matches no known format
pub const DEFAULT_ALIGNMENT: u32 = 4;

/// Extension used for data that matches no known format
pub const DEFAULT_EXTENSION: &str = ".bin";

/// Describes where a magic has to appear for a rule to match
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matcher {
    /// Magic at the start of the data
    Prefix(&'static [u8]),

    /// Magic at a fixed offset from the start of the data
    At(usize, &'static [u8]),

    /// Magic at a fixed distance before the end of the data
    FromEnd(usize, &'static [u8]),
}

impl Matcher {
    /// Whether `data` carries this matcher's magic. Never reads out of bounds.
    pub fn matches(&self, data: &[u8]) -> bool {
        let (offset, magic) = match *self {
            Matcher::Prefix(magic) => (0, magic),
            Matcher::At(offset, magic) => (offset, magic),
            Matcher::FromEnd(distance, magic) => match data.len().checked_sub(distance) {
                Some(offset) => (offset, magic),
                None => return false,
            },
        };

        data.get(offset..)
            .is_some_and(|rest| rest.starts_with(magic))
    }
}

/// How the alignment of a matched file is determined
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alignment {
    /// A constant alignment
    Fixed(u32),

    /// Read from the `imag` footer of a FLIM texture
    FlimFooter,
}

impl Alignment {
    fn resolve(&self, data: &[u8]) -> u32 {
        match *self {
            Alignment::Fixed(alignment) => alignment,
            Alignment::FlimFooter => flim_alignment(data).unwrap_or(DEFAULT_ALIGNMENT),
        }
    }
}

/// Offset of the FLIM header counted back from the end of the file
const FLIM_HEADER_FROM_END: usize = 0x28;

/// Offset of the alignment field in the `imag` block counted back from the end of the file
const FLIM_ALIGNMENT_FROM_END: usize = 0x8;

fn flim_alignment(data: &[u8]) -> Option<u32> {
    let header = data.len().checked_sub(FLIM_HEADER_FROM_END)?;
    let field = data.len().checked_sub(FLIM_ALIGNMENT_FROM_END)?;

    let bom = data.get(header + 4..header + 6)?;
    let raw = data.get(field..field + 2)?;
    let alignment = match bom {
        [0xFE, 0xFF] => BigEndian::read_u16(raw),
        _ => LittleEndian::read_u16(raw),
    };

    (alignment != 0).then_some(alignment as u32)
}

/// Alignment rules, checked in order
pub const ALIGNMENT_RULES: &[(Matcher, Alignment)] = &[
    (Matcher::Prefix(b"SARC"), Alignment::Fixed(0x2000)),
    (Matcher::Prefix(b"Yaz"), Alignment::Fixed(0x80)),
    (Matcher::Prefix(b"YB"), Alignment::Fixed(0x80)),
    (Matcher::Prefix(b"BY"), Alignment::Fixed(0x80)),
    (Matcher::Prefix(b"FRES"), Alignment::Fixed(0x2000)),
    (Matcher::Prefix(b"Gfx2"), Alignment::Fixed(0x2000)),
    (Matcher::Prefix(b"AAHS"), Alignment::Fixed(0x2000)),
    (Matcher::Prefix(b"BAHS"), Alignment::Fixed(0x2000)),
    (Matcher::Prefix(b"EFTF"), Alignment::Fixed(0x2000)),
    (Matcher::Prefix(b"VFXB"), Alignment::Fixed(0x2000)),
    (Matcher::Prefix(b"SPBD"), Alignment::Fixed(0x2000)),
    (Matcher::Prefix(b"BNTX"), Alignment::Fixed(0x1000)),
    (Matcher::Prefix(b"BNSH"), Alignment::Fixed(0x1000)),
    (Matcher::Prefix(b"FSHA"), Alignment::Fixed(0x1000)),
    (Matcher::Prefix(b"FFNT"), Alignment::Fixed(0x2000)),
    (Matcher::Prefix(b"CFNT"), Alignment::Fixed(0x80)),
    // CSTM, FSTM, CWAV, FWAV
    (Matcher::At(1, b"STM"), Alignment::Fixed(0x20)),
    (Matcher::At(1, b"WAV"), Alignment::Fixed(0x20)),
    (Matcher::Prefix(b"FSTP"), Alignment::Fixed(0x20)),
    (Matcher::Prefix(b"CTPK"), Alignment::Fixed(0x10)),
    (Matcher::Prefix(b"CGFX"), Alignment::Fixed(0x80)),
    (Matcher::Prefix(b"AAMP"), Alignment::Fixed(8)),
    (Matcher::Prefix(b"MsgStdBn"), Alignment::Fixed(0x80)),
    (Matcher::Prefix(b"MsgPrjBn"), Alignment::Fixed(0x80)),
    (
        Matcher::FromEnd(FLIM_HEADER_FROM_END, b"FLIM"),
        Alignment::FlimFooter,
    ),
];

/// Extension rules, checked in order
pub const EXTENSION_RULES: &[(Matcher, &str)] = &[
    (Matcher::Prefix(b"SARC"), ".sarc"),
    (Matcher::Prefix(b"Yaz"), ".szs"),
    (Matcher::Prefix(b"YB"), ".byaml"),
    (Matcher::Prefix(b"BY"), ".byaml"),
    (Matcher::Prefix(b"FRES"), ".bfres"),
    (Matcher::Prefix(b"Gfx2"), ".gtx"),
    (Matcher::Prefix(b"FLYT"), ".bflyt"),
    (Matcher::Prefix(b"CLAN"), ".bclan"),
    (Matcher::Prefix(b"CLYT"), ".bclyt"),
    (Matcher::Prefix(b"FLIM"), ".bclim"),
    (Matcher::Prefix(b"FLAN"), ".bflan"),
    (Matcher::Prefix(b"FSEQ"), ".bfseq"),
    (Matcher::Prefix(b"VFXB"), ".pctl"),
    (Matcher::Prefix(b"AAHS"), ".sharc"),
    (Matcher::Prefix(b"BAHS"), ".sharcb"),
    (Matcher::Prefix(b"BNTX"), ".bntx"),
    (Matcher::Prefix(b"BNSH"), ".bnsh"),
    (Matcher::Prefix(b"FSHA"), ".bfsha"),
    (Matcher::Prefix(b"FFNT"), ".bffnt"),
    (Matcher::Prefix(b"CFNT"), ".bcfnt"),
    (Matcher::Prefix(b"CSTM"), ".bcstm"),
    (Matcher::Prefix(b"FSTM"), ".bfstm"),
    (Matcher::Prefix(b"STM"), ".bfsha"),
    (Matcher::Prefix(b"CWAV"), ".bcwav"),
    (Matcher::Prefix(b"FWAV"), ".bfwav"),
    (Matcher::Prefix(b"CTPK"), ".ctpk"),
    (Matcher::Prefix(b"CGFX"), ".bcres"),
    (Matcher::Prefix(b"AAMP"), ".aamp"),
    (Matcher::Prefix(b"MsgStdBn"), ".msbt"),
    (Matcher::Prefix(b"MsgPrjBn"), ".msbp"),
    (Matcher::FromEnd(FLIM_HEADER_FROM_END, b"FLIM"), ".bflim"),
];

/// The guessed type of a file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileType {
    /// Conventional file extension, including the leading dot
    pub extension: &'static str,

    /// Alignment the file's data needs inside an archive
    pub alignment: u32,
}

/// Guess both the extension and the alignment of `data`
pub fn sniff(data: &[u8]) -> FileType {
    FileType {
        extension: extension(data),
        alignment: alignment(data),
    }
}

/// Guess the alignment `data` needs inside an archive, [`DEFAULT_ALIGNMENT`] if unknown
pub fn alignment(data: &[u8]) -> u32 {
    ALIGNMENT_RULES
        .iter()
        .find(|(matcher, _)| matcher.matches(data))
        .map_or(DEFAULT_ALIGNMENT, |(_, alignment)| alignment.resolve(data))
}

/// Guess the file extension of `data`, [`DEFAULT_EXTENSION`] if unknown
pub fn extension(data: &[u8]) -> &'static str {
    EXTENSION_RULES
        .iter()
        .find(|(matcher, _)| matcher.matches(data))
        .map_or(DEFAULT_EXTENSION, |&(_, extension)| extension)
}
