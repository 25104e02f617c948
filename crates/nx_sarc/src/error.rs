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

    /// Transparent warpper for [`std::string::FromUtf8Error`]
    #[error(transparent)]
    Utf8Error(#[from] std::string::FromUtf8Error),

    /// file is an invalid sarc archive
    #[error("file is an invalid sarc archive: {0}")]
    #[diagnostic(code(nx_sarc::malformed))]
    MalformedContainer(#[from] MalformedContainerError),

    /// node {0} has no name table entry
    #[error("node {0} has no name table entry")]
    #[diagnostic(
        code(nx_sarc::missing_name),
        help("hash-only archives are not supported")
    )]
    MissingNameEntry(usize),

    /// duplicate file name {0}
    #[error("duplicate file name {0:?}")]
    DuplicateName(String),

    /// file name {0} cannot be stored in a name table
    #[error("file name {0:?} cannot be stored in a name table")]
    #[diagnostic(
        code(nx_sarc::invalid_name),
        help("names are null terminated, remove the null byte from the name")
    )]
    InvalidName(String),

    /// unable to find requested file
    #[error("unable to find requested file")]
    FileNotFound(#[from] FileNotFoundError),

    /// {0} entries do not fit in a node table
    #[error("{0} entries do not fit in a node table")]
    #[diagnostic(help("a sarc archive holds at most 65535 entries"))]
    TooManyEntries(usize),

    /// name table offset exceeds the 16 bit node attribute field
    #[error("name table offset exceeds the 16 bit node attribute field")]
    NameTableTooLarge,

    /// archive exceeds the 32 bit size limit
    #[error("archive exceeds the 32 bit size limit")]
    ArchiveTooLarge,
}

/// Error type to provide further information when an archive fails structural validation
#[derive(Error, Diagnostic, Debug, PartialEq, Eq)]
pub enum MalformedContainerError {
    /// expected {section} magic
    #[error("expected {section} magic")]
    BadMagic { section: &'static str },

    /// unknown byte order mark
    #[error("unknown byte order mark {0:02X?}")]
    ByteOrderMark([u8; 2]),

    /// buffer ends inside the {section} section
    #[error("buffer ends inside the {section} section")]
    Truncated { section: &'static str },

    /// data start lies outside of the archive
    #[error("data start {0:#x} lies outside of the archive")]
    DataStart(u32),

    /// name of node {index} lies outside of the name table
    #[error("name of node {index} lies outside of the name table")]
    NameOutOfBounds { index: usize },

    /// data of node {index} lies outside of the data region
    #[error("data of node {index} lies outside of the data region")]
    DataOutOfBounds { index: usize },
}

/// Error type to provide further information when a file has not been found
#[derive(Error, Diagnostic, Debug)]
#[error("unable to find requested file")]
pub enum FileNotFoundError {
    /// at index {0}
    #[error("at index {0}")]
    Index(usize),

    /// by name {0}
    #[error("by name {0}")]
    Name(String),
}

/// Generic result type with crate's Error as its error variant
pub type Result<T> = core::result::Result<T, Error>;
