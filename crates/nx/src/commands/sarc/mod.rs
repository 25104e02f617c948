pub mod diff;
pub mod extract;
pub mod list;
pub mod pack;

use miette::Result;
use nx_sarc::SarcArchive;
use std::path::Path;
use tracing::info;

use super::read_input;

#[derive(clap::Subcommand)]
pub enum SarcCommands {
    /// Compare two SARC files
    Diff(diff::DiffArgs),
    /// Extract a SARC file into a directory
    Extract(extract::ExtractArgs),
    /// List the contents of a SARC file
    List(list::ListArgs),
    /// Pack a directory into a SARC file
    Pack(pack::PackArgs),
}

impl SarcCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            SarcCommands::Diff(diff) => diff.handle(),
            SarcCommands::Extract(extract) => extract.handle(),
            SarcCommands::List(list) => list.handle(),
            SarcCommands::Pack(pack) => pack.handle(),
        }
    }
}

/// Read an archive from disk, unwrapping it first if it is MCPK compressed
pub(crate) fn read_archive(path: &Path) -> Result<SarcArchive> {
    let buffer = read_input(path)?;
    let buffer = if nx_mcpk::is_compressed(&buffer) {
        info!("decompressing {}", path.display());
        nx_mcpk::decompress(&buffer)?
    } else {
        buffer
    };

    Ok(SarcArchive::new(&buffer)?)
}
