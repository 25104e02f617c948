pub mod mc;
pub mod sarc;

use miette::{Context, IntoDiagnostic, Result};
use std::{fs::File, path::Path};

#[derive(clap::Subcommand)]
pub enum Commands {
    /// Handle SARC archives
    Sarc {
        #[command(subcommand)]
        command: sarc::SarcCommands,
    },
    /// Handle MCPK compression containers
    Mc {
        #[command(subcommand)]
        command: mc::McCommands,
    },
}

impl Commands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            Commands::Sarc { command } => command.handle(),
            Commands::Mc { command } => command.handle(),
        }
    }
}

pub(crate) fn read_input(path: &Path) -> Result<Vec<u8>> {
    std::fs::read(path)
        .into_diagnostic()
        .context(format!("path: {}", path.display()))
}

pub(crate) fn create_output(path: &Path, overwrite: bool) -> Result<File> {
    if overwrite {
        File::create(path)
    } else {
        File::create_new(path)
    }
    .into_diagnostic()
    .context(format!("creating {}", path.display()))
}
