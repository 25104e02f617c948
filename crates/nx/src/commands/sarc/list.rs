use clap::Args;
use miette::Result;
use nx_sarc::SarcArchive;
use std::path::PathBuf;

use super::read_archive;

#[derive(Args)]
pub struct ListArgs {
    /// An input SARC file, optionally MCPK compressed
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,
}

impl ListArgs {
    pub fn handle(&self) -> Result<()> {
        let sarc = read_archive(&self.file)?;

        for line in listing(&sarc)? {
            println!("{}", line);
        }

        Ok(())
    }
}

fn listing(sarc: &SarcArchive) -> Result<Vec<String>> {
    (0..sarc.len())
        .map(|i| -> Result<String> {
            let file = sarc.by_index(i)?;
            let file_type = file.file_type();
            Ok(format!(
                "{:>10} {:>8} {:<8} {}",
                file.size(),
                format!("{:#x}", file_type.alignment),
                file_type.extension,
                file.name()
            ))
        })
        .collect()
}
