use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{
    io::Write,
    path::{Component, Path, PathBuf},
};
use tracing::info;

use super::read_archive;
use crate::commands::create_output;

#[derive(Args)]
pub struct ExtractArgs {
    /// An input SARC file, optionally MCPK compressed
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// A target directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl ExtractArgs {
    pub fn handle(&self) -> Result<()> {
        let sarc = read_archive(&self.file)?;

        for i in 0..sarc.len() {
            let file = sarc.by_index(i)?;

            let p = target_path(&self.directory, file.name())?;
            info!("writing {}", p.display());

            if let Some(parent) = p.parent() {
                std::fs::create_dir_all(parent)
                    .into_diagnostic()
                    .context(format!("creating {}", parent.display()))?;
            }

            let mut out = create_output(&p, self.overwrite)?;
            out.write_all(file.data())
                .into_diagnostic()
                .context(format!("writing {}", p.display()))?;
        }

        Ok(())
    }
}

/// Join an archived name onto `root`, refusing names that would land outside of it
fn target_path(root: &Path, name: &str) -> Result<PathBuf> {
    let relative = Path::new(name);
    let contained = !name.is_empty()
        && relative
            .components()
            .all(|c| matches!(c, Component::Normal(_)));

    if !contained {
        return Err(miette!(
            "refusing to extract {:?} outside of {}",
            name,
            root.display()
        ));
    }

    Ok(root.join(relative))
}
