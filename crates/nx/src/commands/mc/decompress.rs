use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use std::{io::Write, path::PathBuf};
use tracing::{info, warn};

use crate::commands::{create_output, read_input};

#[derive(Args)]
pub struct DecompressArgs {
    /// An input MCPK file
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// The target file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// Truncate the output to the original length, the container only stores it in pages
    #[arg(long, value_name = "BYTES")]
    length: Option<usize>,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl DecompressArgs {
    pub fn handle(&self) -> Result<()> {
        let buffer = read_input(&self.input)?;
        if !nx_mcpk::is_compressed(&buffer) {
            warn!("{} does not start with MCPK", self.input.display());
        }

        let mut payload = nx_mcpk::decompress(&buffer)
            .context(format!("decompressing {}", self.input.display()))?;
        info!("decompressed {} bytes", payload.len());

        if let Some(length) = self.length {
            if length > payload.len() {
                return Err(miette!(
                    "requested {} bytes but the container only holds {}",
                    length,
                    payload.len()
                ));
            }
            payload.truncate(length);
        }

        create_output(&self.output, self.overwrite)?
            .write_all(&payload)
            .into_diagnostic()
            .context(format!("writing {}", self.output.display()))
    }
}
