use clap::Args;
use miette::{Context, IntoDiagnostic, Result};
use nx_mcpk::{compress_with_options, CompressOptions};
use std::{io::Write, path::PathBuf};
use tracing::info;

use crate::commands::{create_output, read_input};

#[derive(Args)]
pub struct CompressArgs {
    /// The file to compress
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,

    /// A target MCPK file
    #[arg(short, long, value_name = "FILE")]
    output: PathBuf,

    /// zstd compression level
    #[arg(long, default_value_t = nx_mcpk::compress::DEFAULT_LEVEL)]
    level: i32,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,
}

impl CompressArgs {
    pub fn handle(&self) -> Result<()> {
        let buffer = read_input(&self.input)?;

        let container = compress_with_options(
            &buffer,
            &CompressOptions::builder().level(self.level).build(),
        )
        .context(format!("compressing {}", self.input.display()))?;

        info!(
            "compressed {} bytes into {} bytes",
            buffer.len(),
            container.len()
        );

        create_output(&self.output, self.overwrite)?
            .write_all(&container)
            .into_diagnostic()
            .context(format!("writing {}", self.output.display()))
    }
}

#[cfg(test)]
mod test {
    use super::CompressArgs;

    #[test]
    fn compresses_file() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("data.bin");
        let output = dir.path().join("data.bin.mc");
        std::fs::write(&input, b"Hello, World!").unwrap();

        let args = CompressArgs {
            input,
            output: output.clone(),
            level: 3,
            overwrite: false,
        };
        args.handle().unwrap();

        let container = std::fs::read(&output).unwrap();
        assert!(nx_mcpk::is_compressed(&container));
        assert_eq!(&nx_mcpk::decompress(&container).unwrap()[..13], b"Hello, World!");

        assert!(args.handle().is_err());
    }
}
