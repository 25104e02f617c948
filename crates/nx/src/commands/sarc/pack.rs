use clap::Args;
use miette::{miette, Context, IntoDiagnostic, Result};
use nx_sarc::{Endian, SarcWriter, SarcWriterOptions};
use std::{
    fs::File,
    io::Write,
    path::{Path, PathBuf},
};
use tracing::info;
use walkdir::WalkDir;

use crate::commands::create_output;

#[derive(Args)]
pub struct PackArgs {
    /// An input directory
    #[arg(short, long, value_name = "DIR")]
    directory: PathBuf,

    /// A target SARC file
    #[arg(short, long, value_name = "FILE")]
    file: PathBuf,

    /// Allow overwriting the target
    #[arg(long, default_value_t = false)]
    overwrite: bool,

    /// Write a big endian archive
    #[arg(long, default_value_t = false)]
    big_endian: bool,

    /// Report this alignment instead of the one guessed from the contents
    #[arg(long, value_name = "N")]
    alignment: Option<u32>,

    /// Wrap the archive in an MCPK container
    #[arg(long, default_value_t = false)]
    compress: bool,
}

impl PackArgs {
    pub fn handle(&self) -> Result<()> {
        info!("creating {}", &self.file.display());

        let mut files = WalkDir::new(&self.directory)
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| !e.file_type().is_dir())
            .map(|e| -> Result<(String, PathBuf)> {
                Ok((archive_name(&self.directory, e.path())?, e.into_path()))
            })
            .collect::<Result<Vec<_>>>()?;

        if files.is_empty() {
            return Err(miette!("directory is empty"));
        }
        files.sort_by(|(a, _), (b, _)| a.cmp(b));

        let mut sarc = SarcWriter::new(
            SarcWriterOptions::builder()
                .endian(if self.big_endian {
                    Endian::Big
                } else {
                    Endian::Little
                })
                .maybe_alignment(self.alignment)
                .build(),
        );

        for (name, path) in &files {
            info!("packing {}", name);

            sarc.start_file(name)
                .context(format!("starting entry for {}", name))?;

            let mut f = File::open(path)
                .into_diagnostic()
                .context(format!("opening {}", path.display()))?;

            std::io::copy(&mut f, &mut sarc)
                .into_diagnostic()
                .context(format!("copying {}", path.display()))?;
        }

        let packed = sarc.finish().context("finalizing sarc file")?;
        info!(alignment = packed.alignment, size = packed.buffer.len(), "packed archive");

        let output = if self.compress {
            nx_mcpk::compress(&packed.buffer).context("compressing sarc file")?
        } else {
            packed.buffer
        };

        create_output(&self.file, self.overwrite)?
            .write_all(&output)
            .into_diagnostic()
            .context(format!("writing {}", &self.file.display()))?;

        Ok(())
    }
}

/// Name of a file inside the archive, its path below `root` joined with `/`
fn archive_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path.strip_prefix(root).into_diagnostic()?;

    Ok(relative
        .components()
        .map(|c| {
            c.as_os_str()
                .to_str()
                .ok_or(miette!("unable to convert {} to a string", relative.display()))
        })
        .collect::<Result<Vec<_>>>()?
        .join("/"))
}

#[cfg(test)]
mod test {
    use nx_sarc::{unpack, Endian, SarcArchive};
    use std::path::Path;

    use super::{archive_name, PackArgs};

    fn populate(dir: &Path) {
        std::fs::create_dir_all(dir.join("Model")).unwrap();
        std::fs::create_dir_all(dir.join("Actor").join("Pack")).unwrap();
        std::fs::write(dir.join("Model").join("Link.bfres"), b"FRES").unwrap();
        std::fs::write(dir.join("Actor").join("Pack").join("Link.bin"), b"pack").unwrap();
        std::fs::write(dir.join("readme.txt"), b"hello").unwrap();
    }

    fn args(directory: &Path, file: &Path) -> PackArgs {
        PackArgs {
            directory: directory.to_path_buf(),
            file: file.to_path_buf(),
            overwrite: false,
            big_endian: false,
            alignment: None,
            compress: false,
        }
    }

    #[test]
    fn names_use_forward_slashes() {
        let root = Path::new("root");
        assert_eq!(
            archive_name(root, &root.join("Model").join("Link.bfres")).unwrap(),
            "Model/Link.bfres"
        );
    }

    #[test]
    fn packs_sorted_by_name() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        populate(&input);

        let file = dir.path().join("out.sarc");
        args(&input, &file).handle().unwrap();

        let data = unpack(&std::fs::read(&file).unwrap()).unwrap();
        assert_eq!(
            data.names().collect::<Vec<_>>(),
            ["Actor/Pack/Link.bin", "Model/Link.bfres", "readme.txt"]
        );
        assert_eq!(data.get("Model/Link.bfres"), Some(&b"FRES"[..]));
    }

    #[test]
    fn packs_big_endian_and_compressed() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        populate(&input);

        let file = dir.path().join("out.sarc.mc");
        PackArgs {
            big_endian: true,
            compress: true,
            ..args(&input, &file)
        }
        .handle()
        .unwrap();

        let buffer = std::fs::read(&file).unwrap();
        assert!(nx_mcpk::is_compressed(&buffer));

        let sarc = SarcArchive::new(&nx_mcpk::decompress(&buffer).unwrap()).unwrap();
        assert_eq!(sarc.endian(), Endian::Big);
        assert_eq!(sarc.len(), 3);
    }

    #[test]
    fn refuses_empty_directory_and_existing_target() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in");
        std::fs::create_dir_all(&input).unwrap();

        let file = dir.path().join("out.sarc");
        assert!(args(&input, &file).handle().is_err());

        populate(&input);
        std::fs::write(&file, b"existing").unwrap();
        assert!(args(&input, &file).handle().is_err());

        PackArgs {
            overwrite: true,
            ..args(&input, &file)
        }
        .handle()
        .unwrap();
        assert!(unpack(&std::fs::read(&file).unwrap()).is_ok());
    }
}
