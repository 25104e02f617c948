pub mod compress;
pub mod decompress;

#[derive(clap::Subcommand)]
pub enum McCommands {
    /// Wrap a file into an MCPK container
    Compress(compress::CompressArgs),
    /// Unwrap an MCPK container
    Decompress(decompress::DecompressArgs),
}

impl McCommands {
    pub fn handle(&self) -> miette::Result<()> {
        match self {
            McCommands::Compress(compress) => compress.handle(),
            McCommands::Decompress(decompress) => decompress.handle(),
        }
    }
}
