use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(version, about = "Interactive shell over a FAT disk image")]
pub struct Cli {
    /// Path of the disk image
    #[arg(long, short, default_value = "virtual_disk.bin")]
    pub disk: PathBuf,

    /// Fail instead of creating a zeroed image when the disk is missing
    #[arg(long)]
    pub no_create: bool,
}
