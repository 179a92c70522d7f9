mod block_file;
mod cli;
mod shell;

use std::io;
use std::sync::Arc;

use block_dev::BlockDevice;
use clap::Parser;
use fat::FatFileSystem;

pub use self::{block_file::BlockFile, cli::Cli, shell::Shell};

/// 新建镜像时写入超级块的标签
const LABEL: &[u8] = b"FATSHELL v1";

fn main() -> io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    log::info!("disk={:?}", cli.disk);

    let disk = Arc::new(BlockFile::new());
    let created = disk.open(&cli.disk, !cli.no_create).map_err(io::Error::other)?;

    let block_dev: Arc<dyn BlockDevice> = disk.clone();
    let result = FatFileSystem::mount(block_dev)
        .and_then(|fs| {
            if created {
                fs.set_superblock(LABEL)?;
            }
            Ok(fs)
        })
        .map_err(io::Error::other)
        .and_then(|fs| Shell::new(fs).run(io::stdin().lock(), io::stdout()));

    disk.close().map_err(io::Error::other)?;
    result
}
