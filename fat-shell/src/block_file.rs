use std::cell::RefCell;
use std::fs::{File, OpenOptions};
use std::io::{self, Read, Seek, SeekFrom, Write};
use std::path::Path;

use block_dev::{BlockDevice, BlockError};
use fat::volume::{CLUSTER_COUNT, CLUSTER_SIZE};
use send_wrapper::SendWrapper;

/// 以宿主机上的镜像文件作为块设备，一块即一簇。
#[derive(Debug)]
pub struct BlockFile {
    inner: SendWrapper<RefCell<Option<File>>>,
}

impl BlockFile {
    pub fn new() -> Self {
        Self {
            inner: SendWrapper::new(RefCell::new(None)),
        }
    }

    /// 打开镜像，返回是否新建了镜像。
    ///
    /// 镜像不存在时，若`create_if_missing`则创建全零的镜像，否则报错。
    pub fn open(&self, path: &Path, create_if_missing: bool) -> Result<bool, BlockError> {
        let mut inner = self.inner.borrow_mut();
        if inner.is_some() {
            return Err(BlockError::AlreadyOpen);
        }

        let created = !path.exists();
        if created && !create_if_missing {
            return Err(BlockError::Io(format!("{} not found", path.display())));
        }

        let file = OpenOptions::new()
            .read(true)
            .write(true)
            .create(created)
            .truncate(false)
            .open(path)
            .map_err(io_error)?;
        if created {
            file.set_len((CLUSTER_COUNT * CLUSTER_SIZE) as u64)
                .map_err(io_error)?;
            log::info!("Created disk image {}", path.display());
        }

        *inner = Some(file);
        Ok(created)
    }

    /// 落盘并释放文件
    pub fn close(&self) -> Result<(), BlockError> {
        let file = self.inner.borrow_mut().take().ok_or(BlockError::NotOpen)?;
        file.sync_all().map_err(io_error)
    }

    fn seek_to(file: &mut File, block_id: usize) -> Result<(), BlockError> {
        file.seek(SeekFrom::Start((block_id * CLUSTER_SIZE) as u64))
            .map(|_| ())
            .map_err(io_error)
    }
}

impl Default for BlockFile {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockDevice for BlockFile {
    fn read_block(&self, block_id: usize, buf: &mut [u8]) -> Result<(), BlockError> {
        self.check_access(block_id, buf.len())?;
        let mut inner = self.inner.borrow_mut();
        let file = inner.as_mut().ok_or(BlockError::NotOpen)?;

        Self::seek_to(file, block_id)?;
        file.read_exact(buf).map_err(io_error)
    }

    fn write_block(&self, block_id: usize, buf: &[u8]) -> Result<(), BlockError> {
        self.check_access(block_id, buf.len())?;
        let mut inner = self.inner.borrow_mut();
        let file = inner.as_mut().ok_or(BlockError::NotOpen)?;

        let mut block = [0; CLUSTER_SIZE];
        block[..buf.len()].copy_from_slice(buf);
        Self::seek_to(file, block_id)?;
        file.write_all(&block).map_err(io_error)
    }

    fn num_blocks(&self) -> usize {
        CLUSTER_COUNT
    }

    fn block_size(&self) -> usize {
        CLUSTER_SIZE
    }
}

fn io_error(e: io::Error) -> BlockError {
    BlockError::Io(e.to_string())
}
