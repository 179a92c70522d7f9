//! 数据区，存放文件内容与目录项，使用**簇编号**索引。

mod dir_entry;

use alloc::boxed::Box;
use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use block_dev::BlockDevice;

pub use self::dir_entry::*;
use crate::ClusterId;
use crate::volume::CLUSTER_SIZE;

/// 以簇为单位读写块设备，不做缓存，写入即落盘。
#[derive(Clone)]
pub struct DataArea {
    dev: Arc<dyn BlockDevice>,
}

impl DataArea {
    pub fn new(dev: &Arc<dyn BlockDevice>) -> Self {
        Self { dev: dev.clone() }
    }

    pub fn read(&self, id: ClusterId) -> vfs::Result<Box<[u8]>> {
        let mut data = vec![0; CLUSTER_SIZE];
        self.dev.read_block(id.into(), &mut data)?;
        Ok(data.into())
    }

    /// 不足一簇的部分以0补齐
    pub fn write(&self, id: ClusterId, data: &[u8]) -> vfs::Result<()> {
        self.dev.write_block(id.into(), data)?;
        Ok(())
    }

    pub fn zeroize(&self, id: ClusterId) -> vfs::Result<()> {
        self.write(id, &[0; CLUSTER_SIZE])
    }

    /// 按顺序读取簇链表，截取前`len`个字节。
    pub fn read_chain(&self, chain: &[ClusterId], len: usize) -> vfs::Result<Vec<u8>> {
        let mut buf = Vec::with_capacity(chain.len() * CLUSTER_SIZE);
        for &id in chain {
            buf.extend_from_slice(&self.read(id)?);
        }
        buf.truncate(len);
        Ok(buf)
    }

    /// 将`data`逐簇写入簇链表，链表须足够长。
    pub fn write_chain(&self, chain: &[ClusterId], data: &[u8]) -> vfs::Result<()> {
        debug_assert!(chain.len() * CLUSTER_SIZE >= data.len());

        for (&id, chunk) in chain.iter().zip(data.chunks(CLUSTER_SIZE)) {
            self.write(id, chunk)?;
        }
        Ok(())
    }
}

impl core::fmt::Debug for DataArea {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("DataArea")
            .field("num_blocks", &self.dev.num_blocks())
            .field("block_size", &self.dev.block_size())
            .finish()
    }
}
