use alloc::boxed::Box;

use crate::ClusterId;
use crate::volume::data::DataArea;

/// # 超级块
///
/// 位于#0簇，内容对文件系统不透明，由使用者自行解释。
#[derive(Debug)]
pub struct SuperBlock<'a> {
    data: &'a DataArea,
}

impl<'a> SuperBlock<'a> {
    pub fn new(data: &'a DataArea) -> Self {
        Self { data }
    }

    pub fn read(&self) -> vfs::Result<Box<[u8]>> {
        self.data.read(ClusterId::SUPERBLOCK)
    }

    /// 超过一簇的数据会被拒绝
    pub fn write(&self, bytes: &[u8]) -> vfs::Result<()> {
        self.data.write(ClusterId::SUPERBLOCK, bytes)
    }
}
