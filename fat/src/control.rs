use alloc::boxed::Box;
use alloc::sync::Arc;

use block_dev::BlockDevice;

use crate::volume::data::DataArea;
use crate::volume::fat::FatArea;
use crate::volume::reserved::SuperBlock;

/// 挂载后的文件系统。
///
/// FAT常驻内存，每次修改性操作结束时写回；目录项则在增删时直接写入所在的簇。
#[derive(Debug)]
pub struct FatFileSystem {
    /// FAT区的内存副本
    pub(crate) fat: FatArea,
    /// 数据区
    pub(crate) data: DataArea,
}

impl FatFileSystem {
    /// 读入FAT；对全零的新卷，顺带链接好保留簇。
    pub fn mount(dev: Arc<dyn BlockDevice>) -> vfs::Result<Self> {
        let data = DataArea::new(&dev);
        let mut fat = FatArea::load(data.clone())?;
        fat.init_reserved()?;
        log::info!("Mounted, {} free clusters", fat.free_count());

        Ok(Self { fat, data })
    }

    pub fn fat(&self) -> &FatArea {
        &self.fat
    }

    pub fn fat_mut(&mut self) -> &mut FatArea {
        &mut self.fat
    }

    pub fn free_clusters(&self) -> usize {
        self.fat.free_count()
    }

    pub fn superblock(&self) -> vfs::Result<Box<[u8]>> {
        SuperBlock::new(&self.data).read()
    }

    pub fn set_superblock(&self, bytes: &[u8]) -> vfs::Result<()> {
        SuperBlock::new(&self.data).write(bytes)
    }
}
