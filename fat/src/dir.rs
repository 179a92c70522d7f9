//! 目录引擎
//!
//! 目录是一个簇链表，其内容被切分为32字节的槽位。
//! 查找与插入都是线性扫描；删除只清零目录项的首字节，留下可复用的空槽。

use alloc::vec::Vec;

use crate::volume::CLUSTER_SIZE;
use crate::volume::DIR_ENTRY_BYTES;
use crate::volume::data::{DirSlot, ShortDirEntry, dir_slots, format_name};
use crate::{ClusterId, FatFileSystem};

impl FatFileSystem {
    /// 按物理顺序列出目录`dir`中的全部目录项。
    pub fn list_entries(&self, dir: ClusterId) -> vfs::Result<Vec<ShortDirEntry>> {
        let mut dirents = Vec::new();
        for id in self.fat.follow(dir)? {
            let data = self.data.read(id)?;
            dirents.extend(dir_slots(&data).filter_map(DirSlot::entry));
        }
        Ok(dirents)
    }

    /// 搜索目录`dir`下指定名称的项，名称先经过8.3规范化。
    pub fn find_entry(&self, dir: ClusterId, name: &str) -> vfs::Result<Option<ShortDirEntry>> {
        Ok(self.locate(dir, name)?.map(|(_, _, dirent)| dirent))
    }

    /// 将`dirent`写入目录`dir`的第一个空槽，不检查重名。
    ///
    /// 目录已满时为其追加一个簇。
    pub fn add_entry(&mut self, dir: ClusterId, dirent: &ShortDirEntry) -> vfs::Result<()> {
        for id in self.fat.follow(dir)? {
            let mut data = self.data.read(id)?;
            let free = dir_slots(&data).position(|slot| slot == DirSlot::Free);
            if let Some(nth) = free {
                let offset = nth * DIR_ENTRY_BYTES;
                data[offset..offset + DIR_ENTRY_BYTES].copy_from_slice(&dirent.encode());
                self.data.write(id, &data)?;
                log::trace!("{:?} -> dir {dir} at ({id}, {nth})", dirent.name());
                return Ok(());
            }
        }

        // 新簇已被清零，首个槽位必然空闲
        let id = self.fat.extend(dir, 1)?;
        let mut data = [0; CLUSTER_SIZE];
        data[..DIR_ENTRY_BYTES].copy_from_slice(&dirent.encode());
        self.data.write(id, &data)?;
        log::debug!("Dir {dir} grew to cluster {id} for {:?}", dirent.name());
        Ok(())
    }

    /// 删除目录`dir`下指定名称的项，返回是否找到。
    pub fn remove_entry(&mut self, dir: ClusterId, name: &str) -> vfs::Result<bool> {
        let Some((id, nth, dirent)) = self.locate(dir, name)? else {
            return Ok(false);
        };

        let mut data = self.data.read(id)?;
        data[nth * DIR_ENTRY_BYTES] = 0x00;
        self.data.write(id, &data)?;
        log::trace!("{:?} <- dir {dir} at ({id}, {nth})", dirent.name());
        Ok(true)
    }
}

impl FatFileSystem {
    /// 返回目录项所在的簇、簇内序号以及目录项本身
    fn locate(
        &self,
        dir: ClusterId,
        name: &str,
    ) -> vfs::Result<Option<(ClusterId, usize, ShortDirEntry)>> {
        let target = format_name(name);

        for id in self.fat.follow(dir)? {
            let data = self.data.read(id)?;
            let found = dir_slots(&data)
                .enumerate()
                .find_map(|(nth, slot)| match slot {
                    DirSlot::Occupied(dirent) if dirent.name() == target => Some((nth, dirent)),
                    _ => None,
                });
            if let Some((nth, dirent)) = found {
                return Ok(Some((id, nth, dirent)));
            }
        }

        Ok(None)
    }
}
