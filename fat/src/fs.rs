//! 文件系统操作层
//!
//! 每个操作先检查前置条件（存在性、类型、重名、空目录、空间），
//! 条件不满足时直接报错而不做任何修改；成功修改后统一写回FAT。
//!
//! 各步骤之间没有日志保护：若块设备在FAT与目录项的两次写入之间出错，
//! 可能残留孤立的簇链表或指向已释放簇的目录项。

use alloc::vec::Vec;

use vfs::{DirEntryType, Error, Stat};

use crate::volume::CLUSTER_SIZE;
use crate::volume::data::{ShortDirEntry, ShortName, format_name};
use crate::{ClusterId, FatFileSystem};

impl FatFileSystem {
    pub fn find(&self, dir: ClusterId, name: &str) -> vfs::Result<ShortDirEntry> {
        self.find_entry(dir, name)?.ok_or(Error::NotFound)
    }

    pub fn stat(&self, dir: ClusterId, name: &str) -> vfs::Result<Stat> {
        self.stat_entry(&self.find(dir, name)?)
    }

    /// 由已查到的目录项统计元数据，不再扫描目录。
    pub fn stat_entry(&self, dirent: &ShortDirEntry) -> vfs::Result<Stat> {
        let clusters = self.fat.chain(dirent.cluster_id())?.count();

        Ok(Stat {
            mode: dirent.kind(),
            first_cluster: usize::from(dirent.cluster_id()) as u64,
            clusters: clusters as u64,
            size: dirent.size() as u64,
        })
    }

    /// 在目录`dir`下创建空文件，占用一个簇。
    pub fn create_file(&mut self, dir: ClusterId, name: &str) -> vfs::Result<ShortDirEntry> {
        self.create(dir, name, DirEntryType::Regular)
    }

    /// 在目录`dir`下创建空目录，占用一个簇。
    pub fn create_dir(&mut self, dir: ClusterId, name: &str) -> vfs::Result<ShortDirEntry> {
        self.create(dir, name, DirEntryType::Directory)
    }

    /// 以`data`覆盖文件的全部内容。
    ///
    /// 旧链表先被释放，再按首次适应分配新链表，所以新旧链表可能重叠。
    pub fn write_file(&mut self, dir: ClusterId, name: &str, data: &[u8]) -> vfs::Result<()> {
        let old = self.find(dir, name)?;
        if old.is_dir() {
            return Err(Error::IsADirectory);
        }

        let need = clusters_for(data.len());
        let reusable = self.fat.chain(old.cluster_id())?.count();
        if self.fat.free_count() + reusable < need {
            return Err(Error::NoSpace);
        }

        self.fat.dealloc(old.cluster_id())?;
        let start = self.fat.alloc(need)?;
        let chain = self.fat.follow(start)?;
        self.data.write_chain(&chain, data)?;

        let mut dirent = old;
        dirent.set_cluster_id(start);
        dirent.resize(data.len());
        self.remove_entry(dir, name)?;
        self.add_entry(dir, &dirent)?;

        log::debug!("Wrote {} bytes to {:?}", data.len(), dirent.name());
        self.fat.flush()
    }

    /// 读取文件的全部内容，末簇中超出文件大小的部分被截去。
    pub fn read_file(&self, dir: ClusterId, name: &str) -> vfs::Result<Vec<u8>> {
        let dirent = self.find(dir, name)?;
        if dirent.is_dir() {
            return Err(Error::IsADirectory);
        }
        self.read_content(&dirent)
    }

    pub fn remove_file(&mut self, dir: ClusterId, name: &str) -> vfs::Result<()> {
        let dirent = self.find(dir, name)?;
        if dirent.is_dir() {
            return Err(Error::IsADirectory);
        }

        self.fat.dealloc(dirent.cluster_id())?;
        self.remove_entry(dir, name)?;
        self.fat.flush()
    }

    /// 删除空目录
    pub fn remove_dir(&mut self, dir: ClusterId, name: &str) -> vfs::Result<()> {
        let dirent = self.find(dir, name)?;
        if !dirent.is_dir() {
            return Err(Error::NotADirectory);
        }
        if !self.list_entries(dirent.cluster_id())?.is_empty() {
            return Err(Error::DirectoryNotEmpty);
        }

        self.fat.dealloc(dirent.cluster_id())?;
        self.remove_entry(dir, name)?;
        self.fat.flush()
    }

    /// 在同一目录内改名，簇链表、大小与属性不变。
    pub fn rename(&mut self, dir: ClusterId, old_name: &str, new_name: &str) -> vfs::Result<()> {
        let mut dirent = self.find(dir, old_name)?;
        let new = valid_name(new_name)?;
        if self.find_entry(dir, new_name)?.is_some() {
            return Err(Error::AlreadyExists);
        }

        self.remove_entry(dir, old_name)?;
        dirent.rename(new);
        self.add_entry(dir, &dirent)?;
        self.fat.flush()
    }

    /// 复制文件到`dst_dir/dst_name`，目标不能已存在。
    pub fn copy_file(
        &mut self,
        src_dir: ClusterId,
        src_name: &str,
        dst_dir: ClusterId,
        dst_name: &str,
    ) -> vfs::Result<ShortDirEntry> {
        let src = self.find(src_dir, src_name)?;
        if src.is_dir() {
            return Err(Error::IsADirectory);
        }
        let dst = valid_name(dst_name)?;
        if self.find_entry(dst_dir, dst_name)?.is_some() {
            return Err(Error::AlreadyExists);
        }

        let data = self.read_content(&src)?;
        let need = clusters_for(data.len());
        if self.fat.free_count() < need {
            return Err(Error::NoSpace);
        }

        let start = self.fat.alloc(need)?;
        let chain = self.fat.follow(start)?;
        self.data.write_chain(&chain, &data)?;

        let dirent = ShortDirEntry::new(dst, DirEntryType::Regular, start, data.len());
        self.link(dst_dir, &dirent)?;
        log::debug!("Copied {:?} -> {:?}", src.name(), dst);
        self.fat.flush()?;
        Ok(dirent)
    }

    /// 先复制，再删除源文件。
    pub fn move_file(
        &mut self,
        src_dir: ClusterId,
        src_name: &str,
        dst_dir: ClusterId,
        dst_name: &str,
    ) -> vfs::Result<ShortDirEntry> {
        let dirent = self.copy_file(src_dir, src_name, dst_dir, dst_name)?;
        self.remove_file(src_dir, src_name)?;
        Ok(dirent)
    }
}

impl FatFileSystem {
    fn create(
        &mut self,
        dir: ClusterId,
        name: &str,
        kind: DirEntryType,
    ) -> vfs::Result<ShortDirEntry> {
        let short = valid_name(name)?;
        if self.find_entry(dir, name)?.is_some() {
            return Err(Error::AlreadyExists);
        }

        let start = self.fat.alloc(1)?;
        let dirent = ShortDirEntry::new(short, kind, start, 0);
        self.link(dir, &dirent)?;
        log::debug!("Created {kind:?} {short:?} at {start} in dir {dir}");
        self.fat.flush()?;
        Ok(dirent)
    }

    /// 为新分配的链表添加目录项；目录无法扩展时归还该链表。
    fn link(&mut self, dir: ClusterId, dirent: &ShortDirEntry) -> vfs::Result<()> {
        self.add_entry(dir, dirent).or_else(|e| {
            self.fat.dealloc(dirent.cluster_id())?;
            Err(e)
        })
    }

    fn read_content(&self, dirent: &ShortDirEntry) -> vfs::Result<Vec<u8>> {
        let chain = self.fat.follow(dirent.cluster_id())?;
        self.data.read_chain(&chain, dirent.size())
    }
}

fn valid_name(name: &str) -> vfs::Result<ShortName> {
    let short = format_name(name);
    if short.is_empty() {
        return Err(Error::InvalidName);
    }
    Ok(short)
}

/// 至少一个簇
fn clusters_for(len: usize) -> usize {
    len.div_ceil(CLUSTER_SIZE).max(1)
}
