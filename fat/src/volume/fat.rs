//! FAT区：记录每个簇的下一个簇。
//!
//! 条目为小端序`i32`，其中`0`表示簇未分配，`-1`表示链表结束，
//! 其余为下一个簇的编号。整张表常驻内存，由[`FatArea::flush`]写回#1~#4簇。

use alloc::boxed::Box;
use alloc::vec;
use alloc::vec::Vec;

use vfs::Error;

use crate::ClusterId;
use crate::volume::data::DataArea;
use crate::volume::{CLUSTER_COUNT, CLUSTER_SIZE, FAT_ENTRY_BYTES};

/// 解码后的FAT条目
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FatEntry {
    Free,
    Eof,
    Next(ClusterId),
}

impl FatEntry {
    const FREE: i32 = 0;
    const EOF: i32 = -1;
}

impl From<i32> for FatEntry {
    /// 除`-1`以外的负数无法指向任何簇，一律视为链表结束。
    fn from(raw: i32) -> Self {
        match raw {
            Self::FREE => Self::Free,
            next if next > 0 => Self::Next(ClusterId::new(next as usize)),
            _ => Self::Eof,
        }
    }
}

impl From<FatEntry> for i32 {
    fn from(entry: FatEntry) -> Self {
        match entry {
            FatEntry::Free => FatEntry::FREE,
            FatEntry::Eof => FatEntry::EOF,
            FatEntry::Next(id) => usize::from(id) as i32,
        }
    }
}

#[derive(Debug)]
pub struct FatArea {
    entries: Box<[i32]>,
    data: DataArea,
}

impl FatArea {
    /// 一个簇能容纳多少条FAT条目
    const CLUSTER_ENTRIES: usize = CLUSTER_SIZE / FAT_ENTRY_BYTES;

    /// 从#1~#4簇读入整张表。
    pub fn load(data: DataArea) -> vfs::Result<Self> {
        let mut entries = Vec::with_capacity(CLUSTER_COUNT);
        for id in Self::clusters() {
            let raw = data.read(id)?;
            entries.extend(
                raw.chunks_exact(FAT_ENTRY_BYTES)
                    .map(|b| i32::from_le_bytes([b[0], b[1], b[2], b[3]])),
            );
        }
        debug_assert_eq!(CLUSTER_COUNT, entries.len());
        log::debug!("FAT loaded, {} free clusters", count_free(&entries));

        Ok(Self {
            entries: entries.into(),
            data,
        })
    }

    /// 将整张表写回#1~#4簇，可重复调用。
    pub fn flush(&self) -> vfs::Result<()> {
        for (id, entries) in Self::clusters().zip(self.entries.chunks(Self::CLUSTER_ENTRIES)) {
            let mut raw = vec![0; CLUSTER_SIZE];
            for (b, entry) in raw.chunks_exact_mut(FAT_ENTRY_BYTES).zip(entries) {
                b.copy_from_slice(&entry.to_le_bytes());
            }
            self.data.write(id, &raw)?;
        }
        Ok(())
    }

    pub fn get(&self, id: ClusterId) -> vfs::Result<FatEntry> {
        self.raw(id).map(FatEntry::from)
    }

    /// 直接改写条目，由调用者维护链表的完整性。
    pub fn set(&mut self, id: ClusterId, entry: FatEntry) -> vfs::Result<()> {
        let slot = self
            .entries
            .get_mut(usize::from(id))
            .ok_or(Error::ClusterOutOfRange(id.into()))?;
        *slot = entry.into();
        Ok(())
    }

    /// 从`start`开始遍历簇链表，`start`本身为第一项。
    ///
    /// 遇到未分配的条目、越界的下一簇或超出簇总数的长度时提前结束，
    /// 损坏的链表因此会被截断而不会死循环。
    pub fn chain(&self, start: ClusterId) -> vfs::Result<Chain<'_>> {
        Ok(Chain {
            entries: &self.entries,
            next: Some(start.validate()?),
            remaining: CLUSTER_COUNT,
        })
    }

    pub fn follow(&self, start: ClusterId) -> vfs::Result<Vec<ClusterId>> {
        Ok(self.chain(start)?.collect())
    }

    /// 以首次适应的方式分配`count`个簇并链接成表，返回首簇。
    ///
    /// 新簇会被清零。空闲簇不足时报错，且不改动任何条目。
    /// `count`为0时按1处理。
    pub fn alloc(&mut self, count: usize) -> vfs::Result<ClusterId> {
        let count = count.max(1);
        let clusters: Vec<ClusterId> = (usize::from(ClusterId::MIN)..CLUSTER_COUNT)
            .filter(|&i| self.entries[i] == FatEntry::FREE)
            .take(count)
            .map(ClusterId::new)
            .collect();
        if clusters.len() < count {
            log::debug!("Want {count} clusters, only {} free", clusters.len());
            return Err(Error::NoSpace);
        }

        for &id in &clusters {
            self.data.zeroize(id)?;
        }
        for pair in clusters.windows(2) {
            self.entries[usize::from(pair[0])] = FatEntry::Next(pair[1]).into();
        }
        let first = clusters[0];
        self.entries[usize::from(clusters[count - 1])] = FatEntry::EOF;

        log::debug!("Allocated {count} clusters from {first}");
        Ok(first)
    }

    /// 在`start`所在链表的末尾追加`n`个簇，返回新增部分的首簇。
    pub fn extend(&mut self, start: ClusterId, n: usize) -> vfs::Result<ClusterId> {
        let last = self.chain(start)?.last().unwrap_or(start);
        let head = self.alloc(n)?;
        self.set(last, FatEntry::Next(head))?;
        log::debug!("Chain {start} extended at {last} -> {head}");
        Ok(head)
    }

    /// 释放整个簇链表，但不清除簇的内容。
    pub fn dealloc(&mut self, start: ClusterId) -> vfs::Result<()> {
        let mut id = start.validate()?;

        for _ in 0..CLUSTER_COUNT {
            let index = usize::from(id);
            let next = FatEntry::from(self.entries[index]);
            self.entries[index] = FatEntry::FREE;
            match next {
                FatEntry::Eof => break,
                FatEntry::Next(next) if next.is_content() => id = next,
                other => {
                    log::warn!("Chain {start} broken at {id}: {other:?}");
                    break;
                }
            }
        }

        log::debug!("Freed chain {start}");
        Ok(())
    }

    /// 预先链接保留簇：#0与#5各自成表，#1~#4连成一表。
    ///
    /// 只改写未分配的条目，因此可重复调用。
    pub fn init_reserved(&mut self) -> vfs::Result<()> {
        let reserved = [
            (ClusterId::SUPERBLOCK, FatEntry::Eof),
            (ClusterId::new(1), FatEntry::Next(ClusterId::new(2))),
            (ClusterId::new(2), FatEntry::Next(ClusterId::new(3))),
            (ClusterId::new(3), FatEntry::Next(ClusterId::FAT_END)),
            (ClusterId::FAT_END, FatEntry::Eof),
            (ClusterId::ROOT, FatEntry::Eof),
        ];
        for (id, entry) in reserved {
            if self.get(id)? == FatEntry::Free {
                self.set(id, entry)?;
            }
        }
        self.flush()
    }

    /// 数据区中未分配的簇数
    pub fn free_count(&self) -> usize {
        count_free(&self.entries)
    }
}

impl FatArea {
    fn clusters() -> impl Iterator<Item = ClusterId> {
        (usize::from(ClusterId::FAT_START)..=usize::from(ClusterId::FAT_END)).map(ClusterId::new)
    }

    fn raw(&self, id: ClusterId) -> vfs::Result<i32> {
        self.entries
            .get(usize::from(id))
            .copied()
            .ok_or(Error::ClusterOutOfRange(id.into()))
    }
}

fn count_free(entries: &[i32]) -> usize {
    entries[usize::from(ClusterId::MIN)..]
        .iter()
        .filter(|&&entry| entry == FatEntry::FREE)
        .count()
}

/// 簇链表迭代器，见[`FatArea::chain`]。
#[derive(Debug, Clone)]
pub struct Chain<'a> {
    entries: &'a [i32],
    next: Option<ClusterId>,
    remaining: usize,
}

impl Iterator for Chain<'_> {
    type Item = ClusterId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.next.take()?;
        self.remaining = self.remaining.checked_sub(1)?;

        self.next = match FatEntry::from(self.entries[usize::from(id)]) {
            FatEntry::Eof => None,
            FatEntry::Next(next) if next.is_content() => Some(next),
            other => {
                log::warn!("Chain truncated at {id}: {other:?}");
                None
            }
        };
        Some(id)
    }
}
