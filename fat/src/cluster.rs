use derive_more::{Add, Display, From, Into};

use crate::volume::CLUSTER_COUNT;

/// 簇编号，即块设备上的块号。
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Add, From, Into)]
#[repr(transparent)]
pub struct ClusterId(usize);

impl core::ops::Add<usize> for ClusterId {
    type Output = Self;

    fn add(self, rhs: usize) -> Self::Output {
        self + Self(rhs)
    }
}

impl ClusterId {
    /// 超级块
    pub const SUPERBLOCK: Self = Self(0);

    /// FAT区的首簇
    pub const FAT_START: Self = Self(1);

    /// FAT区的末簇（含）
    pub const FAT_END: Self = Self(4);

    /// 根目录的首簇，永不释放
    pub const ROOT: Self = Self(5);

    /// 最小的可分配簇号
    pub const MIN: Self = Self(6);

    pub const fn new(raw: usize) -> Self {
        Self(raw)
    }

    /// 是否处于可分配的数据区
    pub fn is_content(self) -> bool {
        (Self::MIN.0..CLUSTER_COUNT).contains(&self.0)
    }

    /// 检查`self`能否作为簇链表的起点。
    ///
    /// 根目录可以，超级块与FAT区不行。
    pub fn validate(self) -> vfs::Result<Self> {
        if self.0 >= CLUSTER_COUNT {
            Err(vfs::Error::ClusterOutOfRange(self.0))
        } else if self <= Self::FAT_END {
            Err(vfs::Error::ReservedCluster(self.0))
        } else {
            Ok(self)
        }
    }
}
