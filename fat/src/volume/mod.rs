//! 卷的布局，以簇为单位
//!
//! 超级块(#0) | FAT区(#1~#4) | 根目录(#5) | 数据区(#6~)

pub mod data;
pub mod fat;
pub mod reserved;

/// 一个簇的字节量，等于块设备的块大小
pub const CLUSTER_SIZE: usize = 1024;

/// 卷上簇的总数
pub const CLUSTER_COUNT: usize = 1024;

/// FAT条目的宽度，小端序`i32`
pub const FAT_ENTRY_BYTES: usize = 4;

/// 目录项的宽度
pub const DIR_ENTRY_BYTES: usize = 32;

/// 一个簇能容纳的目录项个数
pub const CLUSTER_DIRENTS: usize = CLUSTER_SIZE / DIR_ENTRY_BYTES;
