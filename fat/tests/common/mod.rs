#![allow(dead_code)]

use std::sync::Arc;

use block_dev::{BlockDevice, RamDisk};
use fat::FatFileSystem;
use fat::volume::{CLUSTER_COUNT, CLUSTER_SIZE};

pub fn disk() -> Arc<RamDisk> {
    Arc::new(RamDisk::new(CLUSTER_COUNT, CLUSTER_SIZE))
}

pub fn mount(disk: &Arc<RamDisk>) -> FatFileSystem {
    let dev: Arc<dyn BlockDevice> = disk.clone();
    FatFileSystem::mount(dev).unwrap()
}

/// 挂载一张全新的内存盘
pub fn fresh() -> (Arc<RamDisk>, FatFileSystem) {
    let disk = disk();
    let fs = mount(&disk);
    (disk, fs)
}

/// 盘面上第`index`条FAT条目的原始值
pub fn raw_entry(disk: &RamDisk, index: usize) -> i32 {
    let offset = CLUSTER_SIZE + index * 4;
    let image = disk.snapshot();
    i32::from_le_bytes(image[offset..offset + 4].try_into().unwrap())
}
