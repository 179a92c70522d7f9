//! # 块设备接口层
//!
//! 块设备是以**块**为单位存储数据的设备，例如磁盘镜像、内存盘等；
//! [`BlockDevice`] 就是对读写块设备的抽象，
//! 实现了此特质的类型称为**块设备驱动**。
//!
//! `fat` 通过块设备驱动读写簇，一个块即一个簇。

#![no_std]

extern crate alloc;

mod error;
mod ram;

use core::any::Any;

pub use self::{error::BlockError, ram::RamDisk};

/// 块设备驱动特质
pub trait BlockDevice: Send + Sync + Any {
    /// 读取整块，`buf`至少为[`BlockDevice::block_size`]字节。
    fn read_block(&self, block_id: usize, buf: &mut [u8]) -> Result<(), BlockError>;

    /// 写入整块。不足一块的部分以0补齐，超过一块则报错。
    fn write_block(&self, block_id: usize, buf: &[u8]) -> Result<(), BlockError>;

    fn num_blocks(&self) -> usize;

    fn block_size(&self) -> usize;

    /// Checks `block_id` and `len` against the device geometry.
    fn check_access(&self, block_id: usize, len: usize) -> Result<(), BlockError> {
        if block_id >= self.num_blocks() {
            return Err(BlockError::OutOfRange { block: block_id });
        }
        if len > self.block_size() {
            return Err(BlockError::Oversize { len });
        }
        Ok(())
    }
}
