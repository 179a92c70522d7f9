use alloc::vec;
use alloc::vec::Vec;

use spin::Mutex;

use crate::{BlockDevice, BlockError};

/// 内存盘，测试时充当磁盘镜像。
#[derive(Debug)]
pub struct RamDisk {
    data: Mutex<Vec<u8>>,
    num_blocks: usize,
    block_size: usize,
}

impl RamDisk {
    pub fn new(num_blocks: usize, block_size: usize) -> Self {
        Self {
            data: Mutex::new(vec![0; num_blocks * block_size]),
            num_blocks,
            block_size,
        }
    }

    /// 整个盘面的拷贝
    pub fn snapshot(&self) -> Vec<u8> {
        self.data.lock().clone()
    }
}

impl BlockDevice for RamDisk {
    fn read_block(&self, block_id: usize, buf: &mut [u8]) -> Result<(), BlockError> {
        self.check_access(block_id, buf.len())?;
        let start = block_id * self.block_size;
        let data = self.data.lock();
        buf.copy_from_slice(&data[start..start + buf.len()]);
        Ok(())
    }

    fn write_block(&self, block_id: usize, buf: &[u8]) -> Result<(), BlockError> {
        self.check_access(block_id, buf.len())?;
        let start = block_id * self.block_size;
        let mut data = self.data.lock();
        let block = &mut data[start..start + self.block_size];
        block[..buf.len()].copy_from_slice(buf);
        block[buf.len()..].fill(0);
        Ok(())
    }

    fn num_blocks(&self) -> usize {
        self.num_blocks
    }

    fn block_size(&self) -> usize {
        self.block_size
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_write_is_zero_padded() {
        let disk = RamDisk::new(4, 16);
        disk.write_block(1, &[0xAA; 16]).unwrap();
        disk.write_block(1, b"abc").unwrap();

        let mut buf = [0xFF; 16];
        disk.read_block(1, &mut buf).unwrap();
        assert_eq!(&buf[..3], b"abc");
        assert!(buf[3..].iter().all(|&b| b == 0));
    }

    #[test]
    fn rejects_bad_access() {
        let disk = RamDisk::new(4, 16);
        assert_eq!(
            disk.write_block(4, b"x"),
            Err(BlockError::OutOfRange { block: 4 })
        );
        assert_eq!(
            disk.write_block(0, &[0; 17]),
            Err(BlockError::Oversize { len: 17 })
        );
        let mut buf = [0; 16];
        assert_eq!(
            disk.read_block(9, &mut buf),
            Err(BlockError::OutOfRange { block: 9 })
        );
    }
}
