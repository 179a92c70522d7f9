use alloc::string::String;
use core::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BlockError {
    /// 设备尚未打开，或已关闭
    NotOpen,
    /// 重复打开同一设备
    AlreadyOpen,
    OutOfRange { block: usize },
    /// 写入的数据超过一块
    Oversize { len: usize },
    /// 底层读写失败
    Io(String),
}

impl fmt::Display for BlockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotOpen => write!(f, "block device is not open"),
            Self::AlreadyOpen => write!(f, "block device is already initialized"),
            Self::OutOfRange { block } => write!(f, "block {block} is out of range"),
            Self::Oversize { len } => write!(f, "{len} bytes exceed one block"),
            Self::Io(msg) => write!(f, "{msg}"),
        }
    }
}

impl core::error::Error for BlockError {}
