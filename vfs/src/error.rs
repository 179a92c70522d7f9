use block_dev::BlockError;
use derive_more::Display;

#[derive(Debug, Display, Clone, PartialEq, Eq)]
pub enum Error {
    #[display(fmt = "entry already exists")]
    AlreadyExists,
    #[display(fmt = "entry not found")]
    NotFound,
    #[display(fmt = "is a directory")]
    IsADirectory,
    #[display(fmt = "not a directory")]
    NotADirectory,
    #[display(fmt = "directory not empty")]
    DirectoryNotEmpty,
    /// 空闲簇不足
    #[display(fmt = "not enough free clusters")]
    NoSpace,
    #[display(fmt = "cluster {} is out of range", _0)]
    ClusterOutOfRange(usize),
    /// 超级块或FAT所在的保留簇
    #[display(fmt = "cluster {} is reserved", _0)]
    ReservedCluster(usize),
    /// 规范化后的8.3名称为空
    #[display(fmt = "invalid 8.3 name")]
    InvalidName,
    #[display(fmt = "I/O failure: {}", _0)]
    Io(BlockError),
}

impl From<BlockError> for Error {
    fn from(e: BlockError) -> Self {
        Self::Io(e)
    }
}

impl core::error::Error for Error {}

pub type Result<T> = core::result::Result<T, Error>;
