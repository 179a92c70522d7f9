use crate::DirEntryType;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub mode: DirEntryType,
    /// 首簇编号
    pub first_cluster: u64,
    /// Occupying clusters
    pub clusters: u64,
    /// File size
    pub size: u64,
}
