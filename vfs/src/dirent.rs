/// 目录项所指对象的种类
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum DirEntryType {
    #[default]
    Regular,
    Directory,
}

impl DirEntryType {
    pub fn is_dir(self) -> bool {
        self == Self::Directory
    }
}
