//! 目录项的编解码
//!
//! 一个目录项占32字节：
//!
//! | 偏移 | 长度 | 内容 |
//! |---|---|---|
//! | 0 | 11 | 8.3名称（8字节主名 + 3字节扩展名，空格补齐，不存`.`） |
//! | 11 | 1 | 属性 |
//! | 12 | 2 | 首簇编号，小端序 |
//! | 14 | 4 | 文件大小，小端序 |
//! | 18 | 14 | 保留，填0 |
//!
//! 首字节为`0x00`的槽位是空闲的。合法名称只含大写字母、数字与空格，
//! 所以不会与之混淆。

use core::fmt::{self, Write};

use enumflags2::{BitFlags, bitflags};
use vfs::DirEntryType;

use crate::ClusterId;
use crate::volume::DIR_ENTRY_BYTES;

const BASE_LEN: usize = 8;
const EXT_LEN: usize = 3;
const NAME_LEN: usize = BASE_LEN + EXT_LEN;

/// 规范化的8.3名称
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShortName([u8; NAME_LEN]);

impl ShortName {
    /// 主名全为空格
    pub fn is_empty(&self) -> bool {
        self.base().iter().all(|&b| b == b' ')
    }

    pub fn as_bytes(&self) -> &[u8; NAME_LEN] {
        &self.0
    }

    fn base(&self) -> &[u8] {
        &self.0[..BASE_LEN]
    }

    fn ext(&self) -> &[u8] {
        &self.0[BASE_LEN..]
    }
}

/// 去掉补齐的空格，有扩展名时才插入`.`
impl fmt::Display for ShortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn trim(field: &[u8]) -> &[u8] {
            let end = field.iter().rposition(|&b| b != b' ').map_or(0, |i| i + 1);
            &field[..end]
        }

        trim(self.base())
            .iter()
            .try_for_each(|&b| f.write_char(b as char))?;
        let ext = trim(self.ext());
        if !ext.is_empty() {
            f.write_char('.')?;
            ext.iter().try_for_each(|&b| f.write_char(b as char))?;
        }
        Ok(())
    }
}

impl fmt::Debug for ShortName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ShortName(\"{self}\")")
    }
}

/// 将用户给出的名称规范为8.3格式。
///
/// 以第一个`.`切分主名与扩展名，各自转为大写并滤去`[A-Z0-9]`以外的字符，
/// 再截断为8/3个字符。
pub fn format_name(name: &str) -> ShortName {
    let (base, ext) = name.split_once('.').unwrap_or((name, ""));

    let mut raw = [b' '; NAME_LEN];
    fill_field(&mut raw[..BASE_LEN], base);
    fill_field(&mut raw[BASE_LEN..], ext);
    ShortName(raw)
}

fn fill_field(field: &mut [u8], src: &str) {
    let legal = src
        .bytes()
        .map(|b| b.to_ascii_uppercase())
        .filter(u8::is_ascii_alphanumeric);
    for (b, nb) in field.iter_mut().zip(legal) {
        *b = nb;
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[bitflags]
#[repr(u8)]
pub enum AttrFlag {
    Directory = 0b0000_0001,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShortDirEntry {
    name: ShortName,

    pub attr: BitFlags<AttrFlag>,

    /// 首簇编号
    fst_clus: u16,

    /// Quantity containing size in bytes
    /// of file/directory described by this entry
    file_size: u32,
}

impl ShortDirEntry {
    pub fn new(name: ShortName, kind: DirEntryType, id: ClusterId, size: usize) -> Self {
        let mut dirent = Self {
            name,
            attr: BitFlags::empty(),
            fst_clus: 0,
            file_size: 0,
        };
        if kind.is_dir() {
            dirent.attr |= AttrFlag::Directory;
        }
        dirent.set_cluster_id(id);
        dirent.resize(size);
        dirent
    }

    pub fn name(&self) -> ShortName {
        self.name
    }

    pub fn rename(&mut self, name: ShortName) {
        self.name = name;
    }

    pub fn kind(&self) -> DirEntryType {
        if self.attr.contains(AttrFlag::Directory) {
            DirEntryType::Directory
        } else {
            DirEntryType::Regular
        }
    }

    pub fn is_dir(&self) -> bool {
        self.kind().is_dir()
    }

    pub fn cluster_id(&self) -> ClusterId {
        ClusterId::new(self.fst_clus as usize)
    }

    pub fn set_cluster_id(&mut self, id: ClusterId) {
        self.fst_clus = usize::from(id) as u16;
    }

    pub const fn size(&self) -> usize {
        self.file_size as usize
    }

    pub fn resize(&mut self, size: usize) {
        self.file_size = size as u32;
    }

    pub fn encode(&self) -> [u8; DIR_ENTRY_BYTES] {
        debug_assert_ne!(0x00, self.name.0[0], "leading NUL would read as a free slot");

        let mut raw = [0; DIR_ENTRY_BYTES];
        raw[..11].copy_from_slice(&self.name.0);
        raw[11] = self.attr.bits();
        raw[12..14].copy_from_slice(&self.fst_clus.to_le_bytes());
        raw[14..18].copy_from_slice(&self.file_size.to_le_bytes());
        raw
    }

    /// `raw`须为一个完整的目录项
    pub fn decode(raw: &[u8]) -> Self {
        let mut name = [0; NAME_LEN];
        name.copy_from_slice(&raw[..11]);
        Self {
            name: ShortName(name),
            attr: BitFlags::from_bits_truncate(raw[11]),
            fst_clus: u16::from_le_bytes([raw[12], raw[13]]),
            file_size: u32::from_le_bytes([raw[14], raw[15], raw[16], raw[17]]),
        }
    }
}

/// 目录簇中的一个槽位
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DirSlot {
    /// 首字节为0，从未使用或已删除
    Free,
    Occupied(ShortDirEntry),
}

impl DirSlot {
    pub fn parse(raw: &[u8]) -> Self {
        match raw[0] {
            0x00 => Self::Free,
            _ => Self::Occupied(ShortDirEntry::decode(raw)),
        }
    }

    pub fn entry(self) -> Option<ShortDirEntry> {
        match self {
            Self::Free => None,
            Self::Occupied(dirent) => Some(dirent),
        }
    }
}

/// 将目录簇切分为槽位
pub fn dir_slots(data: &[u8]) -> impl Iterator<Item = DirSlot> + '_ {
    data.chunks_exact(DIR_ENTRY_BYTES).map(DirSlot::parse)
}
