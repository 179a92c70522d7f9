//! 保留区：超级块(#0)与FAT区(#1~#4)。FAT区见[`super::fat`]。

mod superblock;

pub use self::superblock::SuperBlock;
