//! 简化的FAT文件系统
//!
//! 自下而上：
//!
//! - [`volume::fat::FatArea`]：簇分配表，管理簇链表的分配、追加、遍历与释放；
//! - 目录引擎：目录项的编解码，以及在目录簇链表中查找、插入、删除目录项；
//! - [`FatFileSystem`]：组合以上两者，提供文件与目录的操作。

#![no_std]

extern crate alloc;

mod cluster;
mod control;
mod dir;
mod fs;
pub mod volume;

pub use self::{
    cluster::ClusterId,
    control::FatFileSystem,
    volume::data::{ShortDirEntry, ShortName, format_name},
};
