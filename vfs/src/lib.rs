#![no_std]

mod dirent;
mod error;
mod stat;

pub use self::{
    dirent::DirEntryType,
    error::{Error, Result},
    stat::Stat,
};
