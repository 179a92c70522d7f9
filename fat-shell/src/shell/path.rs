//! 路径解析
//!
//! 以`/`开头的路径从根目录出发，否则从当前目录出发；
//! `.`与空分量被跳过，`..`退回上一级（在根目录时不动），其余分量须为目录。

use fat::ClusterId;
use vfs::Error;

use super::{Frame, Shell};

impl Shell {
    /// 逐级解析目录路径，返回从根目录到目标目录的各级目录。
    pub(super) fn walk(&self, path: &str) -> vfs::Result<Vec<Frame>> {
        let mut frames = if path.starts_with('/') {
            Vec::new()
        } else {
            self.stack.clone()
        };

        for cmp in path.split('/') {
            match cmp {
                "" | "." => (),
                ".." => {
                    frames.pop();
                }
                name => {
                    let dirent = self.fs.find(cluster_of(&frames), name)?;
                    if !dirent.is_dir() {
                        return Err(Error::NotADirectory);
                    }
                    frames.push(Frame {
                        cluster: dirent.cluster_id(),
                        name: dirent.name().to_string(),
                    });
                }
            }
        }

        Ok(frames)
    }

    /// 返回路径的`(父目录, 文件名)`，父目录须已存在。
    pub(super) fn locate<'p>(&self, path: &'p str) -> vfs::Result<(ClusterId, &'p str)> {
        let (parent, name) = match path.rsplit_once('/') {
            Some(("", name)) => ("/", name),
            Some((parent, name)) => (parent, name),
            None => return Ok((self.cwd(), path)),
        };
        if matches!(name, "" | "." | "..") {
            return Err(Error::InvalidName);
        }

        Ok((cluster_of(&self.walk(parent)?), name))
    }
}

pub(super) fn cluster_of(frames: &[Frame]) -> ClusterId {
    frames.last().map_or(ClusterId::ROOT, |frame| frame.cluster)
}
