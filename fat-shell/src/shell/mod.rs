//! 交互式命令行
//!
//! 每行一条命令；出错时打印信息并继续读取下一行，遇到EOF或`exit`时退出。

mod parser;
mod path;

use std::io::{self, BufRead, Write};

use fat::volume::{CLUSTER_COUNT, CLUSTER_SIZE};
use fat::{ClusterId, FatFileSystem};
use typed_bytesize::ByteSizeIec;
use vfs::Error;

use self::parser::{Command, Redirect, parse_command};
use self::path::cluster_of;

const HELP: &str = "\
Available commands:
  help                  - Show this help message
  ls                    - List directory contents
  cd <dir>              - Change directory (use '..' for parent, '/' for root)
  pwd                   - Print the current directory
  mkdir <name>          - Create a new directory
  rmdir <name>          - Remove an empty directory
  touch <name.ext>      - Create a new empty file
  rm <name>             - Delete a file
  cat <name.ext>        - Display file contents
  echo <text> > <file>  - Write text to a file
  echo <text> >> <file> - Append a line to a file
  rename <old> <new>    - Rename a file or directory
  cp <src> <dest>       - Copy a file
  mv <src> <dest>       - Move a file
  stat <name>           - Show entry metadata
  df                    - Show free space
  clear                 - Clear the screen
  exit                  - Exit the shell";

/// 导航栈中的一级目录
#[derive(Debug, Clone)]
struct Frame {
    cluster: ClusterId,
    name: String,
}

#[derive(Debug)]
pub struct Shell {
    fs: FatFileSystem,
    /// 从根目录到当前目录途经的各级目录，根目录时为空
    stack: Vec<Frame>,
}

impl Shell {
    pub fn new(fs: FatFileSystem) -> Self {
        Self {
            fs,
            stack: Vec::new(),
        }
    }

    pub fn cwd(&self) -> ClusterId {
        cluster_of(&self.stack)
    }

    /// 形如`H:/DOCS/`
    pub fn path(&self) -> String {
        let mut path = String::from("H:/");
        for frame in &self.stack {
            path.push_str(&frame.name);
            path.push('/');
        }
        path
    }

    pub fn run(&mut self, mut input: impl BufRead, mut out: impl Write) -> io::Result<()> {
        writeln!(out, "Type 'help' for available commands.")?;
        writeln!(out)?;

        let mut line = String::new();
        loop {
            write!(out, "{}> ", self.path())?;
            out.flush()?;

            line.clear();
            if input.read_line(&mut line)? == 0 {
                writeln!(out)?;
                writeln!(out, "Exiting shell...")?;
                return Ok(());
            }
            if !self.execute(&line, &mut out)? {
                return Ok(());
            }
        }
    }

    /// 执行一行命令，返回是否继续。
    pub fn execute(&mut self, line: &str, out: &mut impl Write) -> io::Result<bool> {
        let reply = match parse_command(line) {
            Command::Empty => return Ok(true),
            Command::Exit => {
                writeln!(out, "Exiting shell...")?;
                return Ok(false);
            }
            Command::Clear => {
                write!(out, "\x1B[2J\x1B[1;1H")?;
                return Ok(true);
            }
            Command::Help => Ok(HELP.to_owned()),
            Command::Usage(usage) => Ok(format!("Usage: {usage}")),
            Command::Unknown(cmd) => Ok(format!(
                "Unknown command: {cmd}. Type 'help' for available commands."
            )),
            Command::Ls => self.ls(),
            Command::Pwd => Ok(self.path()),
            Command::Df => Ok(self.df()),
            Command::Cd(path) => self.cd(path),
            Command::Mkdir(path) => self.mkdir(path),
            Command::Rmdir(path) => self.rmdir(path),
            Command::Touch(path) => self.touch(path),
            Command::Rm(path) => self.rm(path),
            Command::Cat(path) => self.cat(path),
            Command::Stat(path) => self.stat(path),
            Command::Echo(text) => Ok(text.to_owned()),
            Command::Write {
                text,
                file,
                redirect,
            } => self.write(text, file, redirect),
            Command::Rename(old, new) => self.rename(old, new),
            Command::Cp(src, dst) => self.cp(src, dst),
            Command::Mv(src, dst) => self.mv(src, dst),
        };

        match reply {
            Ok(reply) if reply.is_empty() => (),
            Ok(reply) => writeln!(out, "{reply}")?,
            Err(e) => {
                log::debug!("{:?} failed: {e:?}", line.trim());
                writeln!(out, "Error: {e}")?;
            }
        }
        Ok(true)
    }
}

impl Shell {
    fn ls(&self) -> vfs::Result<String> {
        let dirents = self.fs.list_entries(self.cwd())?;
        if dirents.is_empty() {
            return Ok("(empty directory)".to_owned());
        }

        let lines: Vec<String> = dirents
            .iter()
            .map(|dirent| {
                let name = dirent.name().to_string();
                if dirent.is_dir() {
                    format!("{name}/")
                } else {
                    format!("{name:<12} {:>8}", dirent.size())
                }
            })
            .collect();
        Ok(lines.join("\n"))
    }

    fn df(&self) -> String {
        let free = self.fs.free_clusters();
        let total = CLUSTER_COUNT - usize::from(ClusterId::MIN);
        let bytes = ByteSizeIec((free * CLUSTER_SIZE) as u64);
        format!("{free} of {total} clusters free ({bytes} available)")
    }

    fn cd(&mut self, path: &str) -> vfs::Result<String> {
        if path == ".." && self.stack.is_empty() {
            return Ok("Already at root directory".to_owned());
        }
        self.stack = self.walk(path)?;
        Ok(String::new())
    }

    fn mkdir(&mut self, path: &str) -> vfs::Result<String> {
        let (dir, name) = self.locate(path)?;
        self.fs.create_dir(dir, name)?;
        Ok(format!("Created directory: {path}"))
    }

    /// 当前目录及其上级目录不可删除
    fn rmdir(&mut self, path: &str) -> vfs::Result<String> {
        let frames = self.walk(path)?;
        let target = cluster_of(&frames);
        if frames.is_empty() || self.stack.iter().any(|frame| frame.cluster == target) {
            return Ok(format!("Cannot remove a directory on the current path: {path}"));
        }

        let (dir, name) = self.locate(path)?;
        self.fs.remove_dir(dir, name)?;
        Ok(format!("Removed directory: {path}"))
    }

    fn touch(&mut self, path: &str) -> vfs::Result<String> {
        let (dir, name) = self.locate(path)?;
        self.fs.create_file(dir, name)?;
        Ok(format!("Created file: {path}"))
    }

    fn rm(&mut self, path: &str) -> vfs::Result<String> {
        let (dir, name) = self.locate(path)?;
        self.fs.remove_file(dir, name)?;
        Ok(format!("Deleted file: {path}"))
    }

    fn cat(&self, path: &str) -> vfs::Result<String> {
        let (dir, name) = self.locate(path)?;
        let data = self.fs.read_file(dir, name)?;
        if data.is_empty() {
            return Ok("(empty file)".to_owned());
        }
        Ok(String::from_utf8_lossy(&data).into_owned())
    }

    fn stat(&self, path: &str) -> vfs::Result<String> {
        let (dir, name) = self.locate(path)?;
        let dirent = self.fs.find(dir, name)?;
        let stat = self.fs.stat_entry(&dirent)?;
        let kind = if stat.mode.is_dir() { "directory" } else { "file" };

        Ok(format!(
            "  Name: {}\n  Type: {kind}\n  Size: {} bytes\n  First cluster: {}\n  Clusters: {}",
            dirent.name(),
            stat.size,
            stat.first_cluster,
            stat.clusters,
        ))
    }

    /// 目标不存在时先创建；追加时以换行连接旧内容与新文本。
    fn write(&mut self, text: &str, file: &str, redirect: Redirect) -> vfs::Result<String> {
        let (dir, name) = self.locate(file)?;
        let content = match self.fs.find_entry(dir, name)? {
            None => {
                self.fs.create_file(dir, name)?;
                text.as_bytes().to_vec()
            }
            Some(_) if redirect == Redirect::Append => {
                let mut content = self.fs.read_file(dir, name)?;
                if !content.is_empty() {
                    content.push(b'\n');
                }
                content.extend_from_slice(text.as_bytes());
                content
            }
            Some(_) => text.as_bytes().to_vec(),
        };
        self.fs.write_file(dir, name, &content)?;

        let verb = match redirect {
            Redirect::Overwrite => "Wrote to",
            Redirect::Append => "Appended to",
        };
        Ok(format!("{verb} file: {file}"))
    }

    /// 只在同一目录内改名
    fn rename(&mut self, old: &str, new: &str) -> vfs::Result<String> {
        if new.contains('/') {
            return Err(Error::InvalidName);
        }
        let (dir, name) = self.locate(old)?;
        self.fs.rename(dir, name, new)?;
        Ok(format!("Renamed {old} to {new}"))
    }

    fn cp(&mut self, src: &str, dst: &str) -> vfs::Result<String> {
        let (src_dir, src_name) = self.locate(src)?;
        let (dst_dir, dst_name) = self.locate(dst)?;
        self.fs.copy_file(src_dir, src_name, dst_dir, dst_name)?;
        Ok(format!("Copied {src} to {dst}"))
    }

    fn mv(&mut self, src: &str, dst: &str) -> vfs::Result<String> {
        let (src_dir, src_name) = self.locate(src)?;
        let (dst_dir, dst_name) = self.locate(dst)?;
        self.fs.move_file(src_dir, src_name, dst_dir, dst_name)?;
        Ok(format!("Moved {src} to {dst}"))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use block_dev::{BlockDevice, RamDisk};

    use super::*;

    fn shell() -> Shell {
        let disk: Arc<dyn BlockDevice> = Arc::new(RamDisk::new(CLUSTER_COUNT, CLUSTER_SIZE));
        Shell::new(FatFileSystem::mount(disk).unwrap())
    }

    fn exec(shell: &mut Shell, line: &str) -> String {
        let mut out = Vec::new();
        assert!(shell.execute(line, &mut out).unwrap());
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn echo_and_cat() {
        let mut sh = shell();

        assert_eq!("hi there\n", exec(&mut sh, "echo hi there"));
        assert_eq!(
            "Wrote to file: hello.txt\n",
            exec(&mut sh, "echo Hello World! > hello.txt")
        );
        assert_eq!("Hello World!\n", exec(&mut sh, "cat hello.txt"));

        exec(&mut sh, "echo again >> hello.txt");
        assert_eq!("Hello World!\nagain\n", exec(&mut sh, "cat hello.txt"));

        exec(&mut sh, "echo reset > hello.txt");
        assert_eq!("reset\n", exec(&mut sh, "cat hello.txt"));

        exec(&mut sh, "touch empty.txt");
        assert_eq!("(empty file)\n", exec(&mut sh, "cat empty.txt"));
        assert_eq!("Usage: cat <file_name.EXT>\n", exec(&mut sh, "cat hello"));
    }

    #[test]
    fn navigation() {
        let mut sh = shell();

        assert_eq!("Already at root directory\n", exec(&mut sh, "cd .."));
        assert_eq!("Created directory: docs\n", exec(&mut sh, "mkdir docs"));
        exec(&mut sh, "mkdir docs/deep");

        assert_eq!("", exec(&mut sh, "cd docs/deep"));
        assert_eq!("H:/DOCS/DEEP/\n", exec(&mut sh, "pwd"));
        exec(&mut sh, "cd ..");
        assert_eq!("H:/DOCS/\n", exec(&mut sh, "pwd"));
        exec(&mut sh, "cd /");
        assert_eq!("H:/\n", exec(&mut sh, "pwd"));

        assert_eq!("Error: entry not found\n", exec(&mut sh, "cd nope"));
        exec(&mut sh, "touch a.txt");
        assert_eq!("Error: not a directory\n", exec(&mut sh, "cd a.txt"));
        assert_eq!("H:/\n", exec(&mut sh, "pwd"));
    }

    #[test]
    fn listing() {
        let mut sh = shell();

        assert_eq!("(empty directory)\n", exec(&mut sh, "ls"));
        exec(&mut sh, "mkdir docs");
        exec(&mut sh, "echo abc > a.txt");

        let out = exec(&mut sh, "ls");
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(2, lines.len());
        assert_eq!("DOCS/", lines[0]);
        assert!(lines[1].starts_with("A.TXT "));
        assert!(lines[1].ends_with(" 3"));
    }

    #[test]
    fn paths_across_directories() {
        let mut sh = shell();
        exec(&mut sh, "mkdir docs");
        exec(&mut sh, "echo x > docs/a.txt");

        assert_eq!("x\n", exec(&mut sh, "cat docs/a.txt"));
        assert_eq!(
            "Copied docs/a.txt to /b.txt\n",
            exec(&mut sh, "cp docs/a.txt /b.txt")
        );

        exec(&mut sh, "cd docs");
        assert_eq!("x\n", exec(&mut sh, "cat ../b.txt"));
        assert_eq!("x\n", exec(&mut sh, "cat /docs/./a.txt"));

        assert_eq!("Moved a.txt to ../c.txt\n", exec(&mut sh, "mv a.txt ../c.txt"));
        assert_eq!("Error: entry not found\n", exec(&mut sh, "cat a.txt"));
        assert_eq!("x\n", exec(&mut sh, "cat /c.txt"));
    }

    #[test]
    fn errors_keep_shell_running() {
        let mut sh = shell();
        exec(&mut sh, "mkdir docs");
        exec(&mut sh, "touch docs/a.txt");

        assert_eq!("Error: directory not empty\n", exec(&mut sh, "rmdir docs"));
        assert_eq!("Error: entry already exists\n", exec(&mut sh, "mkdir docs"));
        assert_eq!("Error: is a directory\n", exec(&mut sh, "rm docs"));
        assert_eq!(
            "Unknown command: frob. Type 'help' for available commands.\n",
            exec(&mut sh, "frob")
        );

        exec(&mut sh, "rm docs/a.txt");
        assert_eq!("Removed directory: docs\n", exec(&mut sh, "rmdir docs"));
    }

    #[test]
    fn rmdir_after_emptying() {
        let mut sh = shell();
        for line in ["mkdir DIR1", "cd DIR1", "touch B.TXT", "cd .."] {
            exec(&mut sh, line);
        }
        assert_eq!("Error: directory not empty\n", exec(&mut sh, "rmdir DIR1"));

        for line in ["cd DIR1", "rm B.TXT", "cd .."] {
            exec(&mut sh, line);
        }
        assert_eq!("Removed directory: DIR1\n", exec(&mut sh, "rmdir DIR1"));
        assert_eq!("(empty directory)\n", exec(&mut sh, "ls"));
    }

    #[test]
    fn rmdir_refuses_current_path() {
        let mut sh = shell();
        for line in ["mkdir d", "mkdir d/e", "cd d/e"] {
            exec(&mut sh, line);
        }

        for line in ["rmdir ../e", "rmdir ..", "rmdir .", "rmdir /d", "rmdir /"] {
            let out = exec(&mut sh, line);
            assert!(out.starts_with("Cannot remove a directory on the current path"), "{line}");
        }
        assert_eq!("H:/D/E/\n", exec(&mut sh, "pwd"));

        exec(&mut sh, "echo hello > a.txt");
        let out = exec(&mut sh, "ls");
        assert_eq!(1, out.lines().count());
        assert!(out.starts_with("A.TXT "));

        exec(&mut sh, "rm a.txt");
        exec(&mut sh, "cd /");
        assert_eq!("Removed directory: d/e\n", exec(&mut sh, "rmdir d/e"));
        assert_eq!("Removed directory: d\n", exec(&mut sh, "rmdir d"));
    }

    #[test]
    fn rename_and_stat() {
        let mut sh = shell();
        exec(&mut sh, "echo hi > a.txt");

        assert_eq!("Renamed a.txt to b.txt\n", exec(&mut sh, "rename a.txt b.txt"));
        let out = exec(&mut sh, "stat b.txt");
        assert!(out.contains("Name: B.TXT"));
        assert!(out.contains("Type: file"));
        assert!(out.contains("Size: 2 bytes"));
        assert!(out.contains("Clusters: 1"));
        assert_eq!("Error: invalid 8.3 name\n", exec(&mut sh, "rename b.txt d/c.txt"));
    }

    #[test]
    fn free_space() {
        let mut sh = shell();
        assert!(exec(&mut sh, "df").starts_with("1018 of 1018 clusters free"));
        exec(&mut sh, "mkdir docs");
        assert!(exec(&mut sh, "df").starts_with("1017 of 1018 clusters free"));
    }

    #[test]
    fn exit_and_eof() {
        let mut sh = shell();
        let mut out = Vec::new();
        assert!(!sh.execute("exit", &mut out).unwrap());
        assert_eq!(b"Exiting shell...\n", &out[..]);

        let mut out = Vec::new();
        sh.run(&b"mkdir d\nls\n"[..], &mut out).unwrap();
        let out = String::from_utf8(out).unwrap();
        assert!(out.contains("Created directory: d\n"));
        assert!(out.contains("H:/> D/\n"));
        assert!(out.ends_with("Exiting shell...\n"));
    }
}
