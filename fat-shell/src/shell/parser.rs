//! 命令行解析：第一个空格之前为命令（不区分大小写），之后为参数。

/// `echo`的重定向方式
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redirect {
    /// `>`
    Overwrite,
    /// `>>`
    Append,
}

#[derive(Debug, PartialEq, Eq)]
pub enum Command<'a> {
    Empty,
    Help,
    Exit,
    Clear,
    Ls,
    Pwd,
    Df,
    Cd(&'a str),
    Mkdir(&'a str),
    Rmdir(&'a str),
    Touch(&'a str),
    Rm(&'a str),
    Cat(&'a str),
    Stat(&'a str),
    /// 不带重定向的`echo`
    Echo(&'a str),
    Write {
        text: &'a str,
        file: &'a str,
        redirect: Redirect,
    },
    Rename(&'a str, &'a str),
    Cp(&'a str, &'a str),
    Mv(&'a str, &'a str),
    /// 参数不合法，附带正确的用法
    Usage(&'static str),
    Unknown(&'a str),
}

pub fn parse_command(input: &str) -> Command<'_> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Command::Empty;
    }

    let (cmd, args) = trimmed.split_once(' ').unwrap_or((trimmed, ""));
    let args = args.trim();

    match cmd.to_ascii_lowercase().as_str() {
        "help" => Command::Help,
        "exit" => Command::Exit,
        "clear" => Command::Clear,
        "ls" => Command::Ls,
        "pwd" => Command::Pwd,
        "df" => Command::Df,
        "cd" => one(args, Command::Cd, "cd <directory>"),
        "mkdir" => one(args, Command::Mkdir, "mkdir <directory_name>"),
        "rmdir" => one(args, Command::Rmdir, "rmdir <directory_name>"),
        "rm" => one(args, Command::Rm, "rm <file_name>"),
        "stat" => one(args, Command::Stat, "stat <name>"),
        "touch" if args.contains('.') => Command::Touch(args),
        "touch" => Command::Usage("touch <file_name.EXT>"),
        "cat" if args.contains('.') => Command::Cat(args),
        "cat" => Command::Usage("cat <file_name.EXT>"),
        "echo" => echo(args),
        "rename" => two(args, Command::Rename, "rename <old_name> <new_name>"),
        "cp" => two(args, Command::Cp, "cp <source> <destination>"),
        "mv" => two(args, Command::Mv, "mv <source> <destination>"),
        _ => Command::Unknown(cmd),
    }
}

fn one<'a>(
    args: &'a str,
    make: fn(&'a str) -> Command<'a>,
    usage: &'static str,
) -> Command<'a> {
    if args.is_empty() {
        Command::Usage(usage)
    } else {
        make(args)
    }
}

fn two<'a>(
    args: &'a str,
    make: fn(&'a str, &'a str) -> Command<'a>,
    usage: &'static str,
) -> Command<'a> {
    let mut parts = args.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(a), Some(b), None) => make(a, b),
        _ => Command::Usage(usage),
    }
}

/// `>>`优先于`>`
fn echo(args: &str) -> Command<'_> {
    let (text, file, redirect) = if let Some((text, file)) = args.split_once(">>") {
        (text, file, Redirect::Append)
    } else if let Some((text, file)) = args.split_once('>') {
        (text, file, Redirect::Overwrite)
    } else {
        return Command::Echo(args);
    };

    let file = file.trim();
    if file.is_empty() {
        return Command::Usage("echo <text> > <file>");
    }
    Command::Write {
        text: text.trim(),
        file,
        redirect,
    }
}
