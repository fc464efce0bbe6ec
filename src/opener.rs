//! 用系统默认程序打开链接

use std::io;
use std::process::{Command, Stdio};
use std::thread::{self, JoinHandle};

/// 只允许 http/https 链接，避免把任意字符串交给系统 shell
pub fn is_openable(url: &str) -> bool {
    let url = url.trim();
    url.starts_with("http://") || url.starts_with("https://")
}

/// 打开链接，不等待外部程序结束
pub fn open_url(url: &str) -> io::Result<()> {
    if !is_openable(url) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("不支持的链接: {url}"),
        ));
    }

    let mut cmd = opener_command();
    cmd.arg(url.trim())
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null());
    spawn_and_reap(cmd)?;
    Ok(())
}

/// 启动子进程，并在后台线程中等待其退出，避免留下僵尸进程
fn spawn_and_reap(mut cmd: Command) -> io::Result<JoinHandle<()>> {
    let mut child = cmd.spawn()?;
    Ok(thread::spawn(move || {
        if let Err(e) = child.wait() {
            tracing::debug!(error = %e, "failed to wait for opener");
        }
    }))
}

#[cfg(target_os = "macos")]
fn opener_command() -> Command {
    Command::new("open")
}

#[cfg(target_os = "windows")]
fn opener_command() -> Command {
    Command::new("explorer")
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn opener_command() -> Command {
    Command::new("xdg-open")
}
