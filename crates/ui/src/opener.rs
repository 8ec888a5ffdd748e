use std::io;
use std::process::{Child, Command, Stdio};
use std::thread;

use tracing::debug;

/// Opens `url` in the system browser without waiting for it to exit.
///
/// Only `http` and `https` urls are accepted.
pub fn open_in_browser(url: &str) -> io::Result<()> {
    ensure_web_url(url)?;
    let child = browser_command(url)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .spawn()?;
    reap_in_background(child);
    Ok(())
}

/// Waits for `child` on a helper thread so it does not linger as a zombie.
fn reap_in_background(mut child: Child) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        if let Err(error) = child.wait() {
            debug!(%error, "failed to wait for browser opener");
        }
    })
}

fn ensure_web_url(url: &str) -> io::Result<()> {
    let lower = url.trim_start().to_ascii_lowercase();
    if lower.starts_with("https://") || lower.starts_with("http://") {
        Ok(())
    } else {
        Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("refusing to open non-web url: {url}"),
        ))
    }
}

#[cfg(target_os = "macos")]
fn browser_command(url: &str) -> Command {
    let mut command = Command::new("open");
    command.arg(url);
    command
}

#[cfg(target_os = "windows")]
fn browser_command(url: &str) -> Command {
    let mut command = Command::new("rundll32");
    command.arg("url.dll,FileProtocolHandler").arg(url);
    command
}

#[cfg(not(any(target_os = "macos", target_os = "windows")))]
fn browser_command(url: &str) -> Command {
    let mut command = Command::new("xdg-open");
    command.arg(url);
    command
}
