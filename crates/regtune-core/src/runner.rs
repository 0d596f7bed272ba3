//! Shell command execution
//!
//! The engine hands shell steps to a [`CommandRunner`] and waits for them.
//! No timeout is applied: a command that hangs stalls the apply pass.

use crate::{Error, Result};
use std::process::{Command, Stdio};

/// Runs one command line through the platform interpreter and waits.
pub trait CommandRunner: Send + Sync {
    fn run(&self, line: &str) -> Result<()>;
}

impl<T: CommandRunner + ?Sized> CommandRunner for &T {
    fn run(&self, line: &str) -> Result<()> {
        (**self).run(line)
    }
}

impl<T: CommandRunner + ?Sized> CommandRunner for std::sync::Arc<T> {
    fn run(&self, line: &str) -> Result<()> {
        (**self).run(line)
    }
}

/// Runs lines through `cmd.exe /c` on Windows and `sh -c` elsewhere.
///
/// Only a failure to start the interpreter is an error. A non-zero exit
/// status is logged and otherwise ignored.
#[derive(Debug, Default, Clone, Copy)]
pub struct ShellRunner;

#[cfg(windows)]
const CREATE_NO_WINDOW: u32 = 0x0800_0000;

impl ShellRunner {
    pub fn new() -> Self {
        Self
    }

    #[cfg(windows)]
    fn command(line: &str) -> Command {
        use std::os::windows::process::CommandExt;

        let mut cmd = Command::new("cmd.exe");
        // Quote the whole line so embedded quotes survive cmd's parsing.
        cmd.raw_arg(format!("/c \"{line}\""))
            .creation_flags(CREATE_NO_WINDOW);
        cmd
    }

    #[cfg(not(windows))]
    fn command(line: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(line);
        cmd
    }
}

impl CommandRunner for ShellRunner {
    fn run(&self, line: &str) -> Result<()> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        tracing::debug!(line, "Running shell command");
        let status = Self::command(line)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .map_err(|source| Error::Spawn {
                line: line.to_string(),
                source,
            })?;

        if !status.success() {
            tracing::warn!(line, code = ?status.code(), "Shell command exited with failure");
        }
        Ok(())
    }
}
