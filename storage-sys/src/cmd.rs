// SPDX-License-Identifier: GPL-3.0-only

//! Process execution with a dry-run policy
//!
//! Queries always run. Effectful commands are echoed instead of executed
//! when the runner is in dry-run mode, and report success so callers keep
//! their normal control flow.

use std::os::unix::process::ExitStatusExt;
use std::process::{Command, ExitStatus};

use tracing::debug;

use crate::error::{Result, SysError};

#[derive(Debug, Clone, Copy, Default)]
pub struct ExecuteOptions {
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub command: String,
    pub stdout: String,
    pub stderr: String,
    pub executed: bool,
}

pub fn render(command: &str, args: &[String]) -> String {
    if args.is_empty() {
        command.to_string()
    } else {
        let args: Vec<String> = args.iter().map(|arg| quote(arg)).collect();
        format!("{} {}", command, args.join(" "))
    }
}

fn quote(arg: &str) -> String {
    if !arg.is_empty() && !arg.contains(char::is_whitespace) && !arg.contains('\'') {
        return arg.to_string();
    }
    format!("'{}'", arg.replace('\'', r"'\''"))
}

/// Exit code of a finished process; signals map to 128 + signal number.
pub fn exit_code(status: ExitStatus) -> i32 {
    match (status.code(), status.signal()) {
        (Some(code), _) => code,
        (None, Some(signal)) => 128 + signal,
        (None, None) => 1,
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct CommandRunner {
    options: ExecuteOptions,
}

impl CommandRunner {
    pub fn new(options: ExecuteOptions) -> Self {
        Self { options }
    }

    pub fn is_dry_run(&self) -> bool {
        self.options.dry_run
    }

    /// Print the command a dry run stands in for.
    pub fn echo(&self, rendered: &str) {
        println!("[dry-run] {rendered}");
    }

    /// Run a read-only command, also in dry-run mode.
    ///
    /// Returns `None` when the command exits non-zero.
    pub fn query(&self, command: &str, args: &[String]) -> Result<Option<String>> {
        let rendered = render(command, args);
        debug!("query: {rendered}");

        let output = Command::new(command).args(args).output()?;
        if !output.status.success() {
            debug!(
                "{rendered} exited with {}: {}",
                exit_code(output.status),
                String::from_utf8_lossy(&output.stderr).trim()
            );
            return Ok(None);
        }

        Ok(Some(String::from_utf8_lossy(&output.stdout).to_string()))
    }

    /// Run an effectful command, failing on a non-zero exit.
    pub fn execute(&self, command: &str, args: &[String]) -> Result<CommandOutcome> {
        let rendered = render(command, args);
        if self.options.dry_run {
            self.echo(&rendered);
            return Ok(CommandOutcome {
                command: rendered,
                stdout: String::new(),
                stderr: String::new(),
                executed: false,
            });
        }

        debug!("execute: {rendered}");
        let output = Command::new(command)
            .args(args)
            .output()
            .map_err(|error| SysError::CommandFailed {
                command: rendered.clone(),
                stderr: error.to_string(),
            })?;

        if !output.status.success() {
            return Err(SysError::CommandFailed {
                command: rendered,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        Ok(CommandOutcome {
            command: rendered,
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            executed: true,
        })
    }

    /// Run an effectful command with inherited stdio and return its exit code.
    pub fn status(&self, command: &str, args: &[String]) -> Result<i32> {
        let rendered = render(command, args);
        if self.options.dry_run {
            self.echo(&rendered);
            return Ok(0);
        }

        debug!("run: {rendered}");
        let status = Command::new(command).args(args).status()?;
        Ok(exit_code(status))
    }
}

/// Fail with [`SysError::ToolNotFound`] for the first tool missing from PATH.
pub fn require_tools(tools: &[&str]) -> Result<()> {
    for tool in tools {
        if which::which(tool).is_err() {
            return Err(SysError::ToolNotFound((*tool).to_string()));
        }
    }
    Ok(())
}
