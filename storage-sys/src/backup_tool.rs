// SPDX-License-Identifier: GPL-3.0-only

use storage_contracts::{BackupTool, StorageError, StorageErrorKind};
use tracing::info;

use crate::cmd::CommandRunner;

/// Default backup program
pub const DEFAULT_BACKUP_TOOL: &str = "duplicity";

/// Runs the backup program with inherited stdio
#[derive(Debug, Clone)]
pub struct ToolRunner {
    program: String,
    runner: CommandRunner,
}

impl ToolRunner {
    pub fn new(program: impl Into<String>, runner: CommandRunner) -> Self {
        Self {
            program: program.into(),
            runner,
        }
    }
}

impl BackupTool for ToolRunner {
    fn run(&self, args: &[String]) -> Result<i32, StorageError> {
        let code = self.runner.status(&self.program, args).map_err(|error| {
            StorageError::new(
                StorageErrorKind::Unavailable,
                format!("failed to run {}: {error}", self.program),
            )
        })?;
        info!("{} exited with status {code}", self.program);
        Ok(code)
    }
}
