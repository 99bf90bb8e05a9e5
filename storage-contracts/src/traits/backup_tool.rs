// SPDX-License-Identifier: GPL-3.0-only

use crate::StorageError;

/// External backup program.
pub trait BackupTool {
    /// Run the tool with `args` and return its exit code.
    ///
    /// An `Err` means the tool could not be run at all; a non-zero exit
    /// code is reported through `Ok`.
    fn run(&self, args: &[String]) -> Result<i32, StorageError>;
}
