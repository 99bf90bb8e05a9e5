// SPDX-License-Identifier: GPL-3.0-only

//! Low-level system operations for LVM snapshot backups
//!
//! This crate implements the storage contracts against the host:
//! - LVM inventory queries (`vgs`, `lvs`) and snapshot provisioning
//!   (`lvcreate`, `lvremove`)
//! - Mount-table lookup and `mount`/`umount`
//! - Running the external backup program
//!
//! Every effectful command goes through [`cmd::CommandRunner`], which echoes
//! instead of executing in dry-run mode. Most operations require root.

pub mod backup_tool;
pub mod cmd;
pub mod error;
pub mod host;
pub mod logical;
pub mod mounts;

pub use backup_tool::{DEFAULT_BACKUP_TOOL, ToolRunner};
pub use cmd::{CommandOutcome, CommandRunner, ExecuteOptions, require_tools};
pub use error::{Result, SysError};
pub use host::HostSnapshotOps;
pub use logical::LvmTools;
pub use mounts::MountTableFiles;

/// Check that the host tools needed for a run are installed.
///
/// Provisioning tools are only required when commands really execute.
pub fn preflight(options: ExecuteOptions) -> Result<()> {
    require_tools(logical::lvm_tools::QUERY_TOOLS)?;
    if !options.dry_run {
        require_tools(logical::lvm_tools::PROVISIONING_TOOLS)?;
        require_tools(mounts::MOUNT_TOOLS)?;
    }
    Ok(())
}

pub fn is_root() -> bool {
    unsafe { libc::geteuid() == 0 }
}
