// SPDX-License-Identifier: GPL-3.0-only

//! Snapshot lifecycle for one volume
//!
//! Backups run `create snapshot → mount → backup tool → unmount → remove
//! snapshot`. Each acquired resource is held by a lease that releases it on
//! every exit path, innermost first: once the snapshot exists it is always
//! removed, and once it is mounted it is always unmounted before removal.
//! Failed releases are reported and turn the volume status into 1.
//!
//! Restore, verify and the archive maintenance operations need no
//! point-in-time source and call the backup tool directly.
//!
//! A process killed between creation and removal leaves the snapshot (and
//! possibly its mount) behind; leftovers from earlier runs are not
//! reconciled here.

use std::path::{Path, PathBuf};

use storage_contracts::{BackupTool, SnapshotOps, StorageError};
use storage_types::{MountInfo, Operation, SnapshotSpec, bytes_to_pretty};
use tracing::{debug, error, info, warn};

use crate::command::{destination_url, tool_args};
use crate::config::Configuration;
use crate::error::LifecycleError;
use crate::lookup::VolumeTarget;
use crate::policy::snapshot_size_for;

/// Outcome of one volume's lifecycle
#[derive(Debug)]
pub struct VolumeRun {
    pub device: String,
    /// 0 on success; the last failure's status otherwise
    pub status: i32,
    pub errors: Vec<LifecycleError>,
}

impl VolumeRun {
    fn new(device: &str) -> Self {
        Self {
            device: device.to_string(),
            status: 0,
            errors: Vec::new(),
        }
    }

    fn fail(&mut self, failure: LifecycleError) {
        error!(device = %self.device, "{failure}");
        self.status = failure.status();
        self.errors.push(failure);
    }

    pub fn succeeded(&self) -> bool {
        self.status == 0
    }
}

/// Snapshot mount directory, removed again when dropped
struct MountDir<'a> {
    ops: &'a dyn SnapshotOps,
    dir: PathBuf,
}

impl<'a> MountDir<'a> {
    fn prepare(ops: &'a dyn SnapshotOps, dir: &Path) -> Result<Self, StorageError> {
        ops.ensure_directory(dir)?;
        Ok(Self {
            ops,
            dir: dir.to_path_buf(),
        })
    }
}

impl Drop for MountDir<'_> {
    fn drop(&mut self) {
        if let Err(error) = self.ops.remove_directory(&self.dir) {
            debug!("Keeping {}: {error}", self.dir.display());
        }
    }
}

/// A created snapshot volume
struct SnapshotLease<'a> {
    ops: &'a dyn SnapshotOps,
    name: String,
    held: bool,
}

impl<'a> SnapshotLease<'a> {
    fn create(ops: &'a dyn SnapshotOps, spec: &SnapshotSpec) -> Result<Self, StorageError> {
        ops.create_snapshot(&spec.source, spec.size_kib(), &spec.name)?;
        Ok(Self {
            ops,
            name: spec.qualified_name(),
            held: true,
        })
    }

    fn release(mut self) -> Result<(), StorageError> {
        self.held = false;
        self.ops.remove_snapshot(&self.name, true)
    }
}

impl Drop for SnapshotLease<'_> {
    fn drop(&mut self) {
        if !self.held {
            return;
        }
        warn!("Removing snapshot {} on an early exit", self.name);
        if let Err(error) = self.ops.remove_snapshot(&self.name, true) {
            error!("Snapshot {} left behind: {error}", self.name);
        }
    }
}

/// A mounted snapshot
struct MountLease<'a> {
    ops: &'a dyn SnapshotOps,
    dir: PathBuf,
    held: bool,
}

impl<'a> MountLease<'a> {
    fn mount(
        ops: &'a dyn SnapshotOps,
        spec: &SnapshotSpec,
        source_mount: &MountInfo,
    ) -> Result<Self, StorageError> {
        ops.mount(
            &spec.device_path(),
            &source_mount.fs_type,
            &source_mount.snapshot_mount_options(),
            &spec.mount_dir,
        )?;
        Ok(Self {
            ops,
            dir: spec.mount_dir.clone(),
            held: true,
        })
    }

    fn release(mut self) -> Result<(), StorageError> {
        self.held = false;
        self.ops.unmount(&self.dir)
    }
}

impl Drop for MountLease<'_> {
    fn drop(&mut self) {
        if !self.held {
            return;
        }
        warn!("Unmounting {} on an early exit", self.dir.display());
        if let Err(error) = self.ops.unmount(&self.dir) {
            error!("{} left mounted: {error}", self.dir.display());
        }
    }
}

pub struct LifecycleController<'a> {
    ops: &'a dyn SnapshotOps,
    tool: &'a dyn BackupTool,
    config: &'a Configuration,
}

impl<'a> LifecycleController<'a> {
    pub fn new(
        ops: &'a dyn SnapshotOps,
        tool: &'a dyn BackupTool,
        config: &'a Configuration,
    ) -> Self {
        Self { ops, tool, config }
    }

    /// Run the configured operation against one validated volume.
    pub fn run(&self, target: &VolumeTarget) -> VolumeRun {
        let destination = destination_url(&self.config.destination, &target.volume);
        let mount_point = Path::new(&target.mount.mount_point);

        match &self.config.request.operation {
            Operation::Unset | Operation::Full | Operation::Incremental => {
                self.run_from_snapshot(target, &destination)
            }
            Operation::Restore { base_dir } => {
                let restore_dir = base_dir.join(target.volume.qualified_name());
                self.run_restore(target, &destination, &restore_dir)
            }
            Operation::Verify => self.run_direct(target, &destination, mount_point),
            Operation::CollectionStatus
            | Operation::ListCurrentFiles
            | Operation::Cleanup
            | Operation::RemoveOlderThan { .. }
            | Operation::RemoveAllButNFull { .. } => {
                self.run_direct(target, &destination, mount_point)
            }
        }
    }

    fn run_from_snapshot(&self, target: &VolumeTarget, destination: &str) -> VolumeRun {
        let mut run = VolumeRun::new(&target.device_path);
        let size = snapshot_size_for(&target.volume, &self.config.sizing);
        let spec = SnapshotSpec::for_volume(&target.volume, size, &self.config.snapshot_mount_base);
        info!(
            device = %target.device_path,
            "Snapshot {} sized {}",
            spec.qualified_name(),
            bytes_to_pretty(size, true)
        );

        let _mount_dir = match MountDir::prepare(self.ops, &spec.mount_dir) {
            Ok(dir) => dir,
            Err(source) => {
                run.fail(LifecycleError::PrepareDirectory {
                    dir: spec.mount_dir.clone(),
                    source,
                });
                return run;
            }
        };

        let snapshot = match SnapshotLease::create(self.ops, &spec) {
            Ok(snapshot) => snapshot,
            Err(source) => {
                run.fail(LifecycleError::CreateSnapshot {
                    name: spec.qualified_name(),
                    source,
                });
                return run;
            }
        };

        let mounted = match MountLease::mount(self.ops, &spec, &target.mount) {
            Ok(mounted) => mounted,
            Err(source) => {
                run.fail(LifecycleError::Mount {
                    dir: spec.mount_dir.clone(),
                    source,
                });
                if let Err(source) = snapshot.release() {
                    run.fail(LifecycleError::RemoveSnapshot {
                        name: spec.qualified_name(),
                        source,
                    });
                }
                return run;
            }
        };

        let args = tool_args(&self.config.request, destination, &spec.mount_dir);
        self.run_tool(&mut run, &args);

        if let Err(source) = mounted.release() {
            run.fail(LifecycleError::Unmount {
                dir: spec.mount_dir.clone(),
                source,
            });
        }
        if let Err(source) = snapshot.release() {
            run.fail(LifecycleError::RemoveSnapshot {
                name: spec.qualified_name(),
                source,
            });
        }

        run
    }

    fn run_restore(
        &self,
        target: &VolumeTarget,
        destination: &str,
        restore_dir: &Path,
    ) -> VolumeRun {
        let mut run = VolumeRun::new(&target.device_path);
        if let Err(source) = self.ops.ensure_directory(restore_dir) {
            run.fail(LifecycleError::PrepareDirectory {
                dir: restore_dir.to_path_buf(),
                source,
            });
            return run;
        }

        let args = tool_args(&self.config.request, destination, restore_dir);
        self.run_tool(&mut run, &args);
        run
    }

    fn run_direct(&self, target: &VolumeTarget, destination: &str, local: &Path) -> VolumeRun {
        let mut run = VolumeRun::new(&target.device_path);
        let args = tool_args(&self.config.request, destination, local);
        self.run_tool(&mut run, &args);
        run
    }

    fn run_tool(&self, run: &mut VolumeRun, args: &[String]) {
        info!(
            device = %run.device,
            "Running {} {}",
            self.config.backup_tool,
            self.config.request.operation.label()
        );
        match self.tool.run(args) {
            Ok(0) => {}
            Ok(code) => run.fail(LifecycleError::ToolExit(code)),
            Err(source) => run.fail(LifecycleError::ToolLaunch(source)),
        }
    }
}
