// SPDX-License-Identifier: GPL-3.0-only

//! Per-volume iteration with failure isolation

use storage_contracts::{BackupTool, MountTable, SnapshotOps, VolumeInventory};
use tracing::{debug, info, warn};

use crate::config::{Configuration, DEFAULT_VERBOSITY};
use crate::lifecycle::LifecycleController;
use crate::lookup::lookup_volume;
use crate::resolver::ResolvedTarget;

/// Host collaborators a batch is run against
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub inventory: &'a dyn VolumeInventory,
    pub mounts: &'a dyn MountTable,
    pub ops: &'a dyn SnapshotOps,
    pub tool: &'a dyn BackupTool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchResult {
    /// 0 only when every volume succeeded; else the last non-zero status
    pub status: i32,
    pub processed: usize,
    pub succeeded: usize,
    pub skipped: usize,
    pub failed: usize,
}

impl BatchResult {
    fn record(&mut self, status: i32) {
        if status != 0 {
            self.status = status;
        }
    }
}

pub struct BatchRunner<'a> {
    config: &'a Configuration,
    collaborators: Collaborators<'a>,
}

impl<'a> BatchRunner<'a> {
    pub fn new(config: &'a Configuration, collaborators: Collaborators<'a>) -> Self {
        Self {
            config,
            collaborators,
        }
    }

    pub fn run(&self, targets: &[ResolvedTarget]) -> BatchResult {
        let mut result = BatchResult::default();
        let banners = targets.len() > 1 && self.config.verbosity() >= DEFAULT_VERBOSITY;
        let controller = LifecycleController::new(
            self.collaborators.ops,
            self.collaborators.tool,
            self.config,
        );

        for target in targets {
            result.processed += 1;
            match target {
                ResolvedTarget::Device(device) => {
                    if banners {
                        println!("==== {device} ====");
                    }
                    self.process_device(&controller, device, &mut result);
                    if banners {
                        println!("==== {device} done ====");
                    }
                }
                ResolvedTarget::Unresolved { name, reason } => {
                    warn!(name = %name, "Not processed: {reason}");
                    result.failed += 1;
                    result.record(1);
                }
            }
        }

        info!(
            processed = result.processed,
            succeeded = result.succeeded,
            skipped = result.skipped,
            failed = result.failed,
            status = result.status,
            "Batch finished"
        );
        result
    }

    fn process_device(
        &self,
        controller: &LifecycleController<'_>,
        device: &str,
        result: &mut BatchResult,
    ) {
        match lookup_volume(self.collaborators.inventory, self.collaborators.mounts, device) {
            Ok(target) => {
                let run = controller.run(&target);
                if run.succeeded() {
                    result.succeeded += 1;
                } else {
                    warn!(device = %device, status = run.status, "Volume failed");
                    result.failed += 1;
                }
                result.record(run.status);
            }
            Err(error) if error.is_precondition() => {
                result.skipped += 1;
                if self.skips_silently() {
                    debug!(device = %device, "Skipping: {error}");
                } else {
                    warn!(device = %device, "Skipping: {error}");
                    result.record(1);
                }
            }
            Err(error) => {
                warn!(device = %device, "{error}");
                result.failed += 1;
                result.record(1);
            }
        }
    }

    /// Discovery runs quietly pass over volumes that cannot be snapshotted.
    fn skips_silently(&self) -> bool {
        self.config.batch_mode() && self.config.request.operation.needs_snapshot()
    }
}
