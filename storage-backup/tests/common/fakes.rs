use std::cell::RefCell;
use std::collections::HashSet;
use std::path::Path;

use storage_contracts::{
    BackupTool, MountTable, SnapshotOps, StorageError, StorageErrorKind, VolumeInventory,
};
use storage_types::{LogicalVolumeRef, MountInfo, Volume, VolumeGroupInfo};

/// Mechanism steps that can be made to fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Step {
    Mkdir,
    Create,
    Mount,
    Unmount,
    Remove,
}

/// In-memory host: inventory, mount table, snapshot mechanism and backup
/// tool in one, recording every mechanism call in order.
#[derive(Default)]
pub struct FakeHost {
    volumes: Vec<Volume>,
    unlistable_groups: Vec<String>,
    mounts: Vec<MountInfo>,
    failing: HashSet<Step>,
    tool_exits: Vec<(String, i32)>,
    tool_unavailable: bool,
    calls: RefCell<Vec<String>>,
    tool_runs: RefCell<Vec<Vec<String>>>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_volume(mut self, vg: &str, lv: &str, size: u64, vg_free: u64) -> Self {
        self.volumes.push(Volume {
            vg_name: vg.to_string(),
            name: lv.to_string(),
            size,
            vg_free,
        });
        self
    }

    /// A group that is listed but whose volumes cannot be queried.
    pub fn with_unlistable_group(mut self, vg: &str) -> Self {
        self.unlistable_groups.push(vg.to_string());
        self
    }

    pub fn with_mount(
        mut self,
        spec: &str,
        mount_point: &str,
        fs_type: &str,
        options: &str,
    ) -> Self {
        self.mounts.push(MountInfo {
            spec: spec.to_string(),
            mount_point: mount_point.to_string(),
            fs_type: fs_type.to_string(),
            options: options.to_string(),
        });
        self
    }

    /// A mounted ext4 volume under its `/dev/<vg>/<lv>` spelling.
    pub fn with_mounted_volume(self, vg: &str, lv: &str, size: u64, vg_free: u64) -> Self {
        let spec = format!("/dev/{vg}/{lv}");
        let mount_point = format!("/srv/{lv}");
        self.with_volume(vg, lv, size, vg_free)
            .with_mount(&spec, &mount_point, "ext4", "rw,relatime")
    }

    pub fn failing(mut self, step: Step) -> Self {
        self.failing.insert(step);
        self
    }

    /// Tool exits with `code` whenever an argument ends with `suffix`.
    pub fn tool_exit(mut self, suffix: &str, code: i32) -> Self {
        self.tool_exits.push((suffix.to_string(), code));
        self
    }

    pub fn tool_unavailable(mut self) -> Self {
        self.tool_unavailable = true;
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.borrow().clone()
    }

    /// Calls whose first word is `verb`
    pub fn calls_to(&self, verb: &str) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter(|call| call.split_whitespace().next() == Some(verb))
            .cloned()
            .collect()
    }

    pub fn count(&self, verb: &str) -> usize {
        self.calls_to(verb).len()
    }

    /// Verbs in call order, e.g. `["mkdir", "create", "mount", ...]`
    pub fn verbs(&self) -> Vec<String> {
        self.calls
            .borrow()
            .iter()
            .filter_map(|call| call.split_whitespace().next().map(str::to_string))
            .collect()
    }

    pub fn tool_runs(&self) -> Vec<Vec<String>> {
        self.tool_runs.borrow().clone()
    }

    fn record(&self, step: Option<Step>, call: String) -> Result<(), StorageError> {
        self.calls.borrow_mut().push(call.clone());
        match step {
            Some(step) if self.failing.contains(&step) => {
                Err(StorageError::command_failed(format!("{call} failed")))
            }
            _ => Ok(()),
        }
    }
}

impl VolumeInventory for FakeHost {
    fn list_groups(&self) -> Result<Vec<VolumeGroupInfo>, StorageError> {
        let mut groups: Vec<VolumeGroupInfo> = self
            .unlistable_groups
            .iter()
            .map(|name| VolumeGroupInfo { name: name.clone() })
            .collect();
        for volume in &self.volumes {
            if !groups.iter().any(|group| group.name == volume.vg_name) {
                groups.push(VolumeGroupInfo {
                    name: volume.vg_name.clone(),
                });
            }
        }
        Ok(groups)
    }

    fn list_volumes(&self, vg_name: &str) -> Result<Vec<LogicalVolumeRef>, StorageError> {
        if self.unlistable_groups.iter().any(|name| name == vg_name) {
            return Err(StorageError::command_failed(format!("lvs {vg_name} failed")));
        }
        Ok(self
            .volumes
            .iter()
            .filter(|volume| volume.vg_name == vg_name)
            .map(|volume| LogicalVolumeRef::new(&volume.vg_name, &volume.name))
            .collect())
    }

    fn group_info(&self, name: &str) -> Result<Option<VolumeGroupInfo>, StorageError> {
        if self.unlistable_groups.iter().any(|group| group == name) {
            return Ok(Some(VolumeGroupInfo {
                name: name.to_string(),
            }));
        }
        Ok(self
            .volumes
            .iter()
            .find(|volume| volume.vg_name == name)
            .map(|volume| VolumeGroupInfo {
                name: volume.vg_name.clone(),
            }))
    }

    fn volume_info(&self, device_path: &str) -> Result<Option<Volume>, StorageError> {
        Ok(self
            .volumes
            .iter()
            .find(|volume| {
                volume.device_path() == device_path || volume.mapper_path() == device_path
            })
            .cloned())
    }
}

impl MountTable for FakeHost {
    fn lookup(&self, device_path: &str) -> Result<Option<MountInfo>, StorageError> {
        Ok(self
            .mounts
            .iter()
            .find(|entry| entry.spec == device_path)
            .cloned())
    }
}

impl SnapshotOps for FakeHost {
    fn create_snapshot(
        &self,
        source: &str,
        size_kib: u64,
        name: &str,
    ) -> Result<(), StorageError> {
        self.record(Some(Step::Create), format!("create {source} {size_kib} {name}"))
    }

    fn remove_snapshot(&self, name: &str, force: bool) -> Result<(), StorageError> {
        self.record(Some(Step::Remove), format!("remove {name} force={force}"))
    }

    fn mount(
        &self,
        device: &str,
        fs_type: &str,
        options: &str,
        dir: &Path,
    ) -> Result<(), StorageError> {
        self.record(
            Some(Step::Mount),
            format!("mount {device} {fs_type} {options} {}", dir.display()),
        )
    }

    fn unmount(&self, dir: &Path) -> Result<(), StorageError> {
        self.record(Some(Step::Unmount), format!("unmount {}", dir.display()))
    }

    fn ensure_directory(&self, dir: &Path) -> Result<(), StorageError> {
        self.record(Some(Step::Mkdir), format!("mkdir {}", dir.display()))
    }

    fn remove_directory(&self, dir: &Path) -> Result<(), StorageError> {
        self.record(None, format!("rmdir {}", dir.display()))
    }
}

impl BackupTool for FakeHost {
    fn run(&self, args: &[String]) -> Result<i32, StorageError> {
        self.calls.borrow_mut().push(format!("tool {}", args.join(" ")));
        self.tool_runs.borrow_mut().push(args.to_vec());
        if self.tool_unavailable {
            return Err(StorageError::new(
                StorageErrorKind::Unavailable,
                "backup tool not installed",
            ));
        }
        Ok(self
            .tool_exits
            .iter()
            .find(|(suffix, _)| args.iter().any(|arg| arg.ends_with(suffix.as_str())))
            .map_or(0, |(_, code)| *code))
    }
}
