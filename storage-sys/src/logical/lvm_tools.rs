// SPDX-License-Identifier: GPL-3.0-only

//! LVM inventory queries and snapshot provisioning via the LVM CLI tools

use storage_contracts::{StorageError, VolumeInventory};
use storage_types::{LogicalVolumeRef, Volume, VolumeGroupInfo};
use tracing::{debug, info};

use crate::cmd::CommandRunner;
use crate::error::{Result, SysError};

pub const QUERY_TOOLS: &[&str] = &["vgs", "lvs"];
pub const PROVISIONING_TOOLS: &[&str] = &["lvcreate", "lvremove"];

fn parse_tabbed_line(line: &str) -> Vec<String> {
    line.split('\t')
        .map(|part| part.trim().to_string())
        .collect()
}

/// Parse `vgs -o vg_name` output.
pub fn parse_group_names(output: &str) -> Vec<VolumeGroupInfo> {
    output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| VolumeGroupInfo {
            name: line.to_string(),
        })
        .collect()
}

/// Parse `lvs -o vg_name,lv_name` output.
pub fn parse_lv_refs(output: &str) -> Vec<LogicalVolumeRef> {
    output
        .lines()
        .filter_map(|line| {
            let line = line.trim();
            if line.is_empty() {
                return None;
            }
            let cols = parse_tabbed_line(line);
            if cols.len() < 2 || cols[0].is_empty() || cols[1].is_empty() {
                return None;
            }
            Some(LogicalVolumeRef::new(cols[0].clone(), cols[1].clone()))
        })
        .collect()
}

/// Parse `lvs -o vg_name,lv_name,lv_size,vg_free` output for a single volume.
///
/// Anything other than exactly one well-formed row yields `None`.
pub fn parse_volume_row(output: &str) -> Option<Volume> {
    let mut rows = output.lines().map(str::trim).filter(|line| !line.is_empty());
    let line = rows.next()?;
    if rows.next().is_some() {
        return None;
    }

    let cols = parse_tabbed_line(line);
    if cols.len() < 4 || cols[0].is_empty() || cols[1].is_empty() {
        return None;
    }

    Some(Volume {
        vg_name: cols[0].clone(),
        name: cols[1].clone(),
        size: cols[2].parse().ok()?,
        vg_free: cols[3].parse().ok()?,
    })
}

fn report_args(fields: &str) -> Vec<String> {
    [
        "--noheadings",
        "--units",
        "b",
        "--nosuffix",
        "--separator",
        "\t",
        "-o",
        fields,
    ]
    .iter()
    .map(|arg| (*arg).to_string())
    .collect()
}

/// LVM CLI wrapper
#[derive(Debug, Clone, Copy, Default)]
pub struct LvmTools {
    runner: CommandRunner,
}

impl LvmTools {
    pub fn new(runner: CommandRunner) -> Self {
        Self { runner }
    }

    fn report(&self, command: &str, fields: &str, target: Option<&str>) -> Result<Option<String>> {
        let mut args = report_args(fields);
        if let Some(target) = target {
            args.push(target.to_string());
        }
        self.runner.query(command, &args)
    }

    pub fn groups(&self) -> Result<Vec<VolumeGroupInfo>> {
        let output = self
            .report("vgs", "vg_name", None)?
            .ok_or_else(|| SysError::CommandFailed {
                command: "vgs".to_string(),
                stderr: "volume group listing failed".to_string(),
            })?;
        Ok(parse_group_names(&output))
    }

    pub fn volumes_in(&self, vg_name: &str) -> Result<Vec<LogicalVolumeRef>> {
        let output = self
            .report("lvs", "vg_name,lv_name", Some(vg_name))?
            .ok_or_else(|| SysError::CommandFailed {
                command: format!("lvs {vg_name}"),
                stderr: "logical volume listing failed".to_string(),
            })?;
        Ok(parse_lv_refs(&output))
    }

    pub fn group(&self, name: &str) -> Result<Option<VolumeGroupInfo>> {
        // Device paths are never group names; vgs would only complain.
        if name.contains('/') {
            return Ok(None);
        }
        let output = self.report("vgs", "vg_name", Some(name))?;
        Ok(output.and_then(|output| parse_group_names(&output).into_iter().next()))
    }

    pub fn volume(&self, device_path: &str) -> Result<Option<Volume>> {
        let output = self.report("lvs", "vg_name,lv_name,lv_size,vg_free", Some(device_path))?;
        let volume = output.as_deref().and_then(parse_volume_row);
        debug!("lvs {device_path}: {volume:?}");
        Ok(volume)
    }

    pub fn create_snapshot(&self, source: &str, size_kib: u64, name: &str) -> Result<()> {
        info!("Creating snapshot {name} of {source} ({size_kib} KiB)");
        let args = vec![
            "--snapshot".to_string(),
            "--size".to_string(),
            format!("{size_kib}k"),
            "--name".to_string(),
            name.to_string(),
            source.to_string(),
        ];
        self.runner.execute("lvcreate", &args)?;
        Ok(())
    }

    pub fn remove_snapshot(&self, name: &str, force: bool) -> Result<()> {
        info!("Removing snapshot {name}");
        let mut args = Vec::new();
        if force {
            args.push("--force".to_string());
        }
        args.push(name.to_string());
        self.runner.execute("lvremove", &args)?;
        Ok(())
    }
}

impl VolumeInventory for LvmTools {
    fn list_groups(&self) -> std::result::Result<Vec<VolumeGroupInfo>, StorageError> {
        Ok(self.groups()?)
    }

    fn list_volumes(
        &self,
        vg_name: &str,
    ) -> std::result::Result<Vec<LogicalVolumeRef>, StorageError> {
        Ok(self.volumes_in(vg_name)?)
    }

    fn group_info(&self, name: &str) -> std::result::Result<Option<VolumeGroupInfo>, StorageError> {
        Ok(self.group(name)?)
    }

    fn volume_info(&self, device_path: &str) -> std::result::Result<Option<Volume>, StorageError> {
        Ok(self.volume(device_path)?)
    }
}
