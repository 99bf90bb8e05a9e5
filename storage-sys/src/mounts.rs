// SPDX-License-Identifier: GPL-3.0-only

//! Mount-table lookup and mount/unmount commands

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use storage_contracts::{MountTable, StorageError};
use storage_types::MountInfo;
use tracing::{debug, info};

use crate::cmd::CommandRunner;
use crate::error::Result;

pub const LIVE_MOUNT_TABLE: &str = "/proc/self/mounts";
pub const STATIC_MOUNT_TABLE: &str = "/etc/fstab";

pub const MOUNT_TOOLS: &[&str] = &["mount", "umount"];

/// Parse `/proc/self/mounts` or `/etc/fstab` style tables.
///
/// Comments and lines with fewer than three fields are skipped; a missing
/// options column yields an entry with empty options.
pub fn parse_mount_table(input: &str) -> Vec<MountInfo> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .filter_map(|line| {
            let mut fields = line.split_whitespace();
            let spec = fields.next()?;
            let mount_point = fields.next()?;
            let fs_type = fields.next()?;
            let options = fields.next().unwrap_or_default();

            Some(MountInfo {
                spec: unescape_mount_field(spec),
                mount_point: unescape_mount_field(mount_point),
                fs_type: fs_type.to_string(),
                options: unescape_mount_field(options),
            })
        })
        .collect()
}

fn unescape_mount_field(value: &str) -> String {
    let bytes = value.as_bytes();
    let mut output = Vec::with_capacity(bytes.len());
    let mut index = 0;

    while index < bytes.len() {
        if bytes[index] == b'\\'
            && index + 3 < bytes.len()
            && bytes[index + 1..=index + 3].iter().all(|b| (b'0'..=b'7').contains(b))
        {
            if let Ok(num) = u8::from_str_radix(&value[index + 1..index + 4], 8) {
                output.push(num);
                index += 4;
                continue;
            }
        }

        output.push(bytes[index]);
        index += 1;
    }

    String::from_utf8_lossy(&output).into_owned()
}

/// Mount tables read from files, searched in order
#[derive(Debug, Clone)]
pub struct MountTableFiles {
    sources: Vec<PathBuf>,
}

impl Default for MountTableFiles {
    /// Live mounts first, then the static table (where swap appears).
    fn default() -> Self {
        Self::new(vec![
            PathBuf::from(LIVE_MOUNT_TABLE),
            PathBuf::from(STATIC_MOUNT_TABLE),
        ])
    }
}

impl MountTableFiles {
    pub fn new(sources: Vec<PathBuf>) -> Self {
        Self { sources }
    }

    pub fn find(&self, device_path: &str) -> Result<Option<MountInfo>> {
        for source in &self.sources {
            let content = match fs::read_to_string(source) {
                Ok(content) => content,
                Err(error) if error.kind() == io::ErrorKind::NotFound => {
                    debug!("Mount table {} not present", source.display());
                    continue;
                }
                Err(error) => return Err(error.into()),
            };

            if let Some(entry) = parse_mount_table(&content)
                .into_iter()
                .find(|entry| entry.spec == device_path)
            {
                debug!("{device_path} found in {}: {entry:?}", source.display());
                return Ok(Some(entry));
            }
        }
        Ok(None)
    }
}

impl MountTable for MountTableFiles {
    fn lookup(&self, device_path: &str) -> std::result::Result<Option<MountInfo>, StorageError> {
        Ok(self.find(device_path)?)
    }
}

pub fn mount(
    runner: &CommandRunner,
    device: &str,
    fs_type: &str,
    options: &str,
    dir: &Path,
) -> Result<()> {
    info!("Mounting {device} on {} ({fs_type}, {options})", dir.display());
    let args = vec![
        "-t".to_string(),
        fs_type.to_string(),
        "-o".to_string(),
        options.to_string(),
        device.to_string(),
        dir.display().to_string(),
    ];
    runner.execute("mount", &args)?;
    Ok(())
}

pub fn unmount(runner: &CommandRunner, dir: &Path) -> Result<()> {
    info!("Unmounting {}", dir.display());
    runner.execute("umount", &[dir.display().to_string()])?;
    Ok(())
}
