// SPDX-License-Identifier: GPL-3.0-only

//! Expand target names into logical volume device paths

use storage_contracts::{StorageError, VolumeInventory};
use tracing::{debug, warn};

use crate::config::TargetSelection;
use crate::error::ResolveError;

/// One entry of the resolved work list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedTarget {
    Device(String),
    /// A name whose volumes could not be listed; counts as a failed target.
    Unresolved { name: String, reason: StorageError },
}

impl TargetSelection {
    /// Exactly one of `--all` and explicit names must be given.
    pub fn validate(&self) -> Result<(), ResolveError> {
        match (self.all, self.names.is_empty()) {
            (true, false) => Err(ResolveError::ConflictingTargetSpecification),
            (false, true) => Err(ResolveError::NoTargetSpecified),
            _ => Ok(()),
        }
    }
}

/// Work list to process, in order.
///
/// With `--all`, every volume of every group. Otherwise each name that is a
/// volume group expands to its volumes and any other name is kept verbatim
/// as a device path. Duplicates are kept. Only a failure to list the groups
/// themselves is fatal; a group whose volumes cannot be listed becomes an
/// [`ResolvedTarget::Unresolved`] entry and the remaining names still resolve.
pub fn resolve_targets(
    inventory: &dyn VolumeInventory,
    selection: &TargetSelection,
) -> Result<Vec<ResolvedTarget>, ResolveError> {
    selection.validate()?;

    let mut targets = Vec::new();
    if selection.all {
        for group in inventory.list_groups()? {
            push_group(inventory, &group.name, &mut targets);
        }
    } else {
        for name in &selection.names {
            match inventory.group_info(name) {
                Ok(Some(group)) => push_group(inventory, &group.name, &mut targets),
                Ok(None) => targets.push(ResolvedTarget::Device(name.clone())),
                Err(reason) => {
                    warn!("Cannot resolve {name}: {reason}");
                    targets.push(ResolvedTarget::Unresolved {
                        name: name.clone(),
                        reason,
                    });
                }
            }
        }
    }

    debug!("Resolved targets: {targets:?}");
    Ok(targets)
}

fn push_group(inventory: &dyn VolumeInventory, vg_name: &str, targets: &mut Vec<ResolvedTarget>) {
    match inventory.list_volumes(vg_name) {
        Ok(volumes) => targets.extend(
            volumes
                .iter()
                .map(|volume| ResolvedTarget::Device(volume.device_path())),
        ),
        Err(reason) => {
            warn!("Cannot list volumes of group {vg_name}: {reason}");
            targets.push(ResolvedTarget::Unresolved {
                name: vg_name.to_string(),
                reason,
            });
        }
    }
}
