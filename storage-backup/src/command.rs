// SPDX-License-Identifier: GPL-3.0-only

//! Destination URLs and backup-tool argument lists

use std::path::Path;

use storage_types::{Operation, OperationRequest, Volume};

use crate::config::DestinationConfig;

pub const LOCAL_SCHEME: &str = "file";
pub const REMOTE_SCHEME: &str = "scp";

/// `scheme://[user[:password]@]host[:port][/dir]/<group>-<volume>`
pub fn destination_url(destination: &DestinationConfig, volume: &Volume) -> String {
    let scheme = match (&destination.scheme, &destination.host) {
        (Some(scheme), _) => scheme.as_str(),
        (None, Some(_)) => REMOTE_SCHEME,
        (None, None) => LOCAL_SCHEME,
    };

    let mut url = format!("{scheme}://");
    if let Some(user) = &destination.user {
        url.push_str(user);
        if let Some(password) = &destination.password {
            url.push(':');
            url.push_str(password);
        }
        url.push('@');
    }
    if let Some(host) = &destination.host {
        url.push_str(host);
    }
    if let Some(port) = destination.port {
        url.push_str(&format!(":{port}"));
    }
    if let Some(dir) = destination
        .dir
        .as_deref()
        .map(|dir| dir.trim_end_matches('/'))
        .filter(|dir| !dir.is_empty())
    {
        if !dir.starts_with('/') {
            url.push('/');
        }
        url.push_str(dir);
    }
    url.push('/');
    url.push_str(&volume.qualified_name());
    url
}

/// Backup-tool arguments for one volume.
///
/// `local` is the snapshot mount directory for backups, the restore
/// directory for restores and the live mount point for verification; the
/// remaining operations work on the destination alone and ignore it.
pub fn tool_args(request: &OperationRequest, destination: &str, local: &Path) -> Vec<String> {
    let mut args: Vec<String> = request
        .operation
        .action()
        .map(str::to_string)
        .into_iter()
        .collect();
    let options = request.options.to_args();
    let local = local.display().to_string();

    match &request.operation {
        Operation::Unset | Operation::Full | Operation::Incremental => {
            args.extend(options);
            args.push(local);
            args.push(destination.to_string());
        }
        Operation::Restore { .. } | Operation::Verify => {
            args.extend(options);
            args.push(destination.to_string());
            args.push(local);
        }
        Operation::CollectionStatus | Operation::ListCurrentFiles | Operation::Cleanup => {
            args.extend(options);
            args.push(destination.to_string());
        }
        Operation::RemoveOlderThan { time } => {
            args.push(time.clone());
            args.extend(options);
            args.push(destination.to_string());
        }
        Operation::RemoveAllButNFull { count } => {
            args.push(count.to_string());
            args.extend(options);
            args.push(destination.to_string());
        }
    }
    args
}
