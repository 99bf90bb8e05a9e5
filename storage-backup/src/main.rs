// SPDX-License-Identifier: GPL-3.0-only

//! lvm-backup - snapshot-based backups of LVM logical volumes

use std::process::ExitCode;

use anyhow::Result;
use storage_backup::{Cli, Collaborators, ConfigError, Configuration, logging};
use storage_sys::{
    CommandRunner, ExecuteOptions, HostSnapshotOps, LvmTools, MountTableFiles, ToolRunner,
};
use tracing::{error, info, warn};

fn main() -> ExitCode {
    let cli = match Cli::parse_with_config(std::env::args_os()) {
        Ok(cli) => cli,
        Err(ConfigError::Clap(error)) => error.exit(),
        Err(error) => {
            eprintln!("lvm-backup: {error}");
            return ExitCode::FAILURE;
        }
    };
    logging::init(cli.log_level);

    match run(cli) {
        Ok(status) => ExitCode::from(u8::try_from(status).unwrap_or(1)),
        Err(error) => {
            error!("{error:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<i32> {
    let config = Configuration::try_from(cli)?;
    info!("Starting lvm-backup v{}", env!("CARGO_PKG_VERSION"));

    let options = ExecuteOptions {
        dry_run: config.dry_run,
    };
    storage_sys::preflight(options)?;
    if !storage_sys::is_root() {
        warn!("Not running as root; snapshot and mount steps are likely to fail");
    }

    let runner = CommandRunner::new(options);
    let inventory = LvmTools::new(runner);
    let mounts = MountTableFiles::default();
    let ops = HostSnapshotOps::new(runner);
    let tool = ToolRunner::new(config.backup_tool.clone(), runner);

    let result = storage_backup::run(
        &config,
        Collaborators {
            inventory: &inventory,
            mounts: &mounts,
            ops: &ops,
            tool: &tool,
        },
    )?;
    Ok(result.status)
}
