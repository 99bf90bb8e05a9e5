// SPDX-License-Identifier: GPL-3.0-only

//! Command line, configuration file, and the immutable run configuration
//!
//! The configuration file holds one long option per line (`key=value`,
//! `key=yes`, `key=no` or a bare `key`). Its entries are placed ahead of the
//! command-line arguments, so anything given on the command line wins.

use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use clap::{ArgGroup, Parser, ValueEnum};
use configparser::ini::Ini;
use storage_types::{Operation, OperationRequest, SnapshotSizing, ToolOptions, parse_size};

use crate::error::ConfigError;

pub const DEFAULT_CONFIG_PATH: &str = "/etc/lvm-backup.conf";
pub const DEFAULT_SNAPSHOT_MOUNT_BASE: &str = "/var/run/lvm-backup";
pub const DEFAULT_BACKUP_TOOL: &str = storage_sys::DEFAULT_BACKUP_TOOL;

/// Backup-tool verbosity assumed when `--verbosity` is not given
pub const DEFAULT_VERBOSITY: u8 = 4;

/// Long options that select the operation; a command-line choice replaces
/// any made in the configuration file.
const OPERATION_OPTIONS: &[&str] = &[
    "full",
    "incremental",
    "restore",
    "verify",
    "collection-status",
    "list-current-files",
    "cleanup",
    "remove-older-than",
    "remove-all-but-n-full",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Back up LVM logical volumes through read-only snapshots
#[derive(Debug, Parser)]
#[command(name = "lvm-backup", version)]
#[command(about = "Back up LVM logical volumes through read-only snapshots", long_about = None)]
#[command(args_override_self = true)]
#[command(group(
    ArgGroup::new("operation").args([
        "full",
        "incremental",
        "restore",
        "verify",
        "collection_status",
        "list_current_files",
        "cleanup",
        "remove_older_than",
        "remove_all_but_n_full",
    ])
))]
pub struct Cli {
    /// Volume group names or logical volume device paths
    #[arg(value_name = "TARGET")]
    pub targets: Vec<String>,

    /// Process every logical volume of every volume group
    #[arg(long)]
    pub all: bool,

    /// Configuration file with one long option per line
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Destination URL scheme [default: file, or scp when a host is set]
    #[arg(long, value_name = "SCHEME")]
    pub backup_scheme: Option<String>,

    #[arg(long, value_name = "HOST")]
    pub backup_host: Option<String>,

    #[arg(long, value_name = "PORT")]
    pub backup_port: Option<u16>,

    #[arg(long, value_name = "USER")]
    pub backup_user: Option<String>,

    #[arg(long, value_name = "PASSWORD")]
    pub backup_password: Option<String>,

    /// Directory on the destination holding one archive per volume
    #[arg(long, value_name = "DIR")]
    pub backup_dir: Option<String>,

    /// Smallest snapshot size (e.g. 512M, 1g)
    #[arg(long, value_name = "SIZE")]
    pub lvm_snapshot_size_min: Option<String>,

    /// Largest snapshot size, 0 for no limit
    #[arg(long, value_name = "SIZE")]
    pub lvm_snapshot_size_max: Option<String>,

    /// Snapshot size is the volume size divided by this ratio
    #[arg(long, value_name = "RATIO")]
    pub lvm_snapshot_size_ratio: Option<u64>,

    /// Force a full backup
    #[arg(long)]
    pub full: bool,

    /// Force an incremental backup
    #[arg(long)]
    pub incremental: bool,

    /// Restore each volume into DIR/<group>-<volume>
    #[arg(long, value_name = "DIR")]
    pub restore: Option<PathBuf>,

    /// Compare the backup with the live filesystem
    #[arg(long)]
    pub verify: bool,

    #[arg(long)]
    pub collection_status: bool,

    #[arg(long)]
    pub list_current_files: bool,

    /// Delete leftover files of failed backup sessions
    #[arg(long)]
    pub cleanup: bool,

    /// Delete backups older than TIME
    #[arg(long, value_name = "TIME")]
    pub remove_older_than: Option<String>,

    /// Keep only the last N full backup chains
    #[arg(long, value_name = "N")]
    pub remove_all_but_n_full: Option<u32>,

    /// Passed to the backup tool
    #[arg(long)]
    pub force: bool,

    /// Passed to the backup tool
    #[arg(long, value_name = "N")]
    pub verbosity: Option<u8>,

    /// Passed to the backup tool
    #[arg(long, value_name = "KEY")]
    pub encrypt_key: Option<String>,

    /// Passed to the backup tool
    #[arg(long, value_name = "KEY")]
    pub sign_key: Option<String>,

    /// Passed to the backup tool
    #[arg(long, value_name = "COMMAND")]
    pub scp_command: Option<String>,

    /// Print commands instead of running them
    #[arg(long)]
    pub dry_run: bool,

    /// Directory under which snapshots are mounted
    #[arg(long, value_name = "DIR")]
    pub snapshot_mount_base: Option<PathBuf>,

    /// Backup program to run
    #[arg(long, value_name = "PROGRAM")]
    pub backup_tool: Option<String>,

    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

impl Cli {
    /// Parse `args` (program name first), prepending configuration-file entries.
    pub fn parse_with_config<I, T>(args: I) -> Result<Self, ConfigError>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let args: Vec<OsString> = args.into_iter().map(Into::into).collect();
        let (program, cli_args) = match args.split_first() {
            Some((program, rest)) => (program.clone(), rest.to_vec()),
            None => (OsString::from("lvm-backup"), Vec::new()),
        };

        let default_path = Path::new(DEFAULT_CONFIG_PATH);
        let file_args = match explicit_config_path(&cli_args) {
            Some(path) => config_file_args(&path)?,
            None if default_path.exists() => config_file_args(default_path)?,
            None => Vec::new(),
        };

        let merged = merge_args(program, file_args, cli_args);
        Ok(Self::try_parse_from(merged)?)
    }
}

/// `--config FILE` or `--config=FILE` from the command line.
fn explicit_config_path(args: &[OsString]) -> Option<PathBuf> {
    let mut iter = args.iter().map(|arg| arg.to_string_lossy());
    while let Some(arg) = iter.next() {
        if arg == "--" {
            return None;
        }
        if arg == "--config" {
            return iter.next().map(|path| PathBuf::from(path.as_ref()));
        }
        if let Some(path) = arg.strip_prefix("--config=") {
            return Some(PathBuf::from(path));
        }
    }
    None
}

fn merge_args(program: OsString, file_args: Vec<String>, cli_args: Vec<OsString>) -> Vec<OsString> {
    let cli_selects_operation = cli_args
        .iter()
        .any(|arg| selects_operation(&arg.to_string_lossy()));

    let mut merged = vec![program];
    merged.extend(
        file_args
            .into_iter()
            .filter(|arg| !(cli_selects_operation && selects_operation(arg)))
            .map(OsString::from),
    );
    merged.extend(cli_args);
    merged
}

fn option_name(arg: &str) -> Option<&str> {
    let name = arg.strip_prefix("--")?;
    Some(name.split_once('=').map_or(name, |(name, _)| name))
}

fn selects_operation(arg: &str) -> bool {
    option_name(arg).is_some_and(|name| OPERATION_OPTIONS.contains(&name))
}

/// Read a configuration file into long-option arguments.
pub fn config_file_args(path: &Path) -> Result<Vec<String>, ConfigError> {
    let content = fs::read_to_string(path).map_err(|error| ConfigError::ConfigFile {
        path: path.to_path_buf(),
        reason: match error.kind() {
            io::ErrorKind::NotFound => "file not found".to_string(),
            _ => error.to_string(),
        },
    })?;
    parse_config_entries(&content).map_err(|reason| ConfigError::ConfigFile {
        path: path.to_path_buf(),
        reason,
    })
}

/// Map configuration lines to long options.
///
/// `key=value` becomes `--key=value`; `key`, `key=` and `key=yes` become
/// `--key`; `key=no` is dropped.
pub fn parse_config_entries(content: &str) -> Result<Vec<String>, String> {
    let mut ini = Ini::new_cs();
    ini.set_comment_symbols(&['#']);
    let sections = ini.read(content.to_string())?;

    let mut args = Vec::new();
    for (section, entries) in sections {
        if section != "default" {
            return Err(format!("sections are not supported: [{section}]"));
        }

        let entries: BTreeMap<String, Option<String>> = entries.into_iter().collect();
        for (key, value) in entries {
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            match value.as_deref().map(str::trim) {
                None | Some("") | Some("yes") => args.push(format!("--{key}")),
                Some("no") => {}
                Some(value) => args.push(format!("--{key}={value}")),
            }
        }
    }
    Ok(args)
}

/// Which volumes to process
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TargetSelection {
    pub all: bool,
    pub names: Vec<String>,
}

/// Parts of the backup destination URL
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationConfig {
    pub scheme: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub dir: Option<String>,
}

/// Everything a run needs, assembled once and passed by reference
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Configuration {
    pub targets: TargetSelection,
    pub destination: DestinationConfig,
    pub sizing: SnapshotSizing,
    pub request: OperationRequest,
    pub dry_run: bool,
    pub snapshot_mount_base: PathBuf,
    pub backup_tool: String,
}

impl Default for Configuration {
    fn default() -> Self {
        Self {
            targets: TargetSelection::default(),
            destination: DestinationConfig::default(),
            sizing: SnapshotSizing::default(),
            request: OperationRequest::default(),
            dry_run: false,
            snapshot_mount_base: PathBuf::from(DEFAULT_SNAPSHOT_MOUNT_BASE),
            backup_tool: DEFAULT_BACKUP_TOOL.to_string(),
        }
    }
}

impl Configuration {
    /// Discovery mode: volumes were enumerated rather than named.
    pub fn batch_mode(&self) -> bool {
        self.targets.all
    }

    pub fn verbosity(&self) -> u8 {
        self.request.options.verbosity.unwrap_or(DEFAULT_VERBOSITY)
    }
}

impl TryFrom<Cli> for Configuration {
    type Error = ConfigError;

    fn try_from(cli: Cli) -> Result<Self, Self::Error> {
        let targets = TargetSelection {
            all: cli.all,
            names: cli.targets,
        };
        targets.validate().map_err(ConfigError::Targets)?;

        let ratio = cli.lvm_snapshot_size_ratio.unwrap_or(1);
        if ratio == 0 {
            return Err(ConfigError::InvalidRatio(ratio));
        }
        let sizing = SnapshotSizing {
            ratio,
            min: cli
                .lvm_snapshot_size_min
                .as_deref()
                .map(parse_size)
                .transpose()?
                .unwrap_or(0),
            max: cli
                .lvm_snapshot_size_max
                .as_deref()
                .map(parse_size)
                .transpose()?
                .unwrap_or(0),
        };

        let operation = if cli.full {
            Operation::Full
        } else if cli.incremental {
            Operation::Incremental
        } else if let Some(base_dir) = cli.restore {
            Operation::Restore { base_dir }
        } else if cli.verify {
            Operation::Verify
        } else if cli.collection_status {
            Operation::CollectionStatus
        } else if cli.list_current_files {
            Operation::ListCurrentFiles
        } else if cli.cleanup {
            Operation::Cleanup
        } else if let Some(time) = cli.remove_older_than {
            Operation::RemoveOlderThan { time }
        } else if let Some(count) = cli.remove_all_but_n_full {
            Operation::RemoveAllButNFull { count }
        } else {
            Operation::Unset
        };

        Ok(Self {
            targets,
            destination: DestinationConfig {
                scheme: cli.backup_scheme,
                host: cli.backup_host,
                port: cli.backup_port,
                user: cli.backup_user,
                password: cli.backup_password,
                dir: cli.backup_dir,
            },
            sizing,
            request: OperationRequest {
                operation,
                options: ToolOptions {
                    force: cli.force,
                    verbosity: cli.verbosity,
                    encrypt_key: cli.encrypt_key,
                    sign_key: cli.sign_key,
                    scp_command: cli.scp_command,
                },
            },
            dry_run: cli.dry_run,
            snapshot_mount_base: cli
                .snapshot_mount_base
                .unwrap_or_else(|| PathBuf::from(DEFAULT_SNAPSHOT_MOUNT_BASE)),
            backup_tool: cli
                .backup_tool
                .unwrap_or_else(|| DEFAULT_BACKUP_TOOL.to_string()),
        })
    }
}
