//! Backup operations and the options passed through to the backup tool

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Operation requested by the operator
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// Let the backup tool choose between full and incremental
    #[default]
    Unset,
    Full,
    Incremental,
    /// Restore into `<base_dir>/<group>-<volume>`
    Restore { base_dir: PathBuf },
    Verify,
    CollectionStatus,
    ListCurrentFiles,
    Cleanup,
    /// Retention by age, time string passed through verbatim
    RemoveOlderThan { time: String },
    /// Retention by count of full backup chains
    RemoveAllButNFull { count: u32 },
}

impl Operation {
    /// Action word given to the backup tool; `None` for [`Operation::Unset`].
    pub fn action(&self) -> Option<&'static str> {
        match self {
            Self::Unset => None,
            Self::Full => Some("full"),
            Self::Incremental => Some("incremental"),
            Self::Restore { .. } => Some("restore"),
            Self::Verify => Some("verify"),
            Self::CollectionStatus => Some("collection-status"),
            Self::ListCurrentFiles => Some("list-current-files"),
            Self::Cleanup => Some("cleanup"),
            Self::RemoveOlderThan { .. } => Some("remove-older-than"),
            Self::RemoveAllButNFull { .. } => Some("remove-all-but-n-full"),
        }
    }

    /// Operations that read a point-in-time source and therefore need a snapshot.
    pub fn needs_snapshot(&self) -> bool {
        matches!(self, Self::Unset | Self::Full | Self::Incremental)
    }

    pub fn label(&self) -> &'static str {
        self.action().unwrap_or("backup")
    }
}

/// Options forwarded to every backup-tool invocation when supplied
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolOptions {
    pub force: bool,
    pub verbosity: Option<u8>,
    pub encrypt_key: Option<String>,
    pub sign_key: Option<String>,
    pub scp_command: Option<String>,
}

impl ToolOptions {
    /// Render as backup-tool arguments, in a fixed order.
    pub fn to_args(&self) -> Vec<String> {
        let mut args = Vec::new();
        if self.force {
            args.push("--force".to_string());
        }
        if let Some(verbosity) = self.verbosity {
            args.push("--verbosity".to_string());
            args.push(verbosity.to_string());
        }
        if let Some(key) = &self.encrypt_key {
            args.push("--encrypt-key".to_string());
            args.push(key.clone());
        }
        if let Some(key) = &self.sign_key {
            args.push("--sign-key".to_string());
            args.push(key.clone());
        }
        if let Some(command) = &self.scp_command {
            args.push("--scp-command".to_string());
            args.push(command.clone());
        }
        args
    }
}

/// The chosen operation together with its pass-through options
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OperationRequest {
    pub operation: Operation,
    pub options: ToolOptions,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_backup_operations_need_snapshots() {
        assert!(Operation::Unset.needs_snapshot());
        assert!(Operation::Full.needs_snapshot());
        assert!(Operation::Incremental.needs_snapshot());
        assert!(!Operation::Verify.needs_snapshot());
        assert!(
            !Operation::Restore {
                base_dir: PathBuf::from("/restore")
            }
            .needs_snapshot()
        );
        assert!(!Operation::RemoveAllButNFull { count: 2 }.needs_snapshot());
    }

    #[test]
    fn tool_options_render_only_supplied_values() {
        let options = ToolOptions {
            force: true,
            verbosity: Some(5),
            encrypt_key: None,
            sign_key: Some("ABCD1234".to_string()),
            scp_command: None,
        };
        assert_eq!(
            options.to_args(),
            vec!["--force", "--verbosity", "5", "--sign-key", "ABCD1234"]
        );
        assert!(ToolOptions::default().to_args().is_empty());
    }
}
