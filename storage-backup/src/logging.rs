// SPDX-License-Identifier: GPL-3.0-only

use tracing_subscriber::{EnvFilter, fmt};

use crate::config::LogLevel;

/// Install the stderr subscriber. `RUST_LOG` takes precedence over `level`.
pub fn init(level: LogLevel) {
    let directive = level.as_directive();
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "warn,lvm_backup={directive},storage_backup={directive},storage_sys={directive}"
        ))
    });

    // A subscriber installed by an embedding process stays in place.
    let _ = fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
