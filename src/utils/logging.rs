//! Logging utilities
//!
//! Installs `env_logger` behind the `log` facade for the binary.

use env_logger::{Builder, Env};
use std::io::Write;

/// Setup logging for the server. `RUST_LOG` overrides the `info` default.
pub fn setup_logging() {
    Builder::from_env(Env::default().default_filter_or("info"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}] [{}] [{}] {}",
                buf.timestamp(),
                record.level(),
                record.target(),
                record.args()
            )
        })
        .init();
}
