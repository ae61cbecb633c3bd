//! Application configuration
//!
//! Every setting can come from a command line flag, an environment variable
//! or a `.env` file.

use clap::Args;

pub use api::ApiConfig;
pub use logging::{LogFormat, LoggingConfig};
pub use storage::StorageConfig;

mod api;
mod logging;
mod storage;

/// Combined configuration for the Trolley CLI.
#[derive(Debug, Args)]
pub struct AppConfig {
    /// Backend API settings.
    #[command(flatten)]
    pub api: ApiConfig,

    /// Local snapshot storage settings.
    #[command(flatten)]
    pub storage: StorageConfig,

    /// Logging output settings.
    #[command(flatten)]
    pub logging: LoggingConfig,
}
