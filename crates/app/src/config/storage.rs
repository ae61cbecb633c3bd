//! Storage Config

use std::path::PathBuf;

use clap::Args;

/// Local snapshot storage settings.
#[derive(Debug, Args)]
pub struct StorageConfig {
    /// Directory holding the cart and liked-products snapshots
    #[arg(long, env = "TROLLEY_STORAGE_DIR", default_value = ".trolley")]
    pub storage_dir: PathBuf,
}
