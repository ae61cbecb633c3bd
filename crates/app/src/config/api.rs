//! API Config

use std::time::Duration;

use clap::Args;
use rusty_money::iso::Currency;
use trolley::pricing::currency_from_code;

/// Backend API settings.
#[derive(Debug, Args)]
pub struct ApiConfig {
    /// Base URL of the catalog and checkout API
    #[arg(
        long,
        env = "TROLLEY_API_BASE_URL",
        default_value = "http://localhost:3000/api"
    )]
    pub api_base_url: String,

    /// Currency that catalog prices are quoted in (GBP, USD, EUR)
    #[arg(long, env = "TROLLEY_CURRENCY", default_value = "USD", value_parser = parse_currency)]
    pub currency: &'static Currency,

    /// Seconds to wait for a backend response before giving up
    #[arg(long, env = "TROLLEY_REQUEST_TIMEOUT_SECS", default_value_t = 10_u64)]
    pub request_timeout_secs: u64,
}

impl ApiConfig {
    /// Request timeout as a [`Duration`].
    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn parse_currency(raw: &str) -> Result<&'static Currency, String> {
    currency_from_code(raw).map_err(|error| error.to_string())
}
