use std::time::Duration;

use anyhow::{Context, Result};
use once_cell::sync::OnceCell;
use reqwest::blocking::Client;

pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

static CLIENT: OnceCell<Client> = OnceCell::new();

/// Builds the shared client with the given timeout. Later calls keep the
/// first client.
pub fn init_http_client(timeout_secs: u64) -> Result<&'static Client> {
    CLIENT.get_or_try_init(|| build_client(timeout_secs))
}

pub fn http_client() -> Result<&'static Client> {
    init_http_client(DEFAULT_TIMEOUT_SECS)
}

fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(timeout_secs.max(1)))
        .user_agent(concat!("hoops_roster/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("failed to build http client")
}
