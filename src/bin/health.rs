use std::env;

use anyhow::{bail, Result};
use reqwest::Url;

/// Probes a worker's liveness endpoint. Intended as a container health
/// check; exits non-zero on any failure.
fn main() -> Result<()> {
    let url = env::args()
        .nth(1)
        .unwrap_or_else(|| "http://localhost:8000/health".to_string());
    let url = Url::parse(&url)?;

    let response = reqwest::blocking::get(url)?;
    if !response.status().is_success() {
        bail!("Health check failed with status {}", response.status());
    }

    Ok(())
}
