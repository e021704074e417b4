// HTTP client utilities
use crate::domain::error::AppError;
use reqwest::Client;
use std::time::Duration;

pub const USER_AGENT: &str = concat!("hkt/", env!("CARGO_PKG_VERSION"));

/// Shared client for every cloud backend.
pub fn create_client(http_proxy: Option<&str>) -> Result<Client, AppError> {
    let mut builder = Client::builder()
        .pool_max_idle_per_host(4)
        .pool_idle_timeout(Duration::from_secs(30))
        .connect_timeout(Duration::from_secs(10))
        .timeout(Duration::from_secs(60))
        .user_agent(USER_AGENT);

    if let Some(proxy) = http_proxy.map(str::trim).filter(|p| !p.is_empty()) {
        builder = builder.proxy(reqwest::Proxy::all(proxy)?);
    }

    Ok(builder.build()?)
}
