use crate::adapters::outbound::{AttemptOptions, DEFAULT_MAX_REDIRECTS, DEFAULT_USER_AGENT};
use crate::infrastructure::RetryPolicy;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    // Geo database
    pub geoip_path: String,

    // Provider attempts
    pub proxy_url: Option<String>,
    pub user_agent: String,
    pub attempt_timeout_ms: u64,
    pub max_redirects: usize,

    // Whole-cycle retries
    pub retry_times: u32,
    pub retry_delay_ms: u64,

    pub debug: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            geoip_path: "GeoLite2-City.mmdb".to_string(),
            proxy_url: None,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            attempt_timeout_ms: 5000,
            max_redirects: DEFAULT_MAX_REDIRECTS,
            retry_times: 3,
            retry_delay_ms: 5000,
            debug: false,
        }
    }
}

impl Config {
    /// Request settings for the HTTP provider adapter.
    pub fn attempt_options(&self) -> AttemptOptions {
        AttemptOptions {
            proxy: self.proxy_url.clone(),
            user_agent: self.user_agent.clone(),
            max_redirects: self.max_redirects,
            timeout: self.attempt_timeout(),
        }
    }

    pub fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    pub fn retry_policy(&self) -> RetryPolicy {
        RetryPolicy::fixed(self.retry_times, Duration::from_millis(self.retry_delay_ms))
    }
}

pub fn load_config() -> anyhow::Result<Config> {
    let geoip_path = std::env::var("IPGEO_GEOIP_PATH")
        .unwrap_or_else(|_| "GeoLite2-City.mmdb".to_string());

    let proxy_url = std::env::var("IPGEO_PROXY_URL")
        .ok()
        .filter(|v| !v.trim().is_empty());

    let user_agent = std::env::var("IPGEO_USER_AGENT")
        .unwrap_or_else(|_| DEFAULT_USER_AGENT.to_string());

    let attempt_timeout_ms = std::env::var("IPGEO_ATTEMPT_TIMEOUT_MS")
        .unwrap_or_else(|_| "5000".to_string())
        .parse()
        .unwrap_or(5000);

    let max_redirects = std::env::var("IPGEO_MAX_REDIRECTS")
        .unwrap_or_else(|_| DEFAULT_MAX_REDIRECTS.to_string())
        .parse()
        .unwrap_or(DEFAULT_MAX_REDIRECTS);

    let retry_times = std::env::var("IPGEO_RETRY_TIMES")
        .unwrap_or_else(|_| "3".to_string())
        .parse()
        .unwrap_or(3);

    let retry_delay_ms = std::env::var("IPGEO_RETRY_DELAY_MS")
        .unwrap_or_else(|_| "5000".to_string())
        .parse()
        .unwrap_or(5000);

    let debug = std::env::var("DEBUG").is_ok();

    if attempt_timeout_ms == 0 {
        anyhow::bail!("IPGEO_ATTEMPT_TIMEOUT_MS must be greater than zero");
    }

    Ok(Config {
        geoip_path,
        proxy_url,
        user_agent,
        attempt_timeout_ms,
        max_redirects,
        retry_times,
        retry_delay_ms,
        debug,
    })
}
