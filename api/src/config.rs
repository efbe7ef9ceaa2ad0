use std::time::Duration;

use anyhow::{Context, Result};

pub const ENV_URL: &str = "TENSORGATE_URL";
pub const ENV_TIMEOUT_SECS: &str = "TENSORGATE_TIMEOUT_SECS";
pub const ENV_CONNECT_TIMEOUT_SECS: &str = "TENSORGATE_CONNECT_TIMEOUT_SECS";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientConfig {
    /// Base HTTP url of the inference server.
    pub url: String,
    pub timeout: Duration,
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".into(),
            timeout: Duration::from_secs(30),
            connect_timeout: Duration::from_secs(5),
        }
    }
}

impl ClientConfig {
    /// Overlays the environment variables onto the defaults.
    pub fn try_infer() -> Result<Self> {
        Self::infer_with(|key| ::std::env::var(key).ok())
    }

    pub fn infer_with<F>(get: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let secs = |key: &str| -> Result<Option<Duration>> {
            get(key)
                .map(|value| {
                    value
                        .trim()
                        .parse()
                        .map(Duration::from_secs)
                        .with_context(|| format!("invalid {key}: {value:?}"))
                })
                .transpose()
        };

        let default = Self::default();
        Ok(Self {
            url: get(ENV_URL)
                .map(|url| url.trim_end_matches('/').to_string())
                .unwrap_or(default.url),
            timeout: secs(ENV_TIMEOUT_SECS)?.unwrap_or(default.timeout),
            connect_timeout: secs(ENV_CONNECT_TIMEOUT_SECS)?.unwrap_or(default.connect_timeout),
        })
    }
}
