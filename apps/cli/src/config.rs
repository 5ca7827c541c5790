use anyhow::{bail, Context};
use client_core::DEFAULT_BASE_URL;
use config::{Config, Environment, File, Map, Source};
use serde::Deserialize;
use url::Url;

pub const DEFAULT_STORE_URL: &str = "sqlite://./data/greenlink.db";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ClientSettings {
    pub base_url: String,
    pub store_url: String,
    pub log_filter: String,
}

impl ClientSettings {
    /// Defaults, then `greenlink.toml` if present, then `GREENLINK__*`.
    pub fn load() -> anyhow::Result<Self> {
        Self::layered(File::with_name("greenlink").required(false), None)
    }

    pub fn layered(
        file: impl Source + Send + Sync + 'static,
        env: Option<Map<String, String>>,
    ) -> anyhow::Result<Self> {
        let settings: Self = Config::builder()
            .set_default("base_url", DEFAULT_BASE_URL)?
            .set_default("store_url", DEFAULT_STORE_URL)?
            .set_default("log_filter", "warn")?
            .add_source(file)
            .add_source(
                Environment::with_prefix("GREENLINK")
                    .separator("__")
                    .source(env),
            )
            .build()
            .context("failed to load client settings")?
            .try_deserialize()
            .context("invalid client settings")?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let url = Url::parse(&self.base_url)
            .with_context(|| format!("base_url '{}' is not a valid URL", self.base_url))?;
        if !matches!(url.scheme(), "http" | "https") {
            bail!("base_url must use http or https, got '{}'", url.scheme());
        }
        if self.store_url.trim().is_empty() {
            bail!("store_url must not be empty");
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
