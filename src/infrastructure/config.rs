use crate::domain::series_store::RetentionPolicy;
use chrono_tz::Tz;
use serde::Deserialize;
use std::time::Duration;

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct AppConfig {
    pub source: SourceSettings,
    pub server: ServerSettings,
    pub polling: PollingSettings,
    pub retention: RetentionSettings,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct SourceSettings {
    pub host: String,
    pub port: u16,
    pub entity_type: String,
    pub entity_id: String,
    pub service: String,
    pub service_path: String,
}

impl Default for SourceSettings {
    fn default() -> Self {
        Self {
            host: "54.235.126.90".to_string(),
            port: 8666,
            entity_type: "Lamp".to_string(),
            entity_id: "urn:ngsi-ld:Lamp:2005".to_string(),
            service: "smart".to_string(),
            service_path: "/".to_string(),
        }
    }
}

impl SourceSettings {
    pub fn base_url(&self) -> String {
        format!("http://{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8050,
        }
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct PollingSettings {
    pub interval_secs: u64,
    pub last_n: u32,
    pub timezone: String,
}

impl Default for PollingSettings {
    fn default() -> Self {
        Self {
            interval_secs: 10,
            last_n: 10,
            timezone: "America/Sao_Paulo".to_string(),
        }
    }
}

impl PollingSettings {
    pub fn interval(&self) -> Duration {
        Duration::from_secs(self.interval_secs)
    }

    pub fn timezone(&self) -> anyhow::Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow::anyhow!("invalid timezone {:?}: {}", self.timezone, e))
    }
}

#[derive(Debug, Deserialize, Clone, Default)]
#[serde(default)]
pub struct RetentionSettings {
    /// Unset keeps the whole history
    pub max_samples: Option<usize>,
    pub deduplicate: bool,
}

impl From<&RetentionSettings> for RetentionPolicy {
    fn from(settings: &RetentionSettings) -> Self {
        RetentionPolicy {
            max_samples: settings.max_samples,
            deduplicate: settings.deduplicate,
        }
    }
}

impl AppConfig {
    pub fn validate(&self) -> anyhow::Result<()> {
        self.polling.timezone()?;
        if self.polling.interval_secs == 0 {
            anyhow::bail!("polling.interval_secs must be greater than zero");
        }
        if self.polling.last_n == 0 {
            anyhow::bail!("polling.last_n must be greater than zero");
        }
        if self.retention.max_samples == Some(0) {
            anyhow::bail!("retention.max_samples must be greater than zero when set");
        }
        Ok(())
    }
}

/// Load `config/dashboard.*` if present, falling back to the built-in defaults
pub fn load_config() -> anyhow::Result<AppConfig> {
    load_config_from("config/dashboard")
}

pub fn load_config_from(name: &str) -> anyhow::Result<AppConfig> {
    let settings = config::Config::builder()
        .add_source(config::File::with_name(name).required(false))
        .build()?;

    let config: AppConfig = settings.try_deserialize()?;
    config.validate()?;
    Ok(config)
}
