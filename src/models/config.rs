use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use crate::store::StoreSettings;

/// Which recognition backend serves `POST /recognize`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecognitionProvider {
    #[default]
    Disabled,
    /// External endpoint speaking the `{imageBase64, mimeType}` contract.
    Endpoint,
    /// Gemini `generateContent` called directly.
    Gemini,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecognitionConfig {
    #[serde(default)]
    pub provider: RecognitionProvider,
    pub endpoint_url: Option<String>,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_secs: u64,
}

/// Configuration options of the receipts service.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub address: String,
    pub port: u16,
    /// SQLite database of the remote store; absent selects local mode.
    pub database_url: Option<String>,
    /// Tenant identifier; absent selects local mode.
    pub app_id: Option<String>,
    /// Custom sign-in token; anonymous sign-in when absent.
    pub auth_token: Option<String>,
    /// How often the remote store is re-read.
    pub poll_interval_secs: u64,
    pub recognition: RecognitionConfig,
}

impl ServerConfig {
    /// Built-in defaults, then `config/default.yaml`, then
    /// `config/local.yaml`, then `APP_*` environment variables.
    ///
    /// Nested keys use `__`, e.g. `APP_RECOGNITION__PROVIDER`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_with(environment())
    }

    fn load_with(environment: Environment) -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("address", "127.0.0.1")?
            .set_default("port", 8080)?
            .set_default("poll_interval_secs", 15)?
            .set_default("recognition.provider", "disabled")?
            .set_default("recognition.model", "gemini-2.5-flash")?
            .set_default("recognition.timeout_secs", 60)?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(environment)
            .build()?
            .try_deserialize()
    }

    pub fn store_settings(&self) -> StoreSettings {
        StoreSettings {
            database_url: self.database_url.clone(),
            app_id: self.app_id.clone(),
            auth_token: self.auth_token.clone(),
        }
    }
}

fn environment() -> Environment {
    Environment::with_prefix("APP")
        .prefix_separator("_")
        .separator("__")
        .try_parsing(true)
}
