use std::path::PathBuf;

use crate::error::ConfigError;

#[derive(serde::Deserialize, Clone)]
pub struct Settings {
    pub application: ApplicationSettings,
    pub database: DatabaseSettings,
    pub jwt: JwtSettings,
    pub polka: PolkaSettings,
}

#[derive(serde::Deserialize, Clone)]
pub struct ApplicationSettings {
    #[serde(default = "default_host")]
    pub host: String,
    pub port: u16,
    /// Directory served under `/app`
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,
}

/// Location of the JSON document backing the record store
#[derive(serde::Deserialize, Clone)]
pub struct DatabaseSettings {
    #[serde(default = "default_database_path")]
    pub path: PathBuf,
}

/// JWT authentication settings
#[derive(serde::Deserialize, Clone)]
pub struct JwtSettings {
    pub secret: String,
    #[serde(default = "default_access_token_expiry")]
    pub access_token_expiry: i64, // seconds, capped at 24h when issuing
    #[serde(default = "default_issuer")]
    pub issuer: String,
}

/// Payment provider webhook settings
#[derive(serde::Deserialize, Clone)]
pub struct PolkaSettings {
    pub api_key: String,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from(".")
}

fn default_database_path() -> PathBuf {
    PathBuf::from("database.json")
}

fn default_access_token_expiry() -> i64 {
    3600
}

fn default_issuer() -> String {
    "chirpy".to_string()
}

impl Settings {
    /// Both the signing secret and the webhook API key must be present.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.jwt.secret.trim().is_empty() {
            return Err(ConfigError::MissingRequired("jwt.secret".to_string()));
        }
        if self.polka.api_key.trim().is_empty() {
            return Err(ConfigError::MissingRequired("polka.api_key".to_string()));
        }
        if self.jwt.access_token_expiry <= 0 {
            return Err(ConfigError::InvalidValue(
                "jwt.access_token_expiry must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reads `configuration.{toml,yaml,json}` if present, then `APP__*` environment
/// variables (e.g. `APP__JWT__SECRET`).
pub fn get_configuration() -> Result<Settings, config::ConfigError> {
    let settings = config::Config::builder()
        .set_default("application.port", 8080)?
        .add_source(config::File::with_name("configuration").required(false))
        .add_source(
            config::Environment::with_prefix("APP")
                .prefix_separator("__")
                .separator("__"),
        )
        .build()?;
    settings.try_deserialize::<Settings>()
}
