use std::time::Duration;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("set PKEY as environment variable")]
    MissingKey,
    #[error("{0} is not a number: {1}")]
    NotANumber(&'static str, String),
}

const DEV_KEY: &str = "insecure-dev-key";

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub bind_addr: String,
    /// HMAC secret for signing tokens.
    pub pkey: String,
    pub blacklist_sweep: Duration,
}

impl Config {
    /// Reads the process environment, honouring a `.env` file.
    pub fn from_env() -> Result<Config, ConfigError> {
        Config::from_lookup(|key| dotenv::var(key).ok())
    }

    pub fn from_lookup(var: impl Fn(&str) -> Option<String>) -> Result<Config, ConfigError> {
        let production = var("APP_ENV").is_some_and(|env| env == "production");
        let pkey = match var("PKEY").filter(|key| !key.is_empty()) {
            Some(key) => key,
            None if production => return Err(ConfigError::MissingKey),
            None => DEV_KEY.to_owned(),
        };

        let blacklist_sweep = match var("BLACKLIST_SWEEP_SECS") {
            Some(secs) => Duration::from_secs(
                secs.parse()
                    .map_err(|_| ConfigError::NotANumber("BLACKLIST_SWEEP_SECS", secs.clone()))?,
            ),
            None => Duration::from_secs(60),
        };

        Ok(Config {
            database_url: var("DATABASE_URL").unwrap_or_else(|| "sqlite://privy.db?mode=rwc".to_owned()),
            bind_addr: var("BIND_ADDR").unwrap_or_else(|| "0.0.0.0:3000".to_owned()),
            pkey,
            blacklist_sweep,
        })
    }
}
