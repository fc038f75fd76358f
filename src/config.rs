use tracing::debug;

use crate::error::{Error, Result};

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    /// Public origin used for canonical links and site-relative image paths.
    pub base_url: String,
    pub host: String,
    pub port: u16,
    pub max_connections: u32,
    /// Emit `agenda`/`tags` as a one-element array holding the JSON-encoded list.
    pub legacy_array_encoding: bool,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url =
            var("DATABASE_URL").ok_or_else(|| missing("DATABASE_URL"))?;
        let base_url = var("BASE_URL")
            .ok_or_else(|| missing("BASE_URL"))?
            .trim_end_matches('/')
            .to_string();

        let host = var("HOST").unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = match var("PORT") {
            Some(raw) => parse(&raw, "PORT")?,
            None => DEFAULT_PORT,
        };
        let max_connections = match var("DATABASE_MAX_CONNECTIONS") {
            Some(raw) => parse(&raw, "DATABASE_MAX_CONNECTIONS")?,
            None => DEFAULT_MAX_CONNECTIONS,
        };
        let legacy_array_encoding = match var("LEGACY_ARRAY_ENCODING") {
            Some(raw) => parse(&raw, "LEGACY_ARRAY_ENCODING")?,
            None => false,
        };

        debug!("Base URL: {}", base_url);
        debug!("Legacy array encoding: {}", legacy_array_encoding);

        Ok(Self {
            database_url,
            base_url,
            host,
            port,
            max_connections,
            legacy_array_encoding,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn missing(key: &str) -> Error {
    Error::Configuration(format!("{} must be set", key))
}

fn parse<T: std::str::FromStr>(raw: &str, key: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| Error::Configuration(format!("{} has an invalid value: {}", key, raw)))
}
