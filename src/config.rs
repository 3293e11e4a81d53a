use std::{net::SocketAddr, path::PathBuf, str::FromStr, time::Duration};

use crate::error::{AppError, Result};

// Settings read from the environment (and `.env`, if present)
#[derive(Debug, Clone)]
pub struct Config {
    pub listen_addr: SocketAddr,
    pub database_url: String,
    pub secret: String,
    pub static_dir: PathBuf,
    pub max_connections: u32,
    pub query_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let required = |key: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .ok_or_else(|| AppError::Config(format!("{} must be set", key)))
        };

        let listen_addr = parse("LISTEN_ADDR", &required("LISTEN_ADDR")?)?;
        let database_url = required("DATABASE_URL")?;
        let secret = required("SECRET")?;

        let static_dir = lookup("STATIC_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("./public"));
        let max_connections = match lookup("DB_MAX_CONNECTIONS") {
            Some(raw) => parse("DB_MAX_CONNECTIONS", &raw)?,
            None => 10,
        };
        let query_timeout = match lookup("QUERY_TIMEOUT_SECS") {
            Some(raw) => Duration::from_secs(parse("QUERY_TIMEOUT_SECS", &raw)?),
            None => Duration::from_secs(5),
        };

        Ok(Self {
            listen_addr,
            database_url,
            secret,
            static_dir,
            max_connections,
            query_timeout,
        })
    }
}

fn parse<T: FromStr>(key: &str, raw: &str) -> Result<T> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::Config(format!("{} has an invalid value: {:?}", key, raw)))
}
