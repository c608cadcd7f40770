use std::{env, path::PathBuf, str::FromStr};

use tracing::warn;

pub const DEFAULT_LOG_FILTER: &str = "blog_admin=debug,tower_http=debug";

const DEFAULT_DATABASE_URL: &str = "sqlite://database.sqlite";
const DEFAULT_PORT: u16 = 9000;
const DEFAULT_FRONTEND_DIR: &str = "../frontend/build";
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub port: u16,
    pub frontend_dir: PathBuf,
    pub db_max_connections: u32,
}

impl Config {
    pub fn init() -> Config {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Config {
        let database_url =
            lookup("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string());
        let frontend_dir = lookup("FRONTEND_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from(DEFAULT_FRONTEND_DIR));

        Config {
            database_url,
            port: parse_or("PORT", lookup("PORT"), DEFAULT_PORT),
            frontend_dir,
            db_max_connections: parse_or(
                "DB_MAX_CONNECTIONS",
                lookup("DB_MAX_CONNECTIONS"),
                DEFAULT_MAX_CONNECTIONS,
            ),
        }
    }
}

fn parse_or<T: FromStr + Copy + std::fmt::Display>(key: &str, raw: Option<String>, default: T) -> T {
    match raw {
        None => default,
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{key}={raw:?} is not valid, using {default}");
            default
        }),
    }
}
