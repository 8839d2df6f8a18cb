use std::{net::SocketAddr, time::Duration};

/// Login created or refreshed at startup.
#[derive(Clone)]
pub struct BootstrapUser {
    pub username: String,
    /// argon2 PHC string.
    pub password_hash: String,
}

pub struct Config {
    pub listen_addr: SocketAddr,
    pub db_path: String,
    pub cors_allow: Vec<String>,
    pub request_timeout: Duration,
    /// Base64 (or 32-character) JWT secret. A random one is generated when unset.
    pub secret_key: Option<String>,
    pub session_ttl: Duration,
    /// Stock whose trading days define the calendar.
    pub reference_stock: String,
    pub bootstrap_user: Option<BootstrapUser>,
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
}

fn optional_env(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let listen_addr: SocketAddr = env_or("ASX_LISTEN_ADDR", "0.0.0.0:8080")
            .parse()
            .expect("Invalid ASX_LISTEN_ADDR");
        let db_path = env_or("ASX_DB_PATH", "./db/app.db");
        let cors_allow = env_or("ASX_CORS_ALLOW_ORIGINS", "*")
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
        let timeout_ms: u64 = env_or("ASX_REQUEST_TIMEOUT_MS", "30000")
            .parse()
            .unwrap_or(30000);
        let session_secs: u64 = env_or("ASX_SESSION_TTL_SECS", "86400")
            .parse()
            .unwrap_or(86400);
        let bootstrap_user = match (
            optional_env("ASX_BOOTSTRAP_USER"),
            optional_env("ASX_BOOTSTRAP_PASSWORD_HASH"),
        ) {
            (Some(username), Some(password_hash)) => Some(BootstrapUser {
                username,
                password_hash,
            }),
            _ => None,
        };
        Self {
            listen_addr,
            db_path,
            cors_allow,
            request_timeout: Duration::from_millis(timeout_ms),
            secret_key: optional_env("ASX_SECRET_KEY"),
            session_ttl: Duration::from_secs(session_secs),
            reference_stock: env_or("ASX_REFERENCE_STOCK", "ANZ"),
            bootstrap_user,
        }
    }
}
