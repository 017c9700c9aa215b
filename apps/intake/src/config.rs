use anyhow::Result;

/// Application configuration loaded from environment variables. Every
/// variable is optional; the intake core itself reads no environment.
#[derive(Debug, Clone)]
pub struct Config {
    pub rust_log: String,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            rust_log: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        })
    }
}
