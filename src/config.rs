use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Origins allowed to call the API (the desktop shell's webview)
    #[serde(default)]
    pub allowed_origins: Vec<String>,
    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    /// e.g. `sqlite://bizledger.db?mode=rwc`
    pub url: String,
    /// Clamped to 1; see `app_state::connect`
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    /// Apply pending migrations on startup
    #[serde(default = "default_run_migrations")]
    pub run_migrations: bool,
}

fn default_request_timeout_ms() -> u64 {
    10_000
}

fn default_max_connections() -> u32 {
    1
}

fn default_run_migrations() -> bool {
    true
}

impl Config {
    pub fn load() -> Result<Self, config::ConfigError> {
        // Load .env file if it exists (for environment variable overrides)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 4780)?
            .set_default("database.url", "sqlite://bizledger.db?mode=rwc")?
            .add_source(config::File::with_name("config").required(false))
            // BIZLEDGER__DATABASE__URL=... overrides database.url
            .add_source(
                config::Environment::with_prefix("BIZLEDGER")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        config.try_deserialize()
    }
}
