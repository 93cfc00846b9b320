use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    pub api_key: String,
    pub base_url: String,
    pub per_page: u32,
    pub log_level: String,
    pub log_file: String,
}

impl AppConfig {
    pub fn new() -> Result<Self, ConfigError> {
        let env = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let s = Config::builder()
            .set_default("api_key", "")?
            .set_default("base_url", "https://api.pexels.com/v1/search")?
            .set_default("per_page", 9_i64)?
            .set_default("log_level", "info")?
            .set_default("log_file", "image-finder.log")?
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false))
            .add_source(File::with_name("config/local").required(false))
            // PEXELS_API_KEY is the only variable expected in practice.
            .add_source(Environment::with_prefix("pexels"))
            .build()?;

        s.try_deserialize()
    }
}
