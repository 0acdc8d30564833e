use std::net::SocketAddr;

use crate::variant::{OutputMode, RiskProfile};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Environment {
    Development,
    Test,
    Production,
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Test => write!(f, "test"),
            Environment::Production => write!(f, "production"),
        }
    }
}

#[derive(Clone)]
pub struct AppConfig {
    pub database_url: String,
    pub env: Environment,
    pub bind_addr: SocketAddr,
    pub log_level: String,
    pub api_key_hash_salt: String,
    pub search_api_key: String,
    pub search_base_url: String,
    pub model_api_key: String,
    pub model_base_url: String,
    pub model_name: String,
    pub model_temperature: f32,
    pub model_max_output_tokens: u32,
    pub output_mode: OutputMode,
    pub risk_profile: RiskProfile,
    pub upstream_timeout_secs: u64,
    pub history_limit: i64,
    pub db_max_connections: u32,
    pub db_min_connections: u32,
    pub db_acquire_timeout_secs: u64,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("env", &self.env)
            .field("bind_addr", &self.bind_addr)
            .field("log_level", &self.log_level)
            .field("database_url", &"[redacted]")
            .field("api_key_hash_salt", &"[redacted]")
            .field("search_api_key", &"[redacted]")
            .field("search_base_url", &self.search_base_url)
            .field("model_api_key", &"[redacted]")
            .field("model_base_url", &self.model_base_url)
            .field("model_name", &self.model_name)
            .field("model_temperature", &self.model_temperature)
            .field("model_max_output_tokens", &self.model_max_output_tokens)
            .field("output_mode", &self.output_mode)
            .field("risk_profile", &self.risk_profile)
            .field("upstream_timeout_secs", &self.upstream_timeout_secs)
            .field("history_limit", &self.history_limit)
            .field("db_max_connections", &self.db_max_connections)
            .field("db_min_connections", &self.db_min_connections)
            .field("db_acquire_timeout_secs", &self.db_acquire_timeout_secs)
            .finish()
    }
}
