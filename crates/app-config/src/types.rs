// In crates/app-config/src/types.rs

use serde::Deserialize;

#[derive(Deserialize, Debug, Clone)]
pub struct Settings {
    /// The application's general settings.
    pub app: AppSettings,
    /// Settings for the Binance API.
    pub binance: BinanceSettings,
    /// Settings for the HTTP server.
    pub server: ServerSettings,
}

#[derive(Deserialize, Debug, Clone)]
pub struct AppSettings {
    /// The environment the application is running in (e.g., "development", "production").
    pub environment: String,
    /// The log level for the application.
    pub log_level: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct BinanceSettings {
    /// The API key for Binance.
    pub api_key: String,
    /// The secret key for Binance.
    pub secret_key: String,
    /// The REST API base URL for Binance.
    pub rest_base_url: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}
