//! Configuration module for the HMS frontend.
//!
//! All configuration is loaded from environment variables with sensible defaults.

use std::env;
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::errors::AppError;

/// Backend base URL used when `HMS_API_BASE` is not set.
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000/api";

/// Application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct Config {
    /// Base URL of the REST backend, without a trailing slash
    pub api_base: String,
    /// Address to bind the server to
    pub bind_addr: SocketAddr,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit log lines as JSON objects instead of text
    pub log_json: bool,
    /// Mark the token cookie `Secure`
    pub secure_cookie: bool,
    /// TrueType face for invoices, replacing the embedded one
    pub invoice_font: Option<PathBuf>,
    pub invoice_font_bold: Option<PathBuf>,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let api_base = env::var("HMS_API_BASE")
            .unwrap_or_else(|_| DEFAULT_API_BASE.to_string())
            .trim_end_matches('/')
            .to_string();

        let raw_addr = env::var("HMS_BIND_ADDR").unwrap_or_else(|_| "127.0.0.1:3000".to_string());
        let bind_addr = raw_addr
            .parse()
            .map_err(|_| AppError::Internal(format!("Invalid HMS_BIND_ADDR: {}", raw_addr)))?;

        let log_level = env::var("HMS_LOG_LEVEL").unwrap_or_else(|_| "info".to_string());

        let log_json = env::var("HMS_LOG_FORMAT")
            .map(|v| v.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let secure_cookie = env::var("HMS_SECURE_COOKIE")
            .map(|v| matches!(v.as_str(), "1" | "true" | "yes"))
            .unwrap_or(false);

        let invoice_font = env::var_os("HMS_INVOICE_FONT").map(PathBuf::from);
        let invoice_font_bold = env::var_os("HMS_INVOICE_FONT_BOLD").map(PathBuf::from);

        Ok(Self {
            api_base,
            bind_addr,
            log_level,
            log_json,
            secure_cookie,
            invoice_font,
            invoice_font_bold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Both cases share one test so they never race on the process environment.
    #[test]
    fn test_config_from_env() {
        env::remove_var("HMS_API_BASE");
        env::remove_var("HMS_BIND_ADDR");
        env::remove_var("HMS_LOG_LEVEL");
        env::remove_var("HMS_SECURE_COOKIE");
        env::remove_var("HMS_LOG_FORMAT");
        env::remove_var("HMS_INVOICE_FONT");
        env::remove_var("HMS_INVOICE_FONT_BOLD");

        let config = Config::from_env().unwrap();

        assert_eq!(config.api_base, DEFAULT_API_BASE);
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:3000");
        assert_eq!(config.log_level, "info");
        assert!(!config.secure_cookie);
        assert!(!config.log_json);
        assert!(config.invoice_font.is_none());

        env::set_var("HMS_API_BASE", "http://backend:9000/api/");
        env::set_var("HMS_BIND_ADDR", "not-an-address");
        let result = Config::from_env();
        assert!(matches!(result, Err(AppError::Internal(_))));

        env::set_var("HMS_BIND_ADDR", "0.0.0.0:8081");
        env::set_var("HMS_LOG_FORMAT", "JSON");
        env::set_var("HMS_SECURE_COOKIE", "true");
        env::set_var("HMS_INVOICE_FONT", "/opt/fonts/NotoSans.ttf");
        let config = Config::from_env().unwrap();
        assert_eq!(config.api_base, "http://backend:9000/api");
        assert_eq!(config.bind_addr.port(), 8081);
        assert!(config.log_json);
        assert!(config.secure_cookie);
        assert_eq!(
            config.invoice_font.as_deref(),
            Some(std::path::Path::new("/opt/fonts/NotoSans.ttf"))
        );
        assert!(config.invoice_font_bold.is_none());

        env::remove_var("HMS_API_BASE");
        env::remove_var("HMS_BIND_ADDR");
        env::remove_var("HMS_LOG_FORMAT");
        env::remove_var("HMS_SECURE_COOKIE");
        env::remove_var("HMS_INVOICE_FONT");
    }
}
