//! Server configuration from the environment.

use std::net::SocketAddr;
use std::path::PathBuf;
use thiserror::Error;

const DEFAULT_ADDR: &str = "0.0.0.0:8000";
const DEFAULT_UPLOAD_FOLDER: &str = "./uploaded_files";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid PAGEMARK_ADDR {value:?}: {reason}")]
    InvalidAddr { value: String, reason: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// Where uploaded PDFs are written and served from.
    pub upload_folder: PathBuf,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let addr_value = lookup("PAGEMARK_ADDR").unwrap_or_else(|| DEFAULT_ADDR.to_string());
        let addr = addr_value.parse().map_err(|e: std::net::AddrParseError| ConfigError::InvalidAddr {
            value: addr_value.clone(),
            reason: e.to_string(),
        })?;
        let upload_folder = lookup("UPLOAD_FOLDER")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_UPLOAD_FOLDER.to_string())
            .into();
        Ok(Self { addr, upload_folder })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_lookup(|_| None).unwrap();
        assert_eq!(config.addr, "0.0.0.0:8000".parse::<SocketAddr>().unwrap());
        assert_eq!(config.upload_folder, PathBuf::from("./uploaded_files"));
    }

    #[test]
    fn test_overrides() {
        let config = ServerConfig::from_lookup(|key| match key {
            "PAGEMARK_ADDR" => Some("127.0.0.1:9000".to_string()),
            "UPLOAD_FOLDER" => Some("/srv/pdfs".to_string()),
            _ => None,
        })
        .unwrap();
        assert_eq!(config.addr.port(), 9000);
        assert_eq!(config.upload_folder, PathBuf::from("/srv/pdfs"));
    }

    #[test]
    fn test_bad_addr() {
        let result = ServerConfig::from_lookup(|key| (key == "PAGEMARK_ADDR").then(|| "nowhere".to_string()));
        assert!(matches!(result, Err(ConfigError::InvalidAddr { .. })));
    }
}
