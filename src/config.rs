//! Service configuration

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub storage: StorageConfig,
    #[serde(default)]
    pub sheet: SheetConfig,
    #[serde(default)]
    pub drive: DriveConfig,
    #[serde(default)]
    pub mail: MailConfig,
    #[serde(default)]
    pub translate: TranslateConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// HTTP port
    #[serde(default = "default_http_port")]
    pub http_port: u16,

    /// Public base URL used when building absolute links (falls back to the
    /// request host when unset)
    #[serde(default)]
    pub public_base_url: Option<String>,

    /// Maximum accepted request body size for uploads
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory holding the ideas database
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,

    /// Local staging directory for uploaded media
    #[serde(default = "default_upload_dir")]
    pub upload_dir: PathBuf,
}

/// Spreadsheet sink (row-append endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Append endpoint; when unset the sink is skipped with a warning
    #[serde(default)]
    pub append_url: Option<String>,

    /// Bearer token for the endpoint
    #[serde(default)]
    pub api_token: Option<String>,

    #[serde(default = "default_sheet_timeout")]
    pub timeout_secs: u64,
}

/// Object storage sink (file upload endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DriveConfig {
    /// Upload endpoint; when unset uploads fail and local files are retained
    #[serde(default)]
    pub upload_url: Option<String>,

    #[serde(default)]
    pub api_token: Option<String>,

    #[serde(default = "default_drive_timeout")]
    pub timeout_secs: u64,
}

/// Mail relay (JSON send endpoint)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MailConfig {
    /// Relay endpoint; when unset mail is skipped with a warning
    #[serde(default)]
    pub relay_url: Option<String>,

    #[serde(default)]
    pub api_token: Option<String>,

    /// Sender address
    #[serde(default)]
    pub from_addr: String,

    /// Internal team address for the per-idea digest
    #[serde(default)]
    pub team_addr: String,

    #[serde(default = "default_mail_timeout")]
    pub timeout_secs: u64,
}

/// External text-generation service (transcription, translation, extraction)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslateConfig {
    /// Service base URL; when unset every call fails fast
    #[serde(default)]
    pub endpoint: Option<String>,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_model")]
    pub model: String,

    /// The backing service can be unreachable or slow; every call is bounded
    #[serde(default = "default_translate_timeout")]
    pub timeout_secs: u64,
}

fn default_http_port() -> u16 {
    8080
}
fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}
fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_upload_dir() -> PathBuf {
    PathBuf::from("uploads")
}
fn default_sheet_timeout() -> u64 {
    10
}
fn default_drive_timeout() -> u64 {
    20
}
fn default_mail_timeout() -> u64 {
    10
}
fn default_model() -> String {
    "flash-latest".to_string()
}
fn default_translate_timeout() -> u64 {
    25
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: default_http_port(),
            public_base_url: None,
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            upload_dir: default_upload_dir(),
        }
    }
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            append_url: None,
            api_token: None,
            timeout_secs: default_sheet_timeout(),
        }
    }
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            upload_url: None,
            api_token: None,
            timeout_secs: default_drive_timeout(),
        }
    }
}

impl Default for MailConfig {
    fn default() -> Self {
        Self {
            relay_url: None,
            api_token: None,
            from_addr: String::new(),
            team_addr: String::new(),
            timeout_secs: default_mail_timeout(),
        }
    }
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            endpoint: None,
            api_key: None,
            model: default_model(),
            timeout_secs: default_translate_timeout(),
        }
    }
}

impl Config {
    /// Load config from a TOML file
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    /// Path of the ideas database inside the data directory
    pub fn db_path(&self) -> PathBuf {
        self.storage.data_dir.join("ideas.db")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_complete() {
        let config = Config::default();
        assert_eq!(config.server.http_port, 8080);
        assert_eq!(config.server.max_upload_bytes, 25 * 1024 * 1024);
        assert_eq!(config.translate.timeout_secs, 25);
        assert!(config.sheet.append_url.is_none());
        assert_eq!(config.db_path(), PathBuf::from("data").join("ideas.db"));
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let config: Config = toml::from_str(
            r#"
            [server]
            http_port = 9000

            [mail]
            team_addr = "ideas@example.com"
            "#,
        )
        .unwrap();
        assert_eq!(config.server.http_port, 9000);
        assert_eq!(config.mail.team_addr, "ideas@example.com");
        assert_eq!(config.mail.timeout_secs, 10);
        assert_eq!(config.storage.upload_dir, PathBuf::from("uploads"));
    }
}
