// Service settings
// Loaded from ~/.config/justiguide/settings.json

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3001;
pub const DEFAULT_LOG_FILTER: &str = "info";

pub const ENV_HOST: &str = "JUSTIGUIDE_HOST";
pub const ENV_PORT: &str = "JUSTIGUIDE_PORT";
pub const ENV_IMPORT_CONFIG: &str = "JUSTIGUIDE_IMPORT_CONFIG";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    // Server
    #[serde(rename = "server.host")]
    pub host: String,

    #[serde(rename = "server.port")]
    pub port: u16,

    // Import
    #[serde(rename = "import.config", skip_serializing_if = "Option::is_none")]
    pub import_config: Option<PathBuf>,

    // Logging, used when RUST_LOG is unset
    #[serde(rename = "log.filter")]
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: DEFAULT_HOST.into(),
            port: DEFAULT_PORT,
            import_config: None,  // None = built-in source list
            log_filter: DEFAULT_LOG_FILTER.into(),
        }
    }
}

impl Settings {
    /// Get the settings file path
    pub fn config_path() -> PathBuf {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("justiguide");
        config_dir.join("settings.json")
    }

    /// Load settings from the user config dir, then apply env overrides
    pub fn load() -> Self {
        let mut settings = Self::load_from(&Self::config_path());
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    /// Load settings from a specific file, falling back to defaults
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Self::default();
        }

        match fs::read_to_string(path) {
            Ok(contents) => Self::parse(&contents).unwrap_or_else(|e| {
                eprintln!("Error parsing {}: {}", path.display(), e);
                eprintln!("Using default settings");
                Self::default()
            }),
            Err(e) => {
                eprintln!("Error reading {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// Parse settings JSON. Lines starting with `//` are comments.
    pub fn parse(contents: &str) -> Result<Self, String> {
        let cleaned: String = contents
            .lines()
            .filter(|line| !line.trim().starts_with("//"))
            .collect::<Vec<_>>()
            .join("\n");

        serde_json::from_str(&cleaned).map_err(|e| e.to_string())
    }

    /// Apply `JUSTIGUIDE_*` overrides. Unusable values are reported and ignored.
    pub fn apply_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(host) = var(ENV_HOST) {
            let host = host.trim();
            if host.is_empty() {
                eprintln!("Ignoring empty {ENV_HOST}");
            } else {
                self.host = host.to_string();
            }
        }

        if let Some(port) = var(ENV_PORT) {
            match port.trim().parse::<u16>() {
                Ok(p) => self.port = p,
                Err(_) => eprintln!("Ignoring {ENV_PORT}={port:?}: not a port number"),
            }
        }

        if let Some(path) = var(ENV_IMPORT_CONFIG) {
            if path.trim().is_empty() {
                eprintln!("Ignoring empty {ENV_IMPORT_CONFIG}");
            } else {
                self.import_config = Some(PathBuf::from(path));
            }
        }
    }

    /// `host:port` for binding
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
