use std::fmt;

use justiguide_io::ExtractError;

#[derive(Debug)]
pub enum IngestError {
    /// TOML parse / deserialization error.
    ConfigParse(String),
    /// Config validation error (empty group name, no sources, etc.).
    ConfigValidation(String),
    /// A CSV source exists but could not be read or parsed.
    Csv { path: String, source: ExtractError },
    /// IO error (config file read, etc.).
    Io(String),
}

impl fmt::Display for IngestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ConfigParse(msg) => write!(f, "config parse error: {msg}"),
            Self::ConfigValidation(msg) => write!(f, "config validation error: {msg}"),
            Self::Csv { path, source } => write!(f, "{path}: {source}"),
            Self::Io(msg) => write!(f, "IO error: {msg}"),
        }
    }
}

impl std::error::Error for IngestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Csv { source, .. } => Some(source),
            _ => None,
        }
    }
}
