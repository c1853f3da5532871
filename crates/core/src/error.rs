use thiserror::Error;

#[derive(Debug, Error)]
pub enum BrowserError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid scan root: {0}")]
    InvalidRoot(String),
    #[error("invalid exclude pattern: {0}")]
    InvalidPattern(#[from] globset::Error),
    #[error("configuration error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("unknown {kind}: {value}")]
    UnknownValue { kind: &'static str, value: String },
}
