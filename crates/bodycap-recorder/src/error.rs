use bodycap_core::error::ConfigError;
use bodycap_zed::SessionError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CaptureError {
    #[error("Config: {0}")]
    Config(#[from] ConfigError),
    #[error("Session: {0}")]
    Session(#[from] SessionError),
    #[error("Csv: {0}")]
    Csv(#[from] csv::Error),
    #[error("Io: {0}")]
    Io(#[from] std::io::Error),
}
