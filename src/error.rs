use thiserror::Error;

use crate::clock::ClockError;

#[derive(Error, Debug)]
pub enum SharkError {
    #[error("Clock error: {0}")]
    Clock(#[from] ClockError),

    #[error("Failed to parse settings: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to write settings: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SharkError>;
