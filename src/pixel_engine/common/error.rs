use thiserror::Error;

#[derive(Error, Debug)]
pub enum EngineError {
    #[error("Invalid geometry: {0}")]
    InvalidGeometry(String),

    #[error("Buffer too small: {0}")]
    BufferTooSmall(String),

    #[error("Accelerated path requested but not usable on this target")]
    UnsupportedAcceleration,
}

pub type Result<T> = std::result::Result<T, EngineError>;
