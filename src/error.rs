use thiserror::Error;

pub type ViewResult<T> = Result<T, ViewError>;

#[derive(Debug, Error)]
pub enum ViewError {
    #[error("invalid pixel area: width={width}, height={height}")]
    InvalidPixelArea { width: f64, height: f64 },

    #[error("invalid data: {0}")]
    InvalidData(String),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("unknown view: {0}")]
    UnknownView(String),

    #[error("no display name for label `{0}`")]
    UnknownLabel(String),

    #[error("transport error: {0}")]
    Transport(String),
}
