use thiserror::Error;

#[derive(Error, Debug)]
pub enum TilingError {
    #[error("invalid detector parameters: {0}")]
    InvalidParameters(String),

    #[error("degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("degenerate intersection: U and V lines are parallel")]
    DegenerateIntersection,

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TilingError>;
