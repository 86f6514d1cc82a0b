/// Errors raised by the garden library
#[derive(Debug, thiserror::Error)]
pub enum GardenError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("plant not found: {0}")]
    PlantNotFound(String),

    #[error("not enough points: need {needed}, have {available}")]
    InsufficientPoints { needed: u32, available: u32 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse garden file: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[error("failed to write garden file: {0}")]
    TomlSer(#[from] toml::ser::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, GardenError>;
