// Roadlapse Error Types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum RoadLapseError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid filename: {0}")]
    InvalidFilename(String),

    #[error("Invalid path: {0}")]
    InvalidPath(String),

    #[error("FFprobe error: {0}")]
    FFprobe(String),

    #[error("FFmpeg error: {0}")]
    FFmpeg(String),

    #[error("OCR error: {0}")]
    Ocr(String),

    #[error("Geocoding error: {0}")]
    Geocode(String),

    #[error("No segments to convert: {0}")]
    EmptyInput(String),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for RoadLapseError {
    fn from(err: anyhow::Error) -> Self {
        RoadLapseError::Other(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, RoadLapseError>;
