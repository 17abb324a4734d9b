use thiserror::Error;

#[derive(Error, Debug)]
pub enum PivError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image format error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid grid specification: {0}")]
    InvalidGridSpec(String),

    #[error("Invalid settings: {0}")]
    InvalidSettings(String),

    #[error("Degenerate window (standard deviation {std_dev:e})")]
    DegenerateWindow { std_dev: f64 },

    #[error("Shape mismatch: expected {}x{}, got {}x{}", expected.1, expected.0, actual.1, actual.0)]
    ShapeMismatch {
        expected: (usize, usize),
        actual: (usize, usize),
    },

    #[error("Output sink error: {0}")]
    Sink(String),
}

pub type Result<T> = std::result::Result<T, PivError>;
