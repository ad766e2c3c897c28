use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, MapError>;

#[derive(Debug, Error)]
pub enum MapError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse scenario YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to load map image {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },

    #[error("grid row {row} has {actual} cells, expected {expected}")]
    RaggedGrid { row: usize, expected: usize, actual: usize },

    #[error(transparent)]
    Mask(#[from] rrt::MaskError),

    #[error(transparent)]
    Build(#[from] rrt::BuildError),
}

impl MapError {
    pub(crate) fn parse(line: usize, message: impl Into<String>) -> MapError {
        MapError::Parse { line, message: message.into() }
    }
}
