use std::path::PathBuf;
use thiserror::Error;

/// A specialized `Result` type for image search operations.
pub type FinderResult<T> = Result<T, FinderError>;

/// The error type for all image search operations.
#[derive(Debug, Error)]
pub enum FinderError {
    #[error("{message}")]
    Usage { message: String },

    #[error("Invalid tolerance '{value}': expected a number between 0.0 and 1.0")]
    InvalidTolerance { value: String },

    #[error("Invalid value '{value}' for {name}")]
    InvalidArgument { name: String, value: String },

    #[error("Invalid match configuration: {description}")]
    InvalidConfig { description: String },

    #[error("Failed to decode image {path:?}: {source}")]
    ImageDecode {
        path: PathBuf,
        source: image::ImageError,
    },

    #[error("Failed to list images in {path:?}: {source}")]
    DirectoryScan {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Matching worker failed to complete: {source}")]
    Worker {
        #[from]
        source: tokio::task::JoinError,
    },

    #[error("Failed to start worker runtime: {source}")]
    WorkerRuntime { source: std::io::Error },

    #[error("Failed to render report: {source}")]
    Report {
        #[from]
        source: serde_json::Error,
    },
}

impl FinderError {
    /// Errors caused by the command line rather than by the images themselves
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            FinderError::Usage { .. }
                | FinderError::InvalidTolerance { .. }
                | FinderError::InvalidArgument { .. }
        )
    }

    pub fn image_decode(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        FinderError::ImageDecode {
            path: path.into(),
            source,
        }
    }

    pub fn directory_scan(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        FinderError::DirectoryScan {
            path: path.into(),
            source,
        }
    }
}
