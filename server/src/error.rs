use std::path::PathBuf;

use thiserror::Error;

/// Failures of the color identification core
#[derive(Debug, Error)]
pub enum ColorError {
    /// Catalog file missing, unreadable or with malformed rows
    #[error("failed to load color catalog {}: {source}", .path.display())]
    CatalogLoad {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("color catalog contains no entries")]
    CatalogEmpty,

    #[error("failed to decode image: {0}")]
    Decode(#[from] image::ImageError),

    #[error("invalid color count {requested}: must be between 1 and {limit}")]
    InvalidColorCount { requested: usize, limit: usize },

    #[error("invalid {channel} value {value}: must be between 0 and 255")]
    InvalidInput { channel: &'static str, value: i64 },
}

impl ColorError {
    /// Whether the failure was caused by the caller's input rather than the service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            ColorError::Decode(_) | ColorError::InvalidColorCount { .. } | ColorError::InvalidInput { .. }
        )
    }
}
