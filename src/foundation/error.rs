use std::path::PathBuf;

pub type ConvertResult<T> = Result<T, ConvertError>;

#[derive(thiserror::Error, Debug)]
pub enum ConvertError {
    #[error("invalid layout: {0}")]
    InvalidLayout(String),

    #[error("extraction failed for frame {frame_index}: {cause}")]
    ExtractionFailed { frame_index: usize, cause: String },

    #[error("io failure at '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config error: {0}")]
    Config(String),

    #[error("serialization error: {0}")]
    Serde(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl ConvertError {
    pub fn invalid_layout(msg: impl Into<String>) -> Self {
        Self::InvalidLayout(msg.into())
    }

    pub fn extraction(frame_index: usize, cause: impl std::fmt::Display) -> Self {
        Self::ExtractionFailed {
            frame_index,
            cause: cause.to_string(),
        }
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn serde(msg: impl Into<String>) -> Self {
        Self::Serde(msg.into())
    }

    /// Frame index carried by [`ConvertError::ExtractionFailed`], if any.
    pub fn frame_index(&self) -> Option<usize> {
        match self {
            Self::ExtractionFailed { frame_index, .. } => Some(*frame_index),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/foundation/error.rs"]
mod tests;
