//! Build stage errors.

/// Errors that can occur during a build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("Failed to render template {path}: {message}")]
    Template { path: String, message: String },

    #[error("Failed to write {path}: {message}")]
    Write { path: String, message: String },

    #[error("Failed to prepare directory {path}: {message}")]
    Directory { path: String, message: String },

    #[error("Image activation failed: {0}")]
    Activate(#[from] tessera_images::ActivateError),
}

impl BuildError {
    pub(crate) fn read(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        BuildError::Read {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn write(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        BuildError::Write {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }

    pub(crate) fn directory(path: &std::path::Path, err: impl std::fmt::Display) -> Self {
        BuildError::Directory {
            path: path.display().to_string(),
            message: err.to_string(),
        }
    }
}
