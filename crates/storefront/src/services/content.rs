//! JSON content documents (navigation menu, footer) served as-is.

use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ContentError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{path} is not valid JSON: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// The documents the storefront knows how to serve.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContentDocument {
    Menu,
    Footer,
}

impl ContentDocument {
    #[must_use]
    pub const fn file_name(self) -> &'static str {
        match self {
            Self::Menu => "menu.json",
            Self::Footer => "footer.json",
        }
    }

    /// Read and parse the document from `dir`.
    ///
    /// # Errors
    ///
    /// Returns `ContentError::Read` if the file cannot be read and
    /// `ContentError::Parse` if it is not JSON.
    pub async fn load(self, dir: &Path) -> Result<serde_json::Value, ContentError> {
        let path = dir.join(self.file_name());
        let bytes = tokio::fs::read(&path)
            .await
            .map_err(|source| ContentError::Read {
                path: path.clone(),
                source,
            })?;

        serde_json::from_slice(&bytes).map_err(|source| ContentError::Parse { path, source })
    }
}
