use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::config::AppConfig;

const EXPORT_SUBDIR: &str = "Pictures";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("missing HOME environment variable")]
    MissingHomeDirectory,
    #[error("io error while exporting to {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

pub type ExportResult<T> = std::result::Result<T, ExportError>;

/// Writes exported images to a fixed file name inside an export directory.
#[derive(Debug, Clone)]
pub struct ExportService {
    export_dir: PathBuf,
    file_name: String,
}

impl ExportService {
    pub fn with_paths(export_dir: PathBuf, file_name: impl Into<String>) -> Self {
        Self {
            export_dir,
            file_name: file_name.into(),
        }
    }

    /// Uses `export_dir` from the config, else `$HOME/Pictures`.
    pub fn from_config(config: &AppConfig) -> ExportResult<Self> {
        let export_dir = match config.export_dir.clone() {
            Some(dir) => dir,
            None => {
                let home = std::env::var_os("HOME").ok_or(ExportError::MissingHomeDirectory)?;
                PathBuf::from(home).join(EXPORT_SUBDIR)
            }
        };
        Ok(Self::with_paths(export_dir, config.export_file_name()))
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn target_path(&self) -> PathBuf {
        self.export_dir.join(&self.file_name)
    }

    /// Overwrites any previous export with the same name.
    pub fn save(&self, bytes: &[u8]) -> ExportResult<PathBuf> {
        let target = self.target_path();
        fs::create_dir_all(&self.export_dir).map_err(|source| ExportError::Io {
            path: self.export_dir.clone(),
            source,
        })?;
        fs::write(&target, bytes).map_err(|source| ExportError::Io {
            path: target.clone(),
            source,
        })?;
        tracing::info!(path = %target.display(), bytes = bytes.len(), "exported image");
        Ok(target)
    }
}
