use crate::editor::EditorError;
use crate::storage::ExportError;
use thiserror::Error;

pub type AppResult<T> = std::result::Result<T, AppError>;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Editor(#[from] EditorError),
    #[error(transparent)]
    Export(#[from] ExportError),
    #[error("gtk application exited with status {code}")]
    GtkExit { code: i32 },
}
