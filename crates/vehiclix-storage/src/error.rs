use thiserror::Error;

use vehiclix_core::error::CoreError;

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("object not found: {key}")]
    NotFound { key: String },

    #[error("version conflict on {key} (expected {expected}, found {actual})")]
    VersionConflict {
        key: String,
        expected: u64,
        actual: u64,
    },

    #[error("precondition failed for key: {key}")]
    PreconditionFailed { key: String },

    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("S3 GetObject error: {0}")]
    GetObject(String),

    #[error("S3 PutObject error: {0}")]
    PutObject(String),

    #[error("S3 DeleteObject error: {0}")]
    DeleteObject(String),

    #[error("S3 ListObjects error: {0}")]
    ListObjects(String),

    #[error("id sequence for {key} is contended")]
    SequenceContended { key: String },
}

impl StorageError {
    /// Another writer changed the record between read and write.
    pub fn is_conflict(&self) -> bool {
        matches!(
            self,
            Self::VersionConflict { .. } | Self::PreconditionFailed { .. }
        )
    }
}
