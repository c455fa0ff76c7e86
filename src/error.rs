use thiserror::Error;

use crate::grades::InvalidGradeError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum EngineError {
    #[error(transparent)]
    InvalidGrade(#[from] InvalidGradeError),
    #[error("incomplete profile: {entered} subjects entered, at least {required} required")]
    IncompleteProfile { entered: usize, required: usize },
    #[error("subject entered more than once: {0}")]
    DuplicateSubject(String),
    #[error("unknown cluster category: {0}")]
    ClusterNotFound(String),
    #[error("unknown course category: {0}")]
    UnknownCategory(String),
    #[error("{category} catalog unavailable: {reason}")]
    CatalogUnavailable { category: String, reason: String },
}

pub type EngineResult<T> = Result<T, EngineError>;
