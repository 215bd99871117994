use thiserror::Error;

/// Failure reported by an [`crate::Annotator`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("annotation failed: {0}")]
pub struct AnnotationError(pub String);

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IndexError {
    /// `add` on an id that is already stored
    #[error("document with id [{0}] already indexed")]
    DuplicateId(String),
    /// lookup or removal of an id that is not stored
    #[error("document with id [{0}] not found in index")]
    NotFound(String),
    /// association lookup for an entity that was never observed
    #[error("entity with name [{0}] not found in index")]
    UnknownEntity(String),
    /// query mode outside `or` / `and`
    #[error("unsupported query mode [{0}]")]
    UnsupportedMode(String),
    #[error(transparent)]
    Annotation(#[from] AnnotationError),
}

impl IndexError {
    pub fn is_duplicate(&self) -> bool {
        matches!(self, IndexError::DuplicateId(_))
    }
}

pub type Result<T> = std::result::Result<T, IndexError>;
