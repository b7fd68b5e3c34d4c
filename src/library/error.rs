//! Library error types

use thiserror::Error;

/// Structural inconsistency found while walking parent links
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HierarchyFault {
    #[error("parent category '{0}' does not exist")]
    DanglingParent(String),
    #[error("parent links loop back through '{0}'")]
    Cycle(String),
    #[error("ancestor chain is deeper than {0} levels")]
    TooDeep(usize),
}

/// Typed failure of a library operation
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("'{0}' does not exist")]
    NotFound(String),

    #[error("broken hierarchy above '{uri}': {fault}")]
    BrokenHierarchy { uri: String, fault: HierarchyFault },

    #[error("comment content must not be empty")]
    InvalidContent,

    #[error("authentication required")]
    Unauthenticated,

    #[error(transparent)]
    Store(#[from] anyhow::Error),
}

impl LibraryError {
    pub(crate) fn broken(uri: &str, fault: HierarchyFault) -> Self {
        LibraryError::BrokenHierarchy {
            uri: uri.to_string(),
            fault,
        }
    }
}

pub type LibraryResult<T> = std::result::Result<T, LibraryError>;
