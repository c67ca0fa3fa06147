use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ViewError {
    #[error("invalid page size: {0} (expected: 10|20|50|100)")]
    InvalidPageSize(usize),
    #[error("unknown sort field: {0}")]
    UnknownSortField(String),
}
