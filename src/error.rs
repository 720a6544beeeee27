//! Error handling and result types for B+ tree operations.
//!
//! Only two kinds of failure can surface from this crate: constructing a tree
//! with an unusable capacity, and the validator detecting a broken invariant.
//! Absence of a key is never an error (`remove` returns `false`, `get`
//! returns `None`).

/// Error type for B+ tree operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TreeError {
    /// Tree constructed with a node capacity below the supported minimum.
    InvalidCapacity(String),
    /// The validator found a broken tree invariant. This always signals a
    /// defect in the engine itself, never a user error.
    InvariantViolation(String),
}

impl TreeError {
    /// Create an `InvalidCapacity` error with context.
    pub fn invalid_capacity(capacity: usize, min_required: usize) -> Self {
        Self::InvalidCapacity(format!(
            "capacity {} is invalid (minimum required: {})",
            capacity, min_required
        ))
    }

    /// Create an `InvariantViolation` error with context.
    pub fn invariant(details: impl Into<String>) -> Self {
        Self::InvariantViolation(details.into())
    }

    /// Check if this error is a capacity error.
    pub fn is_capacity_error(&self) -> bool {
        matches!(self, Self::InvalidCapacity(_))
    }

    /// Check if this error is an invariant violation.
    pub fn is_invariant_violation(&self) -> bool {
        matches!(self, Self::InvariantViolation(_))
    }
}

impl std::fmt::Display for TreeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TreeError::InvalidCapacity(msg) => write!(f, "invalid capacity: {}", msg),
            TreeError::InvariantViolation(msg) => write!(f, "invariant violation: {}", msg),
        }
    }
}

impl std::error::Error for TreeError {}

/// Result type for tree operations that may fail.
pub type TreeResult<T> = Result<T, TreeError>;

/// Result type for tree construction.
pub type InitResult<T> = Result<T, TreeError>;
