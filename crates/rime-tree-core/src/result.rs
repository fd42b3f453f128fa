//! Result type alias for configuration tree operations

use crate::error::RimeTreeError;

/// Standard Result type for configuration tree operations
pub type Result<T> = std::result::Result<T, RimeTreeError>;

/// Extension trait separating per-document failures from fatal ones
pub trait ResultExt<T> {
    /// Turn a recoverable error into `Ok(None)`, keep fatal errors
    fn recoverable(self) -> Result<Option<T>>;
}

impl<T> ResultExt<T> for Result<T> {
    fn recoverable(self) -> Result<Option<T>> {
        match self {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.is_recoverable() => {
                tracing::warn!("Skipping document: {}", err);
                Ok(None)
            }
            Err(err) => Err(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recoverable_drops_syntax_errors() {
        let result: Result<u32> = Err(RimeTreeError::document_syntax("a.yaml", "oops"));
        assert!(matches!(result.recoverable(), Ok(None)));
    }

    #[test]
    fn test_recoverable_keeps_fatal_errors() {
        let result: Result<u32> = Err(RimeTreeError::key_mismatch("a", "b"));
        assert!(result.recoverable().is_err());

        let result: Result<u32> = Ok(7);
        assert_eq!(result.recoverable().unwrap(), Some(7));
    }
}
