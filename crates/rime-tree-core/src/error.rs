//! Error types and handling for configuration tree operations

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for loading, building and merging configuration trees
#[derive(Debug, Error)]
pub enum RimeTreeError {
    /// A layer directory is missing or cannot be enumerated
    #[error("Cannot read directory '{path}': {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A single document could not be read
    #[error("Cannot read file '{path}': {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A document is not valid UTF-8
    #[error("File '{path}' is not valid UTF-8")]
    Utf8 { path: PathBuf },

    /// A document could not be parsed into a node tree
    #[error("Syntax error in '{path}': {message}")]
    DocumentSyntax { path: PathBuf, message: String },

    /// Two subtrees with different keys were paired for merging
    #[error("Cannot merge node '{found}' onto node '{expected}': keys differ")]
    KeyMismatch { expected: String, found: String },

    /// A lookup path does not resolve to a node
    #[error("No node at '{path}' in the {layer} layer")]
    NotFound { path: String, layer: String },

    /// Other file system I/O, such as writing a config file
    #[error("IO error for path '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Configuration loading or validation errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Error kind enumeration for categorizing errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Directory,
    File,
    Syntax,
    Merge,
    Lookup,
    Io,
    Config,
    Internal,
}

impl RimeTreeError {
    /// Get the error kind for this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            RimeTreeError::DirectoryRead { .. } => ErrorKind::Directory,
            RimeTreeError::FileRead { .. } | RimeTreeError::Utf8 { .. } => ErrorKind::File,
            RimeTreeError::DocumentSyntax { .. } => ErrorKind::Syntax,
            RimeTreeError::KeyMismatch { .. } => ErrorKind::Merge,
            RimeTreeError::NotFound { .. } => ErrorKind::Lookup,
            RimeTreeError::Io { .. } => ErrorKind::Io,
            RimeTreeError::Config { .. } => ErrorKind::Config,
            RimeTreeError::Internal { .. } => ErrorKind::Internal,
        }
    }

    /// Check if this error only affects one document, so the rest of the
    /// layer can still be loaded
    pub fn is_recoverable(&self) -> bool {
        matches!(self.kind(), ErrorKind::File | ErrorKind::Syntax)
    }

    /// Create a directory read error
    pub fn directory_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::DirectoryRead {
            path: path.into(),
            source,
        }
    }

    /// Create a file read error
    pub fn file_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::FileRead {
            path: path.into(),
            source,
        }
    }

    /// Create a document syntax error
    pub fn document_syntax(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::DocumentSyntax {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Create a key mismatch error
    pub fn key_mismatch(expected: impl Into<String>, found: impl Into<String>) -> Self {
        Self::KeyMismatch {
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Create a lookup error
    pub fn not_found(path: impl Into<String>, layer: impl fmt::Display) -> Self {
        Self::NotFound {
            path: path.into(),
            layer: layer.to_string(),
        }
    }

    /// Create an IO error with path context
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config_error(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create an internal error
    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<std::io::Error> for RimeTreeError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            path: PathBuf::new(),
            source: err,
        }
    }
}
