//! Codec error types

use std::fmt;
use thiserror::Error;

/// Location of a member inside a value tree, e.g. `args.recipients[2]`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Path(String);

impl Path {
    /// Empty path (the value itself)
    pub fn root() -> Self {
        Path(String::new())
    }

    /// Path as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Prepend a parent segment.
    ///
    /// Index segments (`[2]`) attach without a separator, named segments are
    /// joined with `.`.
    fn within(self, parent: &str) -> Self {
        if parent.is_empty() {
            self
        } else if self.0.is_empty() {
            Path(parent.to_string())
        } else if self.0.starts_with('[') {
            Path(format!("{}{}", parent, self.0))
        } else {
            Path(format!("{}.{}", parent, self.0))
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            f.write_str("<root>")
        } else {
            f.write_str(&self.0)
        }
    }
}

/// ABI codec error
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AbiError {
    /// Malformed or self-inconsistent ABI description
    #[error("invalid descriptor at {path}: {reason}")]
    Descriptor {
        /// Offending descriptor
        path: Path,
        /// Violated constraint
        reason: String,
    },

    /// Value does not match its type
    #[error("encoding error at {path}: {reason}")]
    Encoding {
        /// Offending member
        path: Path,
        /// Violated constraint
        reason: String,
    },

    /// Calldata does not match the type
    #[error("decoding error at {path}: {reason}")]
    Decoding {
        /// Offending member
        path: Path,
        /// Violated constraint
        reason: String,
    },

    /// Declared length above the configured limit
    #[error("size limit exceeded at {path}: declared length {declared}, limit {limit}")]
    SizeLimit {
        /// Offending member
        path: Path,
        /// Length found in calldata
        declared: usize,
        /// Configured maximum
        limit: usize,
    },

    /// Leading 4 bytes of calldata are not the method selector
    #[error("selector mismatch: expected {expected}, found {found}")]
    SelectorMismatch {
        /// Selector of the method, `0x`-prefixed hex
        expected: String,
        /// Leading calldata bytes, `0x`-prefixed hex
        found: String,
    },

    /// No method with this name
    #[error("unknown method: {0}")]
    UnknownMethod(String),

    /// No method with this selector
    #[error("no method matches selector {0}")]
    UnknownSelector(String),

    /// ABI JSON could not be parsed
    #[error("invalid ABI JSON: {0}")]
    Json(String),
}

impl AbiError {
    pub(crate) fn descriptor(reason: impl Into<String>) -> Self {
        AbiError::Descriptor { path: Path::root(), reason: reason.into() }
    }

    pub(crate) fn encoding(reason: impl Into<String>) -> Self {
        AbiError::Encoding { path: Path::root(), reason: reason.into() }
    }

    pub(crate) fn decoding(reason: impl Into<String>) -> Self {
        AbiError::Decoding { path: Path::root(), reason: reason.into() }
    }

    pub(crate) fn size_limit(declared: usize, limit: usize) -> Self {
        AbiError::SizeLimit { path: Path::root(), declared, limit }
    }

    /// Prefix the error path with an enclosing member name or `[index]`.
    ///
    /// Errors without a path are returned unchanged.
    pub fn within(self, parent: &str) -> Self {
        match self {
            AbiError::Descriptor { path, reason } => {
                AbiError::Descriptor { path: path.within(parent), reason }
            }
            AbiError::Encoding { path, reason } => {
                AbiError::Encoding { path: path.within(parent), reason }
            }
            AbiError::Decoding { path, reason } => {
                AbiError::Decoding { path: path.within(parent), reason }
            }
            AbiError::SizeLimit { path, declared, limit } => {
                AbiError::SizeLimit { path: path.within(parent), declared, limit }
            }
            other => other,
        }
    }

    /// Path of the failing member, if the error carries one
    pub fn path(&self) -> Option<&Path> {
        match self {
            AbiError::Descriptor { path, .. }
            | AbiError::Encoding { path, .. }
            | AbiError::Decoding { path, .. }
            | AbiError::SizeLimit { path, .. } => Some(path),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for AbiError {
    fn from(e: serde_json::Error) -> Self {
        AbiError::Json(e.to_string())
    }
}
