//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use crate::error::ErrorKind;


//------------ EncodeError ---------------------------------------------------

/// A value could not be encoded.
///
/// The error consists of the kind of problem and the path of the offending
/// value within the value tree. The path lists field and alternative names
/// separated by dots with element indexes in brackets, for instance
/// `content.signerInfos[0].version`. The path is empty if the problem is
/// with the top-level value.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{kind} at '{path}'")]
pub struct EncodeError {
    kind: ErrorKind,
    path: String,
}

impl EncodeError {
    /// Creates a new error of the given kind for the given path.
    pub fn new(kind: ErrorKind, path: impl Into<String>) -> Self {
        let path = path.into();
        log::debug!("encoding failed at '{}': {}", path, kind);
        EncodeError { kind, path }
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the path of the offending value.
    pub fn path(&self) -> &str {
        &self.path
    }
}
