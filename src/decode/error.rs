//! Error Handling.
//!
//! This is a private module. Its public content is being re-exported by the
//! parent module.

use crate::error::ErrorKind;
use super::source::Pos;


//------------ DecodeError ---------------------------------------------------

/// An error happened while decoding data.
///
/// The error consists of the kind of problem and the offset in the input
/// where it was detected.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
#[error("{kind} at offset {pos}")]
pub struct DecodeError {
    kind: ErrorKind,
    pos: Pos,
}

impl DecodeError {
    /// Creates a new error of the given kind at the given position.
    pub fn new(kind: ErrorKind, pos: impl Into<Pos>) -> Self {
        let pos = pos.into();
        log::debug!("decoding failed at offset {}: {}", pos, kind);
        DecodeError { kind, pos }
    }

    /// Returns the kind of the error.
    pub fn kind(&self) -> &ErrorKind {
        &self.kind
    }

    /// Returns the position in the input where the error was detected.
    pub fn pos(&self) -> Pos {
        self.pos
    }
}
