//! The kinds of errors.
//!
//! Both encoding and decoding report failures using the same set of error
//! kinds collected in [`ErrorKind`]. The decoder wraps them into a
//! [`DecodeError`] that adds the position in the input where the problem
//! was detected, the encoder into an [`EncodeError`] that adds the path of
//! the offending value within the value tree.
//!
//! [`DecodeError`]: crate::decode::DecodeError
//! [`EncodeError`]: crate::encode::EncodeError

use crate::ident::Tag;


//------------ ErrorKind -----------------------------------------------------

/// The kind of an encoding or decoding error.
#[derive(Clone, Debug, Eq, PartialEq, thiserror::Error)]
pub enum ErrorKind {
    /// The input ended before the value it contained was complete.
    #[error("unexpected end of data")]
    TruncatedInput,

    /// Length octets are malformed or inconsistent.
    #[error("invalid length: {0}")]
    InvalidLength(&'static str),

    /// The content octets of a primitive value are malformed.
    #[error("invalid value: {0}")]
    InvalidValue(&'static str),

    /// The data uses an encoding this crate does not implement.
    #[error("unsupported: {0}")]
    UnsupportedFeature(&'static str),

    /// A field that is neither optional nor defaulted is missing.
    #[error("missing required field '{0}'")]
    MissingRequiredField(&'static str),

    /// A value does not have the type its schema asks for.
    #[error("type mismatch: {0}")]
    TypeMismatch(String),

    /// None of the alternatives of a CHOICE accepts the tag found.
    #[error("no alternative matches tag {0}")]
    NoMatchingAlternative(Tag),

    /// There is data left after the value was complete.
    #[error("trailing data")]
    TrailingData,

    /// Values are nested deeper than the configured limit.
    #[error("nesting deeper than {0} levels")]
    NestingTooDeep(usize),
}

impl ErrorKind {
    /// Creates a type mismatch between what was expected and what was found.
    pub(crate) fn mismatch(
        expected: impl std::fmt::Display, found: impl std::fmt::Display
    ) -> Self {
        ErrorKind::TypeMismatch(format!("expected {expected}, found {found}"))
    }
}
