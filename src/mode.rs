//! The encoding mode.
//!
//! This is a private module. Its public items are re-exported by the parent.


//------------ Mode ----------------------------------------------------------

/// The rules to apply when decoding data.
///
/// Encoding always follows the Distinguished Encoding Rules. When decoding,
/// the mode decides how picky the decoder is about alternative encodings
/// of the same value.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum Mode {
    /// Basic Encoding Rules.
    ///
    /// These are the most flexible rules, allowing alternative encodings for
    /// some types such as long form lengths with leading zeros, integers
    /// with redundant leading octets, or constructed octet strings.
    ///
    /// Indefinite length values are allowed by BER but not supported by
    /// this crate.
    #[default]
    Ber,

    /// Distinguished Encoding Rules.
    ///
    /// These rules always employ definite length values and require the
    /// shortest possible encoding.
    Der,
}

impl Mode {
    /// Returns whether the mode requires the shortest encodings.
    pub fn is_restricted(self) -> bool {
        matches!(self, Mode::Der)
    }

    /// Returns whether constructed octet strings are allowed.
    pub fn allow_constructed_strings(self) -> bool {
        matches!(self, Mode::Ber)
    }
}
