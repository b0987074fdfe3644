//! Error types for RUT parsing

use thiserror::Error;

/// Structural problems found while turning user input into a [`crate::Rut`]
///
/// `validate` never surfaces these; it folds every one of them into `false`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RutError {
    /// Fewer than two significant characters after cleaning
    #[error("RUT too short: {len} significant character(s), need at least 2")]
    TooShort {
        /// Cleaned length
        len: usize,
    },

    /// Body contains something other than decimal digits
    #[error("RUT body must contain only digits: '{0}'")]
    NonDigitBody(String),

    /// Check character outside `0-9` / `K`
    #[error("Invalid check character: '{0}'")]
    InvalidCheckCharacter(char),

    /// Check character does not match the body
    #[error("Check digit mismatch: expected {expected}, found {found}")]
    CheckDigitMismatch {
        /// Computed from the body
        expected: char,
        /// Supplied by the user
        found: char,
    },
}
