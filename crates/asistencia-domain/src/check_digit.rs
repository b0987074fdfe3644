//! Check digit module - Módulo 11 verification character

use crate::RutError;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The verification character of a RUT (dígito verificador)
///
/// Always one of `0`-`9` or an upper-case `K`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "char", into = "char")]
pub enum CheckDigit {
    /// Numeric check digit, 0-9
    Digit(u8),

    /// Check value 10, written as `K`
    K,
}

impl CheckDigit {
    /// Compute the check digit for a body of decimal digits
    ///
    /// Fallible twin of [`compute_check_digit`] for callers that cannot
    /// guarantee digit-only input.
    ///
    /// # Examples
    ///
    /// ```
    /// use asistencia_domain::CheckDigit;
    ///
    /// assert_eq!(CheckDigit::compute("12345678").unwrap().as_char(), '5');
    /// assert!(CheckDigit::compute("12K4").is_err());
    /// ```
    pub fn compute(body: &str) -> Result<Self, RutError> {
        if !is_digit_body(body) {
            return Err(RutError::NonDigitBody(body.to_string()));
        }
        Ok(Self::from_digit_body(body))
    }

    /// Parse a check character, accepting lower-case `k`
    pub fn from_char(c: char) -> Result<Self, RutError> {
        match c {
            '0'..='9' => Ok(CheckDigit::Digit(c as u8 - b'0')),
            'k' | 'K' => Ok(CheckDigit::K),
            other => Err(RutError::InvalidCheckCharacter(other)),
        }
    }

    /// Get the check digit as its display character
    pub fn as_char(&self) -> char {
        match self {
            CheckDigit::Digit(d) => char::from(b'0' + d),
            CheckDigit::K => 'K',
        }
    }

    // Caller guarantees `body` is ASCII digits.
    pub(crate) fn from_digit_body(body: &str) -> Self {
        let mut sum: u32 = 0;
        let mut multiplier: u32 = 2;

        // Rightmost digit first; only the residue mod 11 matters, so keep
        // the running sum reduced and arbitrarily long bodies never overflow.
        for b in body.bytes().rev() {
            sum = (sum + u32::from(b - b'0') * multiplier) % 11;
            multiplier = if multiplier == 7 { 2 } else { multiplier + 1 };
        }

        match 11 - sum {
            11 => CheckDigit::Digit(0),
            10 => CheckDigit::K,
            n => CheckDigit::Digit(n as u8),
        }
    }
}

impl fmt::Display for CheckDigit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for CheckDigit {
    type Error = RutError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::from_char(c)
    }
}

impl From<CheckDigit> for char {
    fn from(check: CheckDigit) -> Self {
        check.as_char()
    }
}

/// Compute the Módulo 11 check character for a RUT body
///
/// Digits are weighted right to left with multipliers cycling 2 through 7;
/// `11 - sum % 11` maps 11 to `'0'`, 10 to `'K'`, anything else to itself.
/// An empty body yields `'0'`.
///
/// # Panics
/// Panics if `body` contains anything other than ASCII digits. Strip the
/// check character and run input through [`crate::clean`] first, or use
/// [`CheckDigit::compute`] to get an error instead.
///
/// # Examples
///
/// ```
/// use asistencia_domain::compute_check_digit;
///
/// assert_eq!(compute_check_digit("12345678"), '5');
/// assert_eq!(compute_check_digit("10000013"), 'K');
/// ```
pub fn compute_check_digit(body: &str) -> char {
    assert!(
        is_digit_body(body),
        "RUT body must contain only digits, got '{}'",
        body
    );
    CheckDigit::from_digit_body(body).as_char()
}

pub(crate) fn is_digit_body(body: &str) -> bool {
    body.bytes().all(|b| b.is_ascii_digit())
}
