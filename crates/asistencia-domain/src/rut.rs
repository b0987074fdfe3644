//! RUT module - cleaning, formatting and validation of Chilean identifiers
//!
//! The free functions accept anything a user can type, paste, scan or
//! dictate and never fail. [`Rut`] is the structured value for callers that
//! want to hold on to a parsed identifier.

use crate::check_digit::is_digit_body;
use crate::{CheckDigit, RutError};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::str::FromStr;

/// Strip everything except digits and `k`/`K`, upper-casing `k`
///
/// # Examples
///
/// ```
/// use asistencia_domain::clean;
///
/// assert_eq!(clean("12.345.678-9"), "123456789");
/// assert_eq!(clean("abc12kxyz"), "12K");
/// ```
pub fn clean(input: &str) -> String {
    input
        .chars()
        .filter_map(|c| match c {
            '0'..='9' | 'K' => Some(c),
            'k' => Some('K'),
            _ => None,
        })
        .collect()
}

/// Render input as `12.345.678-5`
///
/// Input shorter than two significant characters comes back cleaned but
/// otherwise untouched.
///
/// # Examples
///
/// ```
/// use asistencia_domain::format;
///
/// assert_eq!(format("123456785"), "12.345.678-5");
/// assert_eq!(format("5"), "5");
/// ```
pub fn format(input: &str) -> String {
    let cleaned = clean(input);
    match split_cleaned(&cleaned) {
        Some((body, check)) => format!("{}-{}", group_thousands(body), check),
        None => cleaned,
    }
}

/// Check whether input carries a correct check character
///
/// Punctuation and the case of `k` are ignored. Anything malformed is
/// simply `false`.
///
/// # Examples
///
/// ```
/// use asistencia_domain::validate;
///
/// assert!(validate("12.345.678-5"));
/// assert!(!validate("12.345.678-4"));
/// assert!(!validate(""));
/// ```
pub fn validate(input: &str) -> bool {
    let cleaned = clean(input);
    let Some((body, check)) = split_cleaned(&cleaned) else {
        return false;
    };

    match CheckDigit::compute(body) {
        Ok(expected) => expected.as_char() == check,
        Err(_) => false,
    }
}

/// Split a cleaned string into body and check character
///
/// Cleaned strings are pure ASCII so the byte split is always on a
/// character boundary.
fn split_cleaned(cleaned: &str) -> Option<(&str, char)> {
    if cleaned.len() < 2 {
        return None;
    }
    let (body, check) = cleaned.split_at(cleaned.len() - 1);
    check.chars().next().map(|c| (body, c))
}

/// Insert a `.` every three characters counting from the right
fn group_thousands(body: &str) -> String {
    let len = body.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, c) in body.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push('.');
        }
        out.push(c);
    }
    out
}

/// A parsed RUT
///
/// Holds the text it was parsed from alongside its body and check digit.
/// Two values are equal when their cleaned forms match; how the original
/// text was punctuated never matters. A `Rut` is structurally sound but not
/// necessarily valid: check [`Rut::is_valid`] or parse with
/// [`Rut::parse_valid`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rut {
    raw: String,
    body: String,
    check: CheckDigit,
}

impl Rut {
    /// Parse a RUT from free-form input
    ///
    /// # Errors
    /// Returns error if fewer than two significant characters remain after
    /// cleaning or the body contains a `K`.
    pub fn parse(input: &str) -> Result<Self, RutError> {
        let cleaned = clean(input);
        let (body, check) = split_cleaned(&cleaned).ok_or(RutError::TooShort {
            len: cleaned.len(),
        })?;

        if !is_digit_body(body) {
            return Err(RutError::NonDigitBody(body.to_string()));
        }

        Ok(Self {
            raw: input.to_string(),
            body: body.to_string(),
            check: CheckDigit::from_char(check)?,
        })
    }

    /// Parse a RUT and require its check digit to match
    ///
    /// # Errors
    /// Everything [`Rut::parse`] rejects, plus
    /// [`RutError::CheckDigitMismatch`].
    pub fn parse_valid(input: &str) -> Result<Self, RutError> {
        let rut = Self::parse(input)?;
        let expected = rut.expected_check();
        if expected != rut.check {
            return Err(RutError::CheckDigitMismatch {
                expected: expected.as_char(),
                found: rut.check.as_char(),
            });
        }
        Ok(rut)
    }

    /// Build a valid RUT from its body, computing the check digit
    ///
    /// # Examples
    ///
    /// ```
    /// use asistencia_domain::Rut;
    ///
    /// let rut = Rut::from_body("12.345.678").unwrap();
    /// assert_eq!(rut.to_string(), "12.345.678-5");
    /// ```
    pub fn from_body(body: &str) -> Result<Self, RutError> {
        let digits: String = body.chars().filter(|c| !matches!(c, '.' | ' ')).collect();
        if digits.is_empty() {
            return Err(RutError::TooShort { len: 0 });
        }
        let check = CheckDigit::compute(&digits)?;
        Ok(Self {
            raw: format!("{}{}", digits, check),
            body: digits,
            check,
        })
    }

    /// The text this value was parsed from
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// Body digits, without the check character
    pub fn body(&self) -> &str {
        &self.body
    }

    /// Check character as supplied
    pub fn check(&self) -> CheckDigit {
        self.check
    }

    /// Check character computed from the body
    pub fn expected_check(&self) -> CheckDigit {
        // Bodies are digit-only by construction
        CheckDigit::from_digit_body(&self.body)
    }

    /// Whether the supplied check character matches the body
    pub fn is_valid(&self) -> bool {
        self.expected_check() == self.check
    }

    /// Clean form: body followed by check character
    pub fn cleaned(&self) -> String {
        format!("{}{}", self.body, self.check)
    }

    /// Formatted form, e.g. `12.345.678-5`
    pub fn formatted(&self) -> String {
        format!("{}-{}", group_thousands(&self.body), self.check)
    }
}

impl PartialEq for Rut {
    fn eq(&self, other: &Self) -> bool {
        self.body == other.body && self.check == other.check
    }
}

impl Eq for Rut {}

impl Hash for Rut {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.body.hash(state);
        self.check.hash(state);
    }
}

impl fmt::Display for Rut {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.formatted())
    }
}

impl FromStr for Rut {
    type Err = RutError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Rut {
    type Error = RutError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Rut> for String {
    fn from(rut: Rut) -> Self {
        rut.formatted()
    }
}
