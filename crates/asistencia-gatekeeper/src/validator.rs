//! RUT intake validation logic

use crate::{GatekeeperError, IntakeConfig};
use asistencia_domain::traits::MemberDirectory;
use asistencia_domain::{format, Rut, RutError};
use std::fmt;
use tracing::debug;

/// Result of checking one RUT
#[derive(Debug, Clone)]
pub struct IntakeResult {
    /// Whether the RUT passed intake
    pub status: IntakeStatus,

    /// Formatted form of the input, even when rejected
    pub formatted: String,

    /// Parsed value, absent when the input is structurally malformed
    pub rut: Option<Rut>,

    /// Rejection reasons (if any)
    pub reasons: Vec<RejectionReason>,
}

impl IntakeResult {
    /// Whether the RUT was accepted
    pub fn is_accepted(&self) -> bool {
        self.status == IntakeStatus::Accepted
    }
}

/// Intake status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntakeStatus {
    /// RUT accepted
    Accepted,

    /// RUT rejected
    Rejected,
}

/// Reasons for rejection
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// No RUT supplied (empty cell or field)
    Missing,

    /// Input cannot be split into a numeric body and check character
    Malformed(RutError),

    /// Check character does not match the body
    CheckDigitMismatch {
        /// Computed from the body
        expected: char,
        /// Supplied
        found: char,
    },

    /// Body digit count outside the configured range
    BodyLength {
        /// Actual body length
        len: usize,
        /// Minimum accepted
        min: usize,
        /// Maximum accepted
        max: usize,
    },

    /// RUT already registered
    Duplicate {
        /// Formatted RUT of the existing member
        formatted: String,
        /// Existing member's name, possibly empty
        name: String,
    },
}

impl fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectionReason::Missing => write!(f, "no RUT supplied"),
            RejectionReason::Malformed(e) => write!(f, "malformed RUT: {}", e),
            RejectionReason::CheckDigitMismatch { expected, found } => {
                write!(f, "check digit {} does not match (expected {})", found, expected)
            }
            RejectionReason::BodyLength { len, min, max } => {
                write!(f, "body has {} digits, expected {}-{}", len, min, max)
            }
            RejectionReason::Duplicate { formatted, name } if name.is_empty() => {
                write!(f, "{} is already registered", formatted)
            }
            RejectionReason::Duplicate { formatted, name } => {
                write!(f, "{} is already registered to {}", formatted, name)
            }
        }
    }
}

/// The Gatekeeper checks RUTs before they reach a member record
pub struct Gatekeeper {
    config: IntakeConfig,
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: IntakeConfig) -> Result<Self, GatekeeperError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a Gatekeeper with default configuration
    pub fn default_config() -> Self {
        Self {
            config: IntakeConfig::default(),
        }
    }

    /// Active configuration
    pub fn config(&self) -> &IntakeConfig {
        &self.config
    }

    /// Check a RUT against the configured rules
    ///
    /// # Arguments
    ///
    /// * `input` - Free-form RUT as typed, scanned or imported
    /// * `directory` - Member directory for duplicate detection (optional)
    ///
    /// # Returns
    ///
    /// An intake result listing every rule the input broke. Errors are
    /// reserved for the directory itself failing.
    pub fn check<D: MemberDirectory>(
        &self,
        input: &str,
        directory: Option<&D>,
    ) -> Result<IntakeResult, GatekeeperError>
    where
        D::Error: fmt::Display,
    {
        let formatted = format(input);

        if formatted.is_empty() {
            return Ok(Self::rejected(formatted, None, vec![RejectionReason::Missing]));
        }

        let rut = match Rut::parse(input) {
            Ok(rut) => rut,
            Err(e) => {
                debug!(input, error = %e, "RUT rejected as malformed");
                return Ok(Self::rejected(
                    formatted,
                    None,
                    vec![RejectionReason::Malformed(e)],
                ));
            }
        };

        let mut reasons = Vec::new();

        // 1. Check digit
        if self.config.require_valid_check_digit {
            if let Some(reason) = self.check_digit(&rut) {
                reasons.push(reason);
            }
        }

        // 2. Body length
        if self.config.enforce_body_length {
            if let Some(reason) = self.check_body_length(&rut) {
                reasons.push(reason);
            }
        }

        // 3. Duplicates (if directory available)
        if self.config.reject_duplicates {
            if let Some(directory) = directory {
                if let Some(reason) = self.check_duplicate(&rut, directory)? {
                    reasons.push(reason);
                }
            }
        }

        if reasons.is_empty() {
            debug!(raw = rut.raw(), rut = %rut, "RUT accepted");
            Ok(IntakeResult {
                status: IntakeStatus::Accepted,
                formatted,
                rut: Some(rut),
                reasons,
            })
        } else {
            debug!(raw = rut.raw(), rut = %rut, reasons = reasons.len(), "RUT rejected");
            Ok(Self::rejected(formatted, Some(rut), reasons))
        }
    }

    fn rejected(formatted: String, rut: Option<Rut>, reasons: Vec<RejectionReason>) -> IntakeResult {
        IntakeResult {
            status: IntakeStatus::Rejected,
            formatted,
            rut,
            reasons,
        }
    }

    fn check_digit(&self, rut: &Rut) -> Option<RejectionReason> {
        let expected = rut.expected_check();
        if expected == rut.check() {
            return None;
        }
        Some(RejectionReason::CheckDigitMismatch {
            expected: expected.as_char(),
            found: rut.check().as_char(),
        })
    }

    fn check_body_length(&self, rut: &Rut) -> Option<RejectionReason> {
        let len = rut.body().len();
        let (min, max) = (self.config.min_body_len, self.config.max_body_len);
        if (min..=max).contains(&len) {
            return None;
        }
        Some(RejectionReason::BodyLength { len, min, max })
    }

    fn check_duplicate<D: MemberDirectory>(
        &self,
        rut: &Rut,
        directory: &D,
    ) -> Result<Option<RejectionReason>, GatekeeperError>
    where
        D::Error: fmt::Display,
    {
        let existing = directory
            .find_by_rut(rut)
            .map_err(|e| GatekeeperError::Directory(format!("Failed to look up {}: {}", rut, e)))?;

        // Stored RUTs may predate formatting; show them in canonical form
        Ok(existing.map(|member| RejectionReason::Duplicate {
            formatted: member
                .parsed_rut()
                .map(|stored| stored.formatted())
                .unwrap_or_else(|_| member.rut.clone()),
            name: member.full_name(),
        }))
    }
}
