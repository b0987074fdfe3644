//! Gatekeeper configuration

use crate::GatekeeperError;
use serde::{Deserialize, Serialize};

/// Configuration for intake rules
///
/// Loaded from the `[intake]` table of the CLI config file; every field is
/// optional there and falls back to [`IntakeConfig::default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IntakeConfig {
    /// Reject RUTs whose check character does not match the body
    pub require_valid_check_digit: bool,

    /// Enforce `min_body_len..=max_body_len` body digits
    pub enforce_body_length: bool,

    /// Shortest accepted body (digits, without check character)
    pub min_body_len: usize,

    /// Longest accepted body
    pub max_body_len: usize,

    /// Reject RUTs already present in the member directory
    pub reject_duplicates: bool,
}

impl Default for IntakeConfig {
    /// Registration form behaviour: check digit and duplicates only
    fn default() -> Self {
        Self {
            require_valid_check_digit: true,
            enforce_body_length: false,
            min_body_len: 7,
            max_body_len: 8,
            reject_duplicates: true,
        }
    }
}

impl IntakeConfig {
    /// Create a permissive configuration (structural parse only)
    ///
    /// Matches the spreadsheet importer, which cleaned cells but admitted
    /// them without checking.
    pub fn permissive() -> Self {
        Self {
            require_valid_check_digit: false,
            enforce_body_length: false,
            min_body_len: 7,
            max_body_len: 8,
            reject_duplicates: false,
        }
    }

    /// Create a strict configuration (all rules, 7-8 digit bodies)
    pub fn strict() -> Self {
        Self {
            require_valid_check_digit: true,
            enforce_body_length: true,
            min_body_len: 7,
            max_body_len: 8,
            reject_duplicates: true,
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), GatekeeperError> {
        if self.enforce_body_length {
            if self.min_body_len == 0 {
                return Err(GatekeeperError::Config(
                    "min_body_len must be greater than 0".to_string(),
                ));
            }
            if self.min_body_len > self.max_body_len {
                return Err(GatekeeperError::Config(format!(
                    "min_body_len ({}) cannot exceed max_body_len ({})",
                    self.min_body_len, self.max_body_len
                )));
            }
        }
        Ok(())
    }
}
