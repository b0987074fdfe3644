//! Gatekeeper error types

use thiserror::Error;

/// Errors that can occur during intake
///
/// A rejected RUT is not an error; it comes back as a rejected
/// [`crate::IntakeResult`]. These cover the collaborators failing.
#[derive(Error, Debug)]
pub enum GatekeeperError {
    /// Member directory failed during lookup or insert
    #[error("Directory error: {0}")]
    Directory(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
