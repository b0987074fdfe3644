//! Asistencia Domain Layer
//!
//! This crate holds the RUT identifier logic shared by every intake path of
//! the attendance tracker: the check-in prompt, member registration,
//! spreadsheet import, QR enrolment and voice capture all funnel through the
//! same four pure functions defined here.
//!
//! ## Key Concepts
//!
//! - **RUT**: Chilean national identifier, a 7-8 digit body plus a check character
//! - **Check digit**: Módulo 11 weighted sum over the body, `0`-`9` or `K`
//! - **Clean form**: digits and check character only, `K` upper-cased
//! - **Formatted form**: `12.345.678-5`
//! - **Member**: the record a formatted RUT is persisted into
//!
//! ## Architecture
//!
//! - Pure functions, no I/O, no shared state
//! - Value types carry their invariants
//! - Persistence is reached only through the [`traits::MemberDirectory`] trait

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod check_digit;
pub mod error;
pub mod extract;
pub mod member;
pub mod rut;
pub mod traits;

// Re-exports for convenience
pub use check_digit::{compute_check_digit, CheckDigit};
pub use error::RutError;
pub use member::{InMemoryDirectory, Member};
pub use rut::{clean, format, validate, Rut};
