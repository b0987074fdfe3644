//! Asistencia Gatekeeper
//!
//! Decides whether a RUT may enter a member record.
//!
//! The Gatekeeper provides:
//! - Check digit verification
//! - Body length rules
//! - Duplicate detection against a member directory
//! - Batch import with per-row rejection reports
//!
//! # Examples
//!
//! ```
//! use asistencia_domain::InMemoryDirectory;
//! use asistencia_gatekeeper::{Gatekeeper, IntakeConfig};
//!
//! let gatekeeper = Gatekeeper::new(IntakeConfig::strict()).unwrap();
//! let directory = InMemoryDirectory::new();
//!
//! let result = gatekeeper.check("12.345.678-5", Some(&directory)).unwrap();
//! assert!(result.is_accepted());
//! ```

#![warn(missing_docs)]

mod config;
mod error;
mod import;
mod validator;

pub use config::IntakeConfig;
pub use error::GatekeeperError;
pub use import::{ImportReport, RowRejection};
pub use validator::{Gatekeeper, IntakeResult, IntakeStatus, RejectionReason};
