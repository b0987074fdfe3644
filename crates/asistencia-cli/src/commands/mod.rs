//! Command implementations.

pub mod config;
pub mod extract;
pub mod import;
pub mod inspect;
pub mod rut;

pub use self::config::execute_config;
pub use self::extract::execute_extract;
pub use self::import::execute_import;
pub use self::inspect::execute_inspect;
pub use self::rut::{execute_check_digit, execute_clean, execute_format, execute_validate};
