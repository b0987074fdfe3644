//! Inspect command implementation.

use crate::cli::InspectArgs;
use crate::error::Result;
use crate::output::Formatter;
use asistencia_domain::{clean, format, validate, Rut};
use serde::Serialize;

/// Everything the toolkit can say about one input.
#[derive(Debug, Clone, Serialize)]
pub struct RutReport {
    /// Input as given
    pub input: String,
    /// Clean form
    pub cleaned: String,
    /// Formatted form
    pub formatted: String,
    /// Check digit computed from the body, when the body is numeric
    pub expected_check: Option<char>,
    /// Whether the supplied check digit matches
    pub valid: bool,
}

impl RutReport {
    /// Build a report for free-form input.
    pub fn from_input(input: &str) -> Self {
        Self {
            input: input.to_string(),
            cleaned: clean(input),
            formatted: format(input),
            expected_check: Rut::parse(input).ok().map(|r| r.expected_check().as_char()),
            valid: validate(input),
        }
    }
}

/// Execute the inspect command.
pub fn execute_inspect(args: InspectArgs, formatter: &Formatter) -> Result<()> {
    let reports: Vec<RutReport> = args.inputs.iter().map(|i| RutReport::from_input(i)).collect();
    println!("{}", formatter.format_reports(&reports)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_for_valid_input() {
        let report = RutReport::from_input("10.000.013-k");
        assert_eq!(report.cleaned, "10000013K");
        assert_eq!(report.formatted, "10.000.013-K");
        assert_eq!(report.expected_check, Some('K'));
        assert!(report.valid);
    }

    #[test]
    fn test_report_for_short_input() {
        let report = RutReport::from_input("k");
        assert_eq!(report.cleaned, "K");
        assert_eq!(report.formatted, "K");
        assert_eq!(report.expected_check, None);
        assert!(!report.valid);
    }
}
