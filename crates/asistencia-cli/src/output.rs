//! Output formatting for the CLI.

use crate::commands::inspect::RutReport;
use crate::config::OutputFormat;
use crate::error::Result;
use asistencia_gatekeeper::ImportReport;
use colored::*;
use tabled::{
    builder::Builder,
    settings::{object::Rows, Alignment, Modify, Style},
};

/// Output formatter.
pub struct Formatter {
    format: OutputFormat,
    color_enabled: bool,
}

impl Formatter {
    /// Create a new formatter.
    pub fn new(format: OutputFormat, color_enabled: bool) -> Self {
        Self {
            format,
            color_enabled,
        }
    }

    /// Format inspection reports.
    pub fn format_reports(&self, reports: &[RutReport]) -> Result<String> {
        match self.format {
            OutputFormat::Json => Ok(serde_json::to_string_pretty(reports)?),
            OutputFormat::Table => Ok(self.format_reports_table(reports)),
            OutputFormat::Quiet => Ok(reports
                .iter()
                .map(|r| r.formatted.as_str())
                .collect::<Vec<_>>()
                .join("\n")),
        }
    }

    /// Format reports as a table.
    fn format_reports_table(&self, reports: &[RutReport]) -> String {
        if reports.is_empty() {
            return self.colorize("Nothing to inspect.", "yellow");
        }

        let mut builder = Builder::default();
        builder.push_record(["Input", "Cleaned", "Formatted", "Expected", "Valid"]);

        for report in reports {
            let expected = report
                .expected_check
                .map(|c| c.to_string())
                .unwrap_or_else(|| "-".to_string());
            let valid = if report.valid {
                self.colorize("yes", "green")
            } else {
                self.colorize("no", "red")
            };
            builder.push_record([
                report.input.as_str(),
                &report.cleaned,
                &report.formatted,
                &expected,
                &valid,
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        table.to_string()
    }

    /// Format an import report.
    pub fn format_import(&self, report: &ImportReport) -> Result<String> {
        match self.format {
            OutputFormat::Json => {
                let rejected: Vec<serde_json::Value> = report
                    .rejected
                    .iter()
                    .map(|r| {
                        serde_json::json!({
                            "row": r.row,
                            "cell": r.cell,
                            "reasons": r.reasons.iter().map(|x| x.to_string()).collect::<Vec<_>>(),
                        })
                    })
                    .collect();
                let value = serde_json::json!({
                    "total": report.total,
                    "admitted": report.admitted,
                    "existing": report.existing,
                    "rejected": rejected,
                });
                Ok(serde_json::to_string_pretty(&value)?)
            }
            OutputFormat::Table => Ok(self.format_import_table(report)),
            OutputFormat::Quiet => Ok(report.admitted.join("\n")),
        }
    }

    fn format_import_table(&self, report: &ImportReport) -> String {
        let summary = if report.rejected.is_empty() {
            self.success(&report.summary())
        } else {
            self.warning(&report.summary())
        };

        if report.rejected.is_empty() {
            return summary;
        }

        let mut builder = Builder::default();
        builder.push_record(["Row", "Cell", "Reason"]);
        for rejection in &report.rejected {
            let reasons: Vec<String> = rejection.reasons.iter().map(|r| r.to_string()).collect();
            builder.push_record([
                rejection.row.to_string(),
                rejection.cell.clone(),
                reasons.join("; "),
            ]);
        }

        let mut table = builder.build();
        table
            .with(Style::rounded())
            .with(Modify::new(Rows::first()).with(Alignment::center()));

        format!("{}\n{}", summary, table)
    }

    /// Format a success message.
    pub fn success(&self, message: &str) -> String {
        self.colorize(&format!("✓ {}", message), "green")
    }

    /// Format an error message.
    pub fn error(&self, message: &str) -> String {
        self.colorize(&format!("✗ {}", message), "red")
    }

    /// Format an info message.
    pub fn info(&self, message: &str) -> String {
        self.colorize(&format!("ℹ {}", message), "blue")
    }

    /// Format a warning message.
    pub fn warning(&self, message: &str) -> String {
        self.colorize(&format!("⚠ {}", message), "yellow")
    }

    /// Colorize text if color is enabled.
    fn colorize(&self, text: &str, color: &str) -> String {
        if !self.color_enabled {
            return text.to_string();
        }

        match color {
            "red" => text.red().to_string(),
            "green" => text.green().to_string(),
            "blue" => text.blue().to_string(),
            "yellow" => text.yellow().to_string(),
            _ => text.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use asistencia_gatekeeper::{RejectionReason, RowRejection};

    fn reports() -> Vec<RutReport> {
        vec![
            RutReport::from_input("12.345.678-5"),
            RutReport::from_input("12345678-4"),
        ]
    }

    fn import_report() -> ImportReport {
        ImportReport {
            admitted: vec!["12.345.678-5".to_string()],
            existing: vec!["11.111.111-1".to_string()],
            rejected: vec![RowRejection {
                row: 3,
                cell: String::new(),
                reasons: vec![RejectionReason::Missing],
            }],
            total: 3,
        }
    }

    #[test]
    fn test_json_format() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_reports(&reports()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value[0]["formatted"], "12.345.678-5");
        assert_eq!(value[0]["valid"], true);
        assert_eq!(value[1]["expected_check"], "5");
        assert_eq!(value[1]["valid"], false);
    }

    #[test]
    fn test_quiet_format() {
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let output = formatter.format_reports(&reports()).unwrap();
        assert_eq!(output, "12.345.678-5\n12.345.678-4");
    }

    #[test]
    fn test_table_format() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_reports(&reports()).unwrap();
        assert!(output.contains("Formatted"));
        assert!(output.contains("12.345.678-5"));
        assert!(output.contains("no"));
    }

    #[test]
    fn test_empty_reports() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_reports(&[]).unwrap();
        assert!(output.contains("Nothing to inspect"));
    }

    #[test]
    fn test_import_json() {
        let formatter = Formatter::new(OutputFormat::Json, false);
        let output = formatter.format_import(&import_report()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(value["total"], 3);
        assert_eq!(value["existing"][0], "11.111.111-1");
        assert_eq!(value["rejected"][0]["row"], 3);
        assert_eq!(value["rejected"][0]["reasons"][0], "no RUT supplied");
    }

    #[test]
    fn test_import_table() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        let output = formatter.format_import(&import_report()).unwrap();
        assert!(output.starts_with("⚠ 3 row(s): 1 admitted, 1 already registered, 1 rejected"));
        assert!(output.contains("no RUT supplied"));
    }

    #[test]
    fn test_colorize_disabled() {
        let formatter = Formatter::new(OutputFormat::Table, false);
        assert_eq!(formatter.success("test"), "✓ test");
        assert_eq!(formatter.error("test"), "✗ test");
    }
}
