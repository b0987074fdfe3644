//! Batch intake for spreadsheet imports

use crate::{Gatekeeper, GatekeeperError, RejectionReason};
use asistencia_domain::traits::MemberDirectory;
use asistencia_domain::Member;
use std::fmt;
use tracing::{debug, info};

/// A row that failed intake
#[derive(Debug, Clone, PartialEq)]
pub struct RowRejection {
    /// Spreadsheet row number as a user would see it
    pub row: usize,

    /// RUT cell content as read
    pub cell: String,

    /// Why the row was rejected
    pub reasons: Vec<RejectionReason>,
}

/// Outcome of importing a batch of rows
#[derive(Debug, Clone, Default)]
pub struct ImportReport {
    /// Formatted RUTs that were admitted, in input order
    pub admitted: Vec<String>,

    /// Formatted RUTs that passed intake but were already registered;
    /// the stored record was left untouched
    pub existing: Vec<String>,

    /// Rows that were rejected
    pub rejected: Vec<RowRejection>,

    /// Rows seen
    pub total: usize,
}

impl ImportReport {
    /// One-line summary
    pub fn summary(&self) -> String {
        if self.existing.is_empty() {
            format!(
                "{} row(s): {} admitted, {} rejected",
                self.total,
                self.admitted.len(),
                self.rejected.len()
            )
        } else {
            format!(
                "{} row(s): {} admitted, {} already registered, {} rejected",
                self.total,
                self.admitted.len(),
                self.existing.len(),
                self.rejected.len()
            )
        }
    }
}

impl fmt::Display for ImportReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.summary())?;
        for rejection in &self.rejected {
            let reasons: Vec<String> = rejection.reasons.iter().map(|r| r.to_string()).collect();
            writeln!(f, "  row {}: '{}' - {}", rejection.row, rejection.cell, reasons.join("; "))?;
        }
        Ok(())
    }
}

impl Gatekeeper {
    /// Run every row of a member sheet through intake
    ///
    /// Each row is a [`Member`] whose `rut` field still holds the cell as
    /// read; a bare `&str` is a row with only a RUT. `first_row` is the
    /// number the first row should be reported under; pass 2 when the sheet
    /// has a header row.
    ///
    /// Admitted rows are registered in `directory` as they pass, so a RUT
    /// repeated later in the same batch is rejected as a duplicate. When
    /// duplicates are allowed, a RUT that is already registered keeps its
    /// stored record and is listed under [`ImportReport::existing`].
    pub fn import_rows<D, I, R>(
        &self,
        rows: I,
        first_row: usize,
        directory: &mut D,
    ) -> Result<ImportReport, GatekeeperError>
    where
        D: MemberDirectory,
        D::Error: fmt::Display,
        I: IntoIterator<Item = R>,
        R: Into<Member>,
    {
        let mut report = ImportReport::default();

        for (offset, row_data) in rows.into_iter().enumerate() {
            let member: Member = row_data.into();
            let cell = member.rut.trim().to_string();
            let row = first_row + offset;
            report.total += 1;

            let result = self.check(&cell, Some(&*directory))?;
            let rut = match result.rut {
                Some(rut) if result.reasons.is_empty() => rut,
                _ => {
                    debug!(row, cell = %cell, "Import row rejected");
                    report.rejected.push(RowRejection {
                        row,
                        cell,
                        reasons: result.reasons,
                    });
                    continue;
                }
            };

            // With duplicate rejection on, an accepted RUT is known to be new
            if !self.config().reject_duplicates {
                let existing = directory
                    .find_by_rut(&rut)
                    .map_err(|e| GatekeeperError::Directory(format!("Failed to look up {}: {}", rut, e)))?;
                if existing.is_some() {
                    debug!(row, rut = %rut, "Already registered, keeping stored record");
                    report.existing.push(rut.formatted());
                    continue;
                }
            }

            directory
                .insert(member.registered(&rut))
                .map_err(|e| GatekeeperError::Directory(format!("Failed to register {}: {}", rut, e)))?;
            report.admitted.push(rut.formatted());
        }

        info!(
            total = report.total,
            admitted = report.admitted.len(),
            existing = report.existing.len(),
            rejected = report.rejected.len(),
            "Import finished"
        );

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::IntakeConfig;
    use asistencia_domain::{InMemoryDirectory, Rut};

    fn member_row(rut: &str, nombres: &str, paterno: &str, materno: &str) -> Member {
        Member::from(rut).with_names(nombres, paterno, materno)
    }

    #[test]
    fn test_import_mixed_rows() {
        let gatekeeper = Gatekeeper::default_config();
        let mut directory = InMemoryDirectory::new();
        let rows = vec!["12.345.678-5", "", "12345678-4", "11111111-1"];

        let report = gatekeeper.import_rows(rows, 2, &mut directory).unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.admitted, vec!["12.345.678-5", "11.111.111-1"]);
        assert!(report.existing.is_empty());
        assert_eq!(report.rejected.len(), 2);
        assert_eq!(report.rejected[0].row, 3);
        assert_eq!(report.rejected[0].reasons, vec![RejectionReason::Missing]);
        assert_eq!(report.rejected[1].row, 4);
        assert_eq!(directory.len().unwrap(), 2);
    }

    #[test]
    fn test_import_rejects_repeat_within_batch() {
        let gatekeeper = Gatekeeper::default_config();
        let mut directory = InMemoryDirectory::new();
        let rows = vec!["12.345.678-5", "123456785"];

        let report = gatekeeper.import_rows(rows, 1, &mut directory).unwrap();

        assert_eq!(report.admitted.len(), 1);
        assert_eq!(report.rejected[0].row, 2);
        assert!(matches!(
            report.rejected[0].reasons[0],
            RejectionReason::Duplicate { .. }
        ));
    }

    #[test]
    fn test_import_permissive_admits_bad_check_digit() {
        let gatekeeper = Gatekeeper::new(IntakeConfig::permissive()).unwrap();
        let mut directory = InMemoryDirectory::new();

        let report = gatekeeper
            .import_rows(["12345678-4", "7"], 2, &mut directory)
            .unwrap();

        assert_eq!(report.admitted, vec!["12.345.678-4"]);
        assert_eq!(report.rejected.len(), 1);
    }

    #[test]
    fn test_import_carries_member_fields() {
        let gatekeeper = Gatekeeper::default_config();
        let mut directory = InMemoryDirectory::new();
        let mut row = member_row(" 123456785 ", "Ana", "Pérez", "Soto");
        row.email = "ana@example.cl".to_string();
        let inactive = Member {
            estado: "Inactivo".to_string(),
            ..member_row("11.111.111-1", "Bea", "Rojas", "")
        };

        let report = gatekeeper
            .import_rows(vec![row, inactive], 2, &mut directory)
            .unwrap();
        assert_eq!(report.admitted, vec!["12.345.678-5", "11.111.111-1"]);

        let ana = directory
            .find_by_rut(&Rut::parse("12345678-5").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(ana.rut, "12.345.678-5");
        assert_eq!(ana.full_name(), "Ana Pérez Soto");
        assert_eq!(ana.email, "ana@example.cl");
        assert_eq!(ana.estado, "Activo");

        let bea = directory
            .find_by_rut(&Rut::parse("11111111-1").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(bea.full_name(), "Bea Rojas");
        assert_eq!(bea.estado, "Inactivo");
    }

    #[test]
    fn test_permissive_import_keeps_registered_member() {
        let gatekeeper = Gatekeeper::new(IntakeConfig::permissive()).unwrap();
        let mut directory = InMemoryDirectory::new();
        let rut = Rut::parse("12.345.678-5").unwrap();
        directory
            .insert(Member::new(&rut).with_names("Ana", "Pérez", "Soto"))
            .unwrap();

        let report = gatekeeper
            .import_rows(["123456785"], 2, &mut directory)
            .unwrap();

        assert!(report.admitted.is_empty());
        assert_eq!(report.existing, vec!["12.345.678-5"]);
        assert!(report.rejected.is_empty());
        assert_eq!(report.summary(), "1 row(s): 0 admitted, 1 already registered, 0 rejected");

        let stored = directory.find_by_rut(&rut).unwrap().unwrap();
        assert_eq!(stored.full_name(), "Ana Pérez Soto");
        assert_eq!(directory.len().unwrap(), 1);
    }

    #[test]
    fn test_report_display() {
        let gatekeeper = Gatekeeper::default_config();
        let mut directory = InMemoryDirectory::new();
        let report = gatekeeper
            .import_rows(["12345678-4"], 2, &mut directory)
            .unwrap();

        let text = report.to_string();
        assert!(text.starts_with("1 row(s): 0 admitted, 1 rejected"));
        assert!(text.contains("row 2: '12345678-4'"));
    }
}
