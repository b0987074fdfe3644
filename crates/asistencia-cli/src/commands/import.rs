//! Import command implementation.

use crate::cli::ImportArgs;
use crate::config::Config;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use asistencia_domain::{InMemoryDirectory, Member};
use asistencia_gatekeeper::{Gatekeeper, ImportReport, IntakeConfig};
use std::fs;
use tracing::{debug, info};

/// Where each member field sits in a row (0-based).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnLayout {
    /// RUT column
    pub rut: usize,
    /// Given names
    pub nombres: Option<usize>,
    /// Paternal surname
    pub apellido_paterno: Option<usize>,
    /// Maternal surname
    pub apellido_materno: Option<usize>,
    /// Contact email
    pub email: Option<usize>,
    /// Membership status
    pub estado: Option<usize>,
}

impl ColumnLayout {
    /// Column order of the member sheet export:
    /// rut, nombres, apellido paterno, apellido materno, email, estado.
    pub fn sheet_order() -> Self {
        Self {
            rut: 0,
            nombres: Some(1),
            apellido_paterno: Some(2),
            apellido_materno: Some(3),
            email: Some(4),
            estado: Some(5),
        }
    }

    /// Only a RUT column.
    pub fn rut_only(rut: usize) -> Self {
        Self {
            rut,
            nombres: None,
            apellido_paterno: None,
            apellido_materno: None,
            email: None,
            estado: None,
        }
    }

    /// Locate columns by header name, ignoring case, spaces and underscores.
    ///
    /// Returns `None` when no header names the RUT.
    pub fn from_header(header: &[String]) -> Option<Self> {
        let keys: Vec<String> = header.iter().map(|h| header_key(h)).collect();
        let find = |names: &[&str]| keys.iter().position(|k| names.contains(&k.as_str()));

        Some(Self {
            rut: find(&["rut", "run"])?,
            nombres: find(&["nombres", "nombre"]),
            apellido_paterno: find(&["apellidopaterno"]),
            apellido_materno: find(&["apellidomaterno"]),
            email: find(&["email", "correo"]),
            estado: find(&["estado"]),
        })
    }

    /// Build a member row from a record. Missing cells are blank.
    pub fn member(&self, record: &[String]) -> Member {
        let cell = |index: Option<usize>| {
            index
                .and_then(|i| record.get(i))
                .cloned()
                .unwrap_or_default()
        };

        Member {
            rut: cell(Some(self.rut)),
            nombres: cell(self.nombres),
            apellido_paterno: cell(self.apellido_paterno),
            apellido_materno: cell(self.apellido_materno),
            email: cell(self.email),
            estado: cell(self.estado),
        }
    }
}

fn header_key(name: &str) -> String {
    name.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Execute the import command.
pub fn execute_import(args: ImportArgs, config: &Config, formatter: &Formatter) -> Result<ImportReport> {
    let intake: IntakeConfig = args.rules.map(Into::into).unwrap_or_else(|| config.intake.clone());
    let gatekeeper = Gatekeeper::new(intake)?;

    let content = fs::read_to_string(&args.file)?;
    let mut records = read_records(&content, args.delimiter);

    let header = if args.no_header || records.is_empty() {
        None
    } else {
        Some(records.remove(0))
    };
    let layout = resolve_layout(args.column, header.as_deref())?;
    debug!(?layout, "Column layout");
    info!(file = %args.file.display(), rows = records.len(), "Importing member sheet");

    let rows: Vec<Member> = records.iter().map(|record| layout.member(record)).collect();
    let first_row = if args.no_header { 1 } else { 2 };
    let mut directory = InMemoryDirectory::new();
    let report = gatekeeper.import_rows(rows, first_row, &mut directory)?;

    println!("{}", formatter.format_import(&report)?);
    Ok(report)
}

/// Pick the column layout from `--column` and the header row.
///
/// A recognised header places every member field; `--column` then only moves
/// the RUT. Without a recognised header, `--column` means a RUT-only sheet and
/// its absence means the member sheet's own column order.
pub fn resolve_layout(column: Option<usize>, header: Option<&[String]>) -> Result<ColumnLayout> {
    let detected = header.and_then(ColumnLayout::from_header);

    match (column, detected) {
        (Some(0), _) => Err(CliError::InvalidInput("Columns are numbered from 1".to_string())),
        (Some(column), Some(layout)) => Ok(ColumnLayout {
            rut: column - 1,
            ..layout
        }),
        (Some(column), None) => Ok(ColumnLayout::rut_only(column - 1)),
        (None, Some(layout)) => Ok(layout),
        (None, None) => Ok(ColumnLayout::sheet_order()),
    }
}

/// Split delimited text into trimmed records, one per line.
///
/// Fields may be wrapped in double quotes, in which case the delimiter is
/// literal inside them and `""` stands for one quote. Quoted fields cannot
/// span lines.
pub fn read_records(content: &str, delimiter: char) -> Vec<Vec<String>> {
    content
        .lines()
        .map(|line| split_record(line, delimiter))
        .collect()
}

fn split_record(line: &str, delimiter: char) -> Vec<String> {
    let mut fields = Vec::new();
    let mut field = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '"' if in_quotes && chars.peek() == Some(&'"') => {
                field.push('"');
                chars.next();
            }
            '"' => in_quotes = !in_quotes,
            c if c == delimiter && !in_quotes => {
                fields.push(field.trim().to_string());
                field.clear();
            }
            c => field.push(c),
        }
    }
    fields.push(field.trim().to_string());

    fields
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::RulesArg;
    use crate::config::OutputFormat;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn strings(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_read_records_strips_quotes() {
        let content = "Nombres,RUT\nAna,12.345.678-5\nBea,\"11.111.111-1\"\nCata\n";
        let records = read_records(content, ',');
        assert_eq!(records.len(), 4);
        assert_eq!(records[2], strings(&["Bea", "11.111.111-1"]));
        assert_eq!(records[3], strings(&["Cata"]));
    }

    #[test]
    fn test_quoted_delimiter_stays_in_field() {
        let records = read_records("Nombre,RUT\n\"Pérez, Ana\",12.345.678-5\n", ',');
        assert_eq!(records[1], strings(&["Pérez, Ana", "12.345.678-5"]));

        let layout = resolve_layout(Some(2), Some(records[0].as_slice())).unwrap();
        assert_eq!(layout.member(&records[1]).rut, "12.345.678-5");
    }

    #[test]
    fn test_escaped_quote() {
        let records = read_records(r#"12345678-5;"Ana ""Anita"" Pérez";x"#, ';');
        assert_eq!(records[0], strings(&["12345678-5", "Ana \"Anita\" Pérez", "x"]));
    }

    #[test]
    fn test_semicolon_no_header() {
        let records = read_records("12345678-5;Ana\n 10000013-K ;Bea", ';');
        let layout = resolve_layout(Some(1), None).unwrap();
        let ruts: Vec<String> = records.iter().map(|r| layout.member(r).rut).collect();
        assert_eq!(ruts, vec!["12345678-5", "10000013-K"]);
        assert_eq!(layout.member(&records[0]).nombres, "");
    }

    #[test]
    fn test_layout_from_header() {
        let header = strings(&["Email", "RUT", "Apellido Paterno", "apellido_materno", "Nombres", "ESTADO"]);
        let layout = ColumnLayout::from_header(&header).unwrap();
        assert_eq!(
            layout,
            ColumnLayout {
                rut: 1,
                nombres: Some(4),
                apellido_paterno: Some(2),
                apellido_materno: Some(3),
                email: Some(0),
                estado: Some(5),
            }
        );
        assert!(ColumnLayout::from_header(&strings(&["Nombre", "Correo"])).is_none());
    }

    #[test]
    fn test_resolve_layout() {
        assert_eq!(resolve_layout(None, None).unwrap(), ColumnLayout::sheet_order());
        assert_eq!(resolve_layout(Some(3), None).unwrap(), ColumnLayout::rut_only(2));

        let unknown = strings(&["a", "b"]);
        assert_eq!(
            resolve_layout(None, Some(unknown.as_slice())).unwrap(),
            ColumnLayout::sheet_order()
        );
        assert!(matches!(
            resolve_layout(Some(0), None),
            Err(CliError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_short_record_yields_blank_cells() {
        let layout = ColumnLayout::sheet_order();
        let member = layout.member(&strings(&["12.345.678-5", "Ana"]));
        assert_eq!(member.nombres, "Ana");
        assert_eq!(member.email, "");
        assert_eq!(member.estado, "");

        let empty = ColumnLayout::rut_only(3).member(&strings(&["x"]));
        assert_eq!(empty.rut, "");
    }

    #[test]
    fn test_execute_import() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "RUT,Nombres").unwrap();
        writeln!(file, "12.345.678-5,Ana").unwrap();
        writeln!(file, "12.345.678-4,Bea").unwrap();
        writeln!(file, "123456785,Ana otra vez").unwrap();
        writeln!(file, "1234567-4,Dora").unwrap();

        let args = ImportArgs {
            file: file.path().to_path_buf(),
            column: None,
            delimiter: ',',
            no_header: false,
            rules: Some(RulesArg::Strict),
        };
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let report = execute_import(args, &Config::default(), &formatter).unwrap();

        assert_eq!(report.total, 4);
        assert_eq!(report.admitted, vec!["12.345.678-5", "1.234.567-4"]);
        let rows: Vec<usize> = report.rejected.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![3, 4]);
    }

    #[test]
    fn test_execute_import_headerless_sheet_order() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "12.345.678-5,Ana,\"Pérez, de la\",Soto,ana@example.cl,").unwrap();
        writeln!(file, "11111111-1,Bea,Rojas,,,Inactivo").unwrap();

        let args = ImportArgs {
            file: file.path().to_path_buf(),
            column: None,
            delimiter: ',',
            no_header: true,
            rules: None,
        };
        let formatter = Formatter::new(OutputFormat::Quiet, false);
        let report = execute_import(args, &Config::default(), &formatter).unwrap();

        assert_eq!(report.admitted, vec!["12.345.678-5", "11.111.111-1"]);
        assert!(report.rejected.is_empty());
    }
}
