//! Interactive check-in prompt.
//!
//! Each line is a RUT as typed or scanned. Valid RUTs are checked in once per
//! session; repeats are reported as already present.

use crate::config::Config;
use crate::error::Result;
use crate::output::Formatter;
use asistencia_domain::traits::MemberDirectory;
use asistencia_domain::{InMemoryDirectory, Member};
use asistencia_gatekeeper::{Gatekeeper, RejectionReason};
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::path::PathBuf;
use tracing::info;

/// What a prompt line asked for.
#[derive(Debug, PartialEq)]
enum ReplCommand {
    Exit,
    Help,
    List,
    CheckIn(String),
}

/// Outcome of handling one check-in line.
#[derive(Debug, PartialEq)]
enum CheckInOutcome {
    /// Newly checked in
    Registered(String),
    /// Already checked in this session
    AlreadyPresent(String),
    /// Rejected, with reasons
    Rejected(String, Vec<String>),
}

/// Run the interactive check-in prompt.
pub fn run_checkin(gatekeeper: &Gatekeeper, config: &Config, formatter: &Formatter) -> Result<()> {
    println!("{}", formatter.info("Check-in - enter a RUT per line, 'help' for commands, 'exit' to quit"));
    println!();

    let editor_config = rustyline::Config::builder()
        .max_history_size(config.settings.history_size)?
        .auto_add_history(true)
        .build();
    let mut editor = DefaultEditor::with_config(editor_config)?;

    // Load history
    let history_path = get_history_path()?;
    let _ = editor.load_history(&history_path);

    let mut directory = InMemoryDirectory::new();

    loop {
        match editor.readline("asistencia> ") {
            Ok(line) => {
                let line = line.trim();

                if line.is_empty() {
                    continue;
                }

                match parse_repl_command(line) {
                    ReplCommand::Exit => {
                        break;
                    }
                    ReplCommand::Help => print_help(formatter),
                    ReplCommand::List => print_members(&directory, formatter),
                    ReplCommand::CheckIn(input) => {
                        let outcome = check_in(&input, gatekeeper, &mut directory)?;
                        print_outcome(&outcome, formatter);
                    }
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", formatter.info("Use 'exit' to quit"));
            }
            Err(ReadlineError::Eof) => {
                break;
            }
            Err(err) => {
                eprintln!("{}", formatter.error(&format!("Error: {}", err)));
                break;
            }
        }
    }

    let total = directory.len().unwrap_or_default();
    info!(checked_in = total, "Check-in session closed");
    println!("{}", formatter.info(&format!("{} check-in(s) this session", total)));

    // Save history
    editor.save_history(&history_path).ok();

    Ok(())
}

/// Parse a prompt line.
fn parse_repl_command(line: &str) -> ReplCommand {
    match line.to_lowercase().as_str() {
        "exit" | "quit" | "q" => ReplCommand::Exit,
        "help" | "?" => ReplCommand::Help,
        "list" | "ls" => ReplCommand::List,
        _ => ReplCommand::CheckIn(line.to_string()),
    }
}

/// Run one RUT through the gatekeeper and record it when accepted.
fn check_in(
    input: &str,
    gatekeeper: &Gatekeeper,
    directory: &mut InMemoryDirectory,
) -> Result<CheckInOutcome> {
    let result = gatekeeper.check(input, Some(&*directory))?;

    if let Some(rut) = result.rut.as_ref().filter(|_| result.is_accepted()) {
        directory
            .insert(Member::new(rut))
            .unwrap_or_else(|never| match never {});
        info!(rut = %rut, "Checked in");
        return Ok(CheckInOutcome::Registered(result.formatted));
    }

    // A repeat with nothing else wrong is not an error at the door
    if let [RejectionReason::Duplicate { formatted, .. }] = result.reasons.as_slice() {
        return Ok(CheckInOutcome::AlreadyPresent(formatted.clone()));
    }

    let reasons = result.reasons.iter().map(|r| r.to_string()).collect();
    Ok(CheckInOutcome::Rejected(result.formatted, reasons))
}

fn print_outcome(outcome: &CheckInOutcome, formatter: &Formatter) {
    match outcome {
        CheckInOutcome::Registered(rut) => {
            println!("{}", formatter.success(&format!("{} checked in", rut)));
        }
        CheckInOutcome::AlreadyPresent(rut) => {
            println!("{}", formatter.warning(&format!("{} already checked in", rut)));
        }
        CheckInOutcome::Rejected(rut, reasons) => {
            let shown = if rut.is_empty() { "input" } else { rut.as_str() };
            eprintln!("{}", formatter.error(&format!("{} rejected: {}", shown, reasons.join("; "))));
        }
    }
}

fn print_members(directory: &InMemoryDirectory, formatter: &Formatter) {
    let mut ruts: Vec<&str> = directory.members().map(|m| m.rut.as_str()).collect();
    if ruts.is_empty() {
        println!("{}", formatter.info("No check-ins yet"));
        return;
    }
    ruts.sort_unstable();
    for rut in ruts {
        println!("  {}", rut);
    }
}

fn get_history_path() -> Result<PathBuf> {
    let dir = Config::dir()?;
    std::fs::create_dir_all(&dir)?;
    Ok(dir.join("history.txt"))
}

fn print_help(formatter: &Formatter) {
    println!("{}", formatter.info("Available commands:"));
    println!();
    println!("  <rut>            - Check in (any punctuation, e.g. 12.345.678-5)");
    println!("  list, ls         - Show RUTs checked in this session");
    println!("  help, ?          - Show this help");
    println!("  exit, quit, q    - Exit");
    println!();
}
