//! Single-RUT commands: clean, format, validate, check-digit.

use crate::cli::{BodyArg, RutArg};
use crate::error::Result;
use crate::output::Formatter;
use asistencia_domain::{clean, format, validate, Rut};

/// Execute the clean command.
pub fn execute_clean(args: RutArg) -> Result<()> {
    println!("{}", clean(&args.input));
    Ok(())
}

/// Execute the format command.
pub fn execute_format(args: RutArg) -> Result<()> {
    println!("{}", format(&args.input));
    Ok(())
}

/// Execute the validate command.
///
/// Returns whether the RUT is valid so the caller can set the exit code.
pub fn execute_validate(args: RutArg, formatter: &Formatter) -> Result<bool> {
    let (valid, message) = validation_message(&args.input, formatter);
    if valid {
        println!("{}", message);
    } else {
        eprintln!("{}", message);
    }
    Ok(valid)
}

/// Execute the check-digit command.
pub fn execute_check_digit(args: BodyArg) -> Result<()> {
    let rut = Rut::from_body(&args.body)?;
    println!("{}", rut.check());
    Ok(())
}

fn validation_message(input: &str, formatter: &Formatter) -> (bool, String) {
    if validate(input) {
        return (true, formatter.success(&format!("{} is valid", format(input))));
    }

    let detail = match Rut::parse(input) {
        Ok(rut) => format!(
            "{} is invalid: check digit should be {}",
            rut,
            rut.expected_check()
        ),
        Err(e) => format!("'{}' is invalid: {}", input, e),
    };
    (false, formatter.error(&detail))
}
