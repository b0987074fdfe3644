//! Extract command implementation.

use crate::cli::ExtractArgs;
use crate::error::Result;
use crate::output::Formatter;
use asistencia_domain::extract::{from_qr_payload, from_transcript};
use asistencia_domain::validate;
use tracing::debug;

/// Execute the extract command.
///
/// Returns whether a valid RUT was found.
pub fn execute_extract(args: ExtractArgs, formatter: &Formatter) -> Result<bool> {
    let candidate = match (&args.qr, &args.transcript) {
        (Some(payload), _) => from_qr_payload(payload),
        (None, Some(text)) => from_transcript(text),
        (None, None) => None,
    };
    debug!(?candidate, "Extracted candidate");

    match candidate {
        Some(rut) if validate(&rut) => {
            println!("{}", rut);
            Ok(true)
        }
        Some(rut) => {
            eprintln!("{}", formatter.warning(&format!("{} found but its check digit is wrong", rut)));
            Ok(false)
        }
        None => {
            eprintln!("{}", formatter.error("No RUT found"));
            Ok(false)
        }
    }
}
