//! Candidate extraction from scanned and dictated input
//!
//! Neither function validates; they only pull out the text most likely to be
//! a RUT and hand back its formatted form for the caller to check.

use crate::{clean, format};

/// Query parameters that carry the identifier in ID-card QR codes, checked in order
const QR_RUT_PARAMS: &[&str] = &["run", "rut"];

/// Minimum significant characters a transcript must yield
///
/// Shorter runs are almost always a stray number ("mesa 3") rather than an
/// identifier.
pub const MIN_TRANSCRIPT_CHARS: usize = 8;

/// Pull a RUT candidate out of a QR or barcode payload
///
/// Chilean ID cards encode a URL such as
/// `https://portal.sidiv.registrocivil.cl/docstatus?RUN=12345678-5&type=CEDULA`;
/// other badges carry the bare identifier. A `RUN` or `rut` query parameter
/// wins when present, otherwise the whole payload is used.
///
/// # Examples
///
/// ```
/// use asistencia_domain::extract::from_qr_payload;
///
/// let url = "https://portal.sidiv.registrocivil.cl/docstatus?RUN=12345678-5&type=CEDULA&serial=100200300";
/// assert_eq!(from_qr_payload(url).as_deref(), Some("12.345.678-5"));
/// assert_eq!(from_qr_payload("12345678-5").as_deref(), Some("12.345.678-5"));
/// ```
pub fn from_qr_payload(payload: &str) -> Option<String> {
    let payload = payload.trim_matches(|c: char| c.is_whitespace() || c == '\u{FEFF}');

    let candidate = match query_string(payload) {
        Some(query) => match find_param(query, QR_RUT_PARAMS) {
            Some(value) => value,
            // A URL without a RUT parameter: the digits in it are a host,
            // a serial number or a port, never an identifier.
            None => return None,
        },
        None => payload,
    };

    let cleaned = clean(candidate);
    if cleaned.len() < 2 {
        return None;
    }
    Some(format(&cleaned))
}

/// Pull a RUT candidate out of a voice transcript
///
/// Every digit and `k` in the transcript is collected in order; fewer than
/// [`MIN_TRANSCRIPT_CHARS`] of them yields `None`.
///
/// # Examples
///
/// ```
/// use asistencia_domain::extract::from_transcript;
///
/// assert_eq!(
///     from_transcript("mi rut es 12 345 678 guion 5").as_deref(),
///     Some("12.345.678-5"),
/// );
/// assert_eq!(from_transcript("mesa 3"), None);
/// ```
pub fn from_transcript(text: &str) -> Option<String> {
    let cleaned = clean(text);
    if cleaned.len() < MIN_TRANSCRIPT_CHARS {
        return None;
    }
    Some(format(&cleaned))
}

fn query_string(payload: &str) -> Option<&str> {
    let (_, rest) = payload.split_once('?')?;
    // Drop any fragment
    Some(rest.split('#').next().unwrap_or(rest))
}

fn find_param<'a>(query: &'a str, names: &[&str]) -> Option<&'a str> {
    let pairs: Vec<(&str, &str)> = query
        .split('&')
        .filter_map(|pair| pair.split_once('='))
        .collect();

    names.iter().find_map(|name| {
        pairs
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| *value)
    })
}
