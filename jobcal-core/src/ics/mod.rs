//! Feed document parsing and generation.
//!
//! Only the subset of RFC 5545 exchanged with third-party calendars is handled:
//! VEVENT blocks with UID, SUMMARY, DESCRIPTION, LOCATION, DTSTART and DTEND.

mod generate;
mod parse;

pub use generate::{GenerateOptions, event_uid, generate, local_timezone, scheduled_events};
pub use parse::{PropertyKey, parse};

/// Escape a TEXT value (RFC 5545 §3.3.11).
pub(crate) fn escape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            ';' => out.push_str("\\;"),
            ',' => out.push_str("\\,"),
            '\n' => out.push_str("\\n"),
            '\r' => {}
            _ => out.push(c),
        }
    }
    out
}

/// Reverse of [`escape_text`]. Unknown escapes are kept verbatim.
pub(crate) fn unescape_text(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') | Some('N') => out.push('\n'),
            Some(',') => out.push(','),
            Some(';') => out.push(';'),
            Some('\\') => out.push('\\'),
            Some(other) => {
                out.push('\\');
                out.push(other);
            }
            None => out.push('\\'),
        }
    }
    out
}
