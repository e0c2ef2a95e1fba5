//! Line-oriented feed parsing.
//!
//! The parser is a fold over physical lines. Each step takes the current
//! [`ParseState`] and one line and returns the next state plus, at most, one
//! finished event. Invalid or unterminated blocks simply never produce one.

use crate::event::{CalendarEvent, EventTime};
use crate::ics::unescape_text;

const BEGIN_EVENT: &str = "BEGIN:VEVENT";
const END_EVENT: &str = "END:VEVENT";

/// Event properties this parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKey {
    Uid,
    Summary,
    Description,
    Location,
    DtStart,
    DtEnd,
    Unknown,
}

impl PropertyKey {
    /// Classify a raw key such as `DTSTART;TZID=Europe/Paris`. Parameters are ignored.
    pub fn from_raw(raw_key: &str) -> PropertyKey {
        let name = raw_key
            .split(';')
            .next()
            .unwrap_or_default()
            .trim()
            .to_ascii_uppercase();

        match name.as_str() {
            "UID" => PropertyKey::Uid,
            "SUMMARY" => PropertyKey::Summary,
            "DESCRIPTION" => PropertyKey::Description,
            "LOCATION" => PropertyKey::Location,
            n if n.starts_with("DTSTART") => PropertyKey::DtStart,
            n if n.starts_with("DTEND") => PropertyKey::DtEnd,
            _ => PropertyKey::Unknown,
        }
    }
}

/// Properties gathered so far for the event being read.
#[derive(Debug, Default, Clone, PartialEq)]
struct EventDraft {
    uid: Option<String>,
    summary: Option<String>,
    description: Option<String>,
    location: Option<String>,
    start: Option<EventTime>,
    end: Option<EventTime>,
    /// Depth inside sub-components such as VALARM, whose properties are skipped.
    nested: usize,
}

impl EventDraft {
    fn read_line(mut self, line: &str) -> Self {
        let upper = line.trim_end().to_ascii_uppercase();
        if upper.starts_with("BEGIN:") {
            self.nested += 1;
            return self;
        }
        if upper.starts_with("END:") {
            self.nested = self.nested.saturating_sub(1);
            return self;
        }
        if self.nested > 0 {
            return self;
        }

        let Some((raw_key, value)) = line.split_once(':') else {
            return self;
        };

        match PropertyKey::from_raw(raw_key) {
            PropertyKey::Uid => self.uid = Some(value.trim().to_string()),
            PropertyKey::Summary => self.summary = Some(unescape_text(value)),
            PropertyKey::Description => self.description = non_empty(unescape_text(value)),
            PropertyKey::Location => self.location = non_empty(unescape_text(value)),
            PropertyKey::DtStart => self.start = EventTime::parse(value),
            PropertyKey::DtEnd => self.end = EventTime::parse(value),
            PropertyKey::Unknown => {}
        }
        self
    }

    /// Events without a UID or a SUMMARY are dropped.
    fn finish(self) -> Option<CalendarEvent> {
        let uid = self.uid.filter(|s| !s.is_empty())?;
        let summary = self.summary.filter(|s| !s.is_empty())?;

        Some(CalendarEvent {
            uid,
            summary,
            description: self.description,
            location: self.location,
            start: self.start,
            end: self.end,
        })
    }
}

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

fn is_marker(line: &str, marker: &str) -> bool {
    line.trim_end().eq_ignore_ascii_case(marker)
}

#[derive(Debug, Clone, PartialEq)]
enum ParseState {
    OutsideEvent,
    InsideEvent(EventDraft),
}

impl ParseState {
    fn step(self, line: &str) -> (ParseState, Option<CalendarEvent>) {
        if is_marker(line, BEGIN_EVENT) {
            return (ParseState::InsideEvent(EventDraft::default()), None);
        }

        match self {
            ParseState::OutsideEvent => (ParseState::OutsideEvent, None),
            ParseState::InsideEvent(draft) if is_marker(line, END_EVENT) => {
                (ParseState::OutsideEvent, draft.finish())
            }
            ParseState::InsideEvent(draft) => (ParseState::InsideEvent(draft.read_line(line)), None),
        }
    }
}

/// Extract every complete, valid event from a feed document. Never fails.
///
/// Accepts LF and CRLF line endings. Calendar-level properties are ignored and
/// folded continuation lines are not joined.
pub fn parse(document: &str) -> Vec<CalendarEvent> {
    let (_, events) = document
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .fold(
            (ParseState::OutsideEvent, Vec::new()),
            |(state, mut events), line| {
                let (next, finished) = state.step(line);
                events.extend(finished);
                (next, events)
            },
        );

    events
}
