//! Publish dates as written in the feed.
//!
//! feed-rs converts every timestamp to UTC, which moves items published
//! shortly after midnight in a positive offset onto the previous day. The
//! stored date must be the calendar day the feed itself states, so the raw
//! date text of each item is read separately and parsed without any zone
//! conversion.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use quick_xml::events::Event;
use quick_xml::Reader;

/// Raw date text found directly under one `<item>` or `<entry>`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawDates {
    pub published: Option<String>,
    pub updated: Option<String>,
}

const DATETIME_FORMATS: &[&str] = &[
    "%d %b %Y %H:%M:%S",
    "%d %b %Y %H:%M",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%B %d, %Y %H:%M:%S",
    "%B %d, %Y %H:%M",
    "%d.%m.%Y %H:%M:%S",
    "%d.%m.%Y %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%Y/%m/%d %H:%M:%S",
];

const DATE_FORMATS: &[&str] = &[
    "%Y-%m-%d",
    "%d %b %Y",
    "%B %d, %Y",
    "%B %d %Y",
    "%d.%m.%Y",
    "%Y/%m/%d",
    "%m/%d/%Y",
    "%Y%m%d",
];

/// Collect the raw date text of every item in document order.
///
/// Returns `None` when the body is not well-formed XML, in which case the
/// caller keeps the dates feed-rs produced.
pub fn scan_item_dates(body: &[u8]) -> Option<Vec<RawDates>> {
    let mut reader = Reader::from_reader(body);
    reader.config_mut().trim_text(true);

    let mut items = Vec::new();
    let mut depth = 0usize;
    // depth of the open <item>/<entry>, if any
    let mut item_depth: Option<usize> = None;
    // date element being read and its text so far
    let mut capture: Option<(Vec<u8>, String)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) => {
                depth += 1;
                let name = e.local_name().as_ref().to_vec();
                match item_depth {
                    None if is_item(&name) => {
                        item_depth = Some(depth);
                        items.push(RawDates::default());
                    }
                    Some(open) if depth == open + 1 && is_date(&name) => {
                        capture = Some((name, String::new()));
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(t)) => {
                if let Some((_, text)) = capture.as_mut() {
                    text.push_str(&t.decode().ok()?);
                }
            }
            Ok(Event::CData(t)) => {
                if let Some((_, text)) = capture.as_mut() {
                    text.push_str(&t.decode().ok()?);
                }
            }
            Ok(Event::End(_)) => {
                if item_depth.is_some_and(|open| depth == open + 1) {
                    if let (Some((name, text)), Some(item)) = (capture.take(), items.last_mut()) {
                        record(item, &name, text);
                    }
                }
                if item_depth == Some(depth) {
                    item_depth = None;
                }
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!("Raw date scan stopped: {}", e);
                return None;
            }
            _ => {}
        }
    }

    Some(items)
}

fn is_item(name: &[u8]) -> bool {
    matches!(name, b"item" | b"entry")
}

fn is_date(name: &[u8]) -> bool {
    matches!(name, b"pubDate" | b"published" | b"issued" | b"date" | b"updated" | b"modified")
}

fn record(item: &mut RawDates, name: &[u8], text: String) {
    let text = text.trim().to_string();
    if text.is_empty() {
        return;
    }
    let slot = match name {
        b"updated" | b"modified" => &mut item.updated,
        _ => &mut item.published,
    };
    if slot.is_none() {
        *slot = Some(text);
    }
}

/// Calendar day of a date string, in the offset it was written in.
///
/// RFC 2822 and RFC 3339 are tried first. Anything else has its weekday
/// prefix and trailing zone (numeric or named) removed and is matched
/// against common date and date-time layouts. The zone never shifts the day.
pub fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }

    let bare = strip_zone(strip_weekday(raw));
    DATETIME_FORMATS
        .iter()
        .find_map(|f| NaiveDateTime::parse_from_str(bare, f).ok().map(|dt| dt.date()))
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|f| NaiveDate::parse_from_str(bare, f).ok())
        })
}

/// `"Mon, 1 Jan 2024"` -> `"1 Jan 2024"`
fn strip_weekday(s: &str) -> &str {
    match s.split_once(',') {
        Some((head, rest)) if !head.is_empty() && head.chars().all(char::is_alphabetic) => rest.trim_start(),
        _ => s,
    }
}

/// Drop a trailing `GMT`, `MSK`, `Z`, `+0300` or `-05:00` token.
fn strip_zone(s: &str) -> &str {
    let Some((head, last)) = s.rsplit_once(' ') else {
        return s.strip_suffix('Z').unwrap_or(s);
    };
    let named = last.chars().all(|c| c.is_ascii_uppercase());
    let numeric = last.starts_with(['+', '-'])
        && last.len() > 1
        && last[1..].chars().all(|c| c.is_ascii_digit() || c == ':');
    if named || numeric {
        head.trim_end()
    } else {
        s
    }
}
