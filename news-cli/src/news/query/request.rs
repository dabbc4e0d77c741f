//! Typed `fn_insert_news` request built from a record

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, TimeZone, Utc};

use crate::news::record::Record;

/// Region every news item is published under
pub const DEFAULT_REGION: &str = "Indonesia";

/// Publication status given to newly inserted news
pub const DRAFT_STATUS: &str = "Draft";

/// Why a record could not be turned into an insert call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderError {
    /// A required column is absent, or the date cell is blank
    MissingField { row: String, field: &'static str },
    /// The date cell is not in any accepted format
    InvalidDate { row: String, value: String },
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::MissingField { row, field } => {
                write!(f, "row no-{} is missing required field '{}'", row, field)
            }
            RenderError::InvalidDate { row, value } => {
                write!(f, "row no-{} has an unparseable date '{}'", row, value)
            }
        }
    }
}

impl std::error::Error for RenderError {}

/// One news insertion, with the procedure's arguments as named fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InsertNewsCall {
    pub title: String,
    pub region: Vec<String>,
    pub key_points: String,
    pub tags: Vec<String>,
    pub links: String,
    pub status: String,
    pub published_at: DateTime<Utc>,
}

impl InsertNewsCall {
    /// Validate a record and build its call
    pub fn from_record(record: &Record) -> Result<Self, RenderError> {
        let row = record.no().unwrap_or("?").to_string();

        let title = required(record, &row, "title")?;
        let date = required(record, &row, "date")?;
        if date.trim().is_empty() {
            return Err(RenderError::MissingField { row, field: "date" });
        }
        let tags = required(record, &row, "tags")?;
        let key_points = required(record, &row, "key_points")?;
        let links = required(record, &row, "links")?;

        let published_at = parse_date(date).ok_or_else(|| RenderError::InvalidDate {
            row,
            value: date.to_string(),
        })?;

        Ok(Self {
            title: title.to_string(),
            region: vec![DEFAULT_REGION.to_string()],
            key_points: key_points.to_string(),
            tags: split_tags(tags),
            links: links.to_string(),
            status: DRAFT_STATUS.to_string(),
            published_at,
        })
    }

    /// Timestamp as `YYYY-MM-DDTHH:MM:SS.sssZ`
    pub fn published_at_iso(&self) -> String {
        self.published_at
            .format("%Y-%m-%dT%H:%M:%S%.3fZ")
            .to_string()
    }
}

/// The column must exist; a blank cell is a valid empty value
fn required<'a>(record: &'a Record, row: &str, field: &'static str) -> Result<&'a str, RenderError> {
    record.get(field).ok_or_else(|| RenderError::MissingField {
        row: row.to_string(),
        field,
    })
}

/// Split a comma-separated tag cell into trimmed tags
///
/// Empty segments are kept so `"a,,b"` still yields three entries.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(|t| t.trim().to_string())
        .collect()
}

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    "%m/%d/%Y %H:%M:%S",
    "%m/%d/%Y %H:%M",
];

const DATE_FORMATS: &[&str] = &[
    "%m/%d/%Y",
    "%d %B %Y",
    "%d %b %Y",
    "%B %d, %Y",
    "%b %d, %Y",
];

/// Parse a date cell into a UTC timestamp, reading wall-clock values as local time
pub fn parse_date(value: &str) -> Option<DateTime<Utc>> {
    parse_date_in(value, &Local)
}

/// Parse a date cell, reading values without an offset in `tz`
///
/// RFC 3339 values keep their own offset and a bare `YYYY-MM-DD` is midnight
/// UTC. Every other accepted format is a wall-clock time in `tz`; date-only
/// values are midnight there.
pub fn parse_date_in<Tz: TimeZone>(value: &str, tz: &Tz) -> Option<DateTime<Utc>> {
    let value = value.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Some(dt.with_timezone(&Utc));
    }

    if let Ok(d) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    let naive = DATETIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(value, format).ok())
        .or_else(|| {
            DATE_FORMATS.iter().find_map(|format| {
                NaiveDate::parse_from_str(value, format)
                    .ok()
                    .and_then(|d| d.and_hms_opt(0, 0, 0))
            })
        })?;

    // A repeated wall-clock time takes its earlier instant
    tz.from_local_datetime(&naive)
        .earliest()
        .map(|dt| dt.with_timezone(&Utc))
}
