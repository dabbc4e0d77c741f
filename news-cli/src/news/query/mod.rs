//! Rendering of pending news records into a SQL script

pub mod render;
pub mod request;

pub use render::render_script;
pub use request::{InsertNewsCall, RenderError};

use serde::Deserialize;

use crate::news::record::Record;

/// How single quotes inside string values are made safe for SQL
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum QuoteMode {
    /// Remove single quotes (matches scripts produced so far)
    #[default]
    Strip,
    /// Double single quotes, keeping the text intact
    Escape,
}

impl std::str::FromStr for QuoteMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "strip" => Ok(QuoteMode::Strip),
            "escape" => Ok(QuoteMode::Escape),
            other => Err(format!(
                "unknown quote mode '{}', expected 'strip' or 'escape'",
                other
            )),
        }
    }
}

/// Validate every record and render the whole transaction script
///
/// Nothing is rendered if any record fails validation.
pub fn build_script(records: &[Record], mode: QuoteMode) -> Result<String, RenderError> {
    let calls = records
        .iter()
        .map(InsertNewsCall::from_record)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(render_script(&calls, mode))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::record::map_rows;

    fn grid(rows: &[&[&str]]) -> Vec<Vec<String>> {
        rows.iter()
            .map(|r| r.iter().map(|c| c.to_string()).collect())
            .collect()
    }

    const HEADERS: &[&str] = &[
        "No",
        "Title",
        "Date",
        "Tags",
        "Type",
        "Key points",
        "Links",
        "metercube_launch_status",
    ];

    #[test]
    fn test_build_script_matches_published_example() {
        let records = map_rows(&grid(&[
            HEADERS,
            &["1", "A's Day", "2024-01-05", "a, b", "news", "x's y", "http://x", "FALSE"],
        ]));
        let script = build_script(&records, QuoteMode::Strip).unwrap();

        assert!(script.contains("'As Day'"));
        assert!(script.contains("ARRAY['a', 'b']"));
        assert!(script.contains("'xs y'"));
        assert!(script.contains("'2024-01-05T00:00:00.000Z'"));
        assert!(script.contains("'http://x'"));
        assert!(script.contains("ARRAY['Indonesia']"));
        assert!(script.contains("'Draft'"));
    }

    #[test]
    fn test_build_script_fails_on_any_bad_record() {
        let records = map_rows(&grid(&[
            HEADERS,
            &["1", "Good", "2024-01-05", "a", "news", "k", "http://x", "FALSE"],
            &["2", "Bad", "yesterday", "a", "news", "k", "http://y", "FALSE"],
        ]));
        let err = build_script(&records, QuoteMode::Strip).unwrap_err();
        assert_eq!(
            err,
            RenderError::InvalidDate {
                row: "2".into(),
                value: "yesterday".into()
            }
        );
    }

    #[test]
    fn test_quote_mode_from_str() {
        assert_eq!("strip".parse::<QuoteMode>(), Ok(QuoteMode::Strip));
        assert_eq!(" Escape ".parse::<QuoteMode>(), Ok(QuoteMode::Escape));
        assert!("bind".parse::<QuoteMode>().is_err());
    }
}
