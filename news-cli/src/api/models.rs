//! Google Sheets API wire models

use chrono::{DateTime, Duration, Utc};
use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A block of cell values as exchanged with `spreadsheets.values`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ValueRange {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub major_dimension: Option<String>,
    /// Rows of cells. Absent when the requested range is empty.
    #[serde(default)]
    pub values: Vec<Vec<Value>>,
}

impl ValueRange {
    /// Build a single-row payload for an update call
    pub fn single_row(range: impl Into<String>, row: &[String]) -> Self {
        Self {
            range: Some(range.into()),
            major_dimension: Some("ROWS".to_string()),
            values: vec![row.iter().cloned().map(Value::String).collect()],
        }
    }

    /// Convert the cells into strings, the way the sheet displays them
    pub fn into_grid(self) -> Vec<Vec<String>> {
        self.values
            .into_iter()
            .map(|row| row.into_iter().map(cell_to_string).collect())
            .collect()
    }
}

/// Stringify a single cell value
///
/// The API returns formatted strings by default, but numbers and booleans
/// show up when the caller asks for unformatted values.
pub fn cell_to_string(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s,
        Value::Bool(b) => if b { "TRUE" } else { "FALSE" }.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Response of a `values.update` call
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateValuesResponse {
    #[serde(default)]
    pub updated_range: Option<String>,
    #[serde(default)]
    pub updated_cells: Option<u32>,
}

impl UpdateValuesResponse {
    /// Parse an update response body, falling back to an empty response
    ///
    /// The row is already written when this runs, so a body we can't read
    /// is only logged.
    pub fn parse_or_default(body: &str, a1: &str) -> Self {
        match serde_json::from_str(body) {
            Ok(parsed) => parsed,
            Err(e) => {
                debug!("Could not parse update response for {}: {}", a1, e);
                Self::default()
            }
        }
    }
}

/// Fields of a service account JSON key that the token exchange needs
#[derive(Debug, Clone, Deserialize)]
pub struct ServiceAccountKey {
    pub client_email: String,
    pub private_key: String,
    #[serde(default)]
    pub private_key_id: Option<String>,
    #[serde(default = "default_token_uri")]
    pub token_uri: String,
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

/// Claims of the signed assertion sent to the token endpoint
#[derive(Debug, Serialize)]
pub struct AssertionClaims<'a> {
    pub iss: &'a str,
    pub scope: &'a str,
    pub aud: &'a str,
    pub iat: i64,
    pub exp: i64,
}

/// OAuth2 token endpoint response
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default)]
    pub expires_in: Option<i64>,
}

/// An access token together with when it stops being usable
#[derive(Debug, Clone)]
pub struct TokenInfo {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl TokenInfo {
    /// Tokens are treated as expired a minute early to cover clock skew
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now + Duration::seconds(60) >= self.expires_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_update_response_parses_counts() {
        let parsed = UpdateValuesResponse::parse_or_default(
            r#"{"spreadsheetId":"s","updatedRange":"News!A2:H2","updatedCells":8}"#,
            "News!A2:H2",
        );
        assert_eq!(parsed.updated_range.as_deref(), Some("News!A2:H2"));
        assert_eq!(parsed.updated_cells, Some(8));
    }

    #[test]
    fn test_unreadable_update_response_falls_back() {
        let parsed = UpdateValuesResponse::parse_or_default("<html>oops</html>", "News!A2:H2");
        assert_eq!(parsed.updated_range, None);
        assert_eq!(parsed.updated_cells, None);
    }
    use serde_json::json;

    #[test]
    fn test_value_range_without_values_is_empty_grid() {
        let range: ValueRange =
            serde_json::from_value(json!({"range": "News!A1:H10", "majorDimension": "ROWS"}))
                .unwrap();
        assert!(range.into_grid().is_empty());
    }

    #[test]
    fn test_value_range_stringifies_cells() {
        let range: ValueRange = serde_json::from_value(json!({
            "values": [["No", "Title"], [1, "Hello"], [2, true]]
        }))
        .unwrap();
        let grid = range.into_grid();
        assert_eq!(grid[1], vec!["1", "Hello"]);
        assert_eq!(grid[2], vec!["2", "TRUE"]);
    }

    #[test]
    fn test_single_row_payload_shape() {
        let row = vec!["3".to_string(), "TRUE".to_string()];
        let payload = serde_json::to_value(ValueRange::single_row("News!A4:B4", &row)).unwrap();
        assert_eq!(
            payload,
            json!({"range": "News!A4:B4", "majorDimension": "ROWS", "values": [["3", "TRUE"]]})
        );
    }

    #[test]
    fn test_token_expiry_margin() {
        let now = Utc::now();
        let token = TokenInfo {
            access_token: "t".into(),
            expires_at: now + Duration::seconds(30),
        };
        assert!(token.is_expired(now));

        let token = TokenInfo {
            access_token: "t".into(),
            expires_at: now + Duration::seconds(3600),
        };
        assert!(!token.is_expired(now));
    }
}
