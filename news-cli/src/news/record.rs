//! News records mapped from sheet rows

/// Column holding the row ordinal used to locate the row for write-back
pub const NO_FIELD: &str = "no";

/// Column holding the launch status flag
pub const STATUS_FIELD: &str = "metercube_launch_status";

/// Launch status of a news row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LaunchStatus {
    /// Not yet emitted into a script
    Pending,
    /// Already emitted
    Launched,
}

impl LaunchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            LaunchStatus::Pending => "FALSE",
            LaunchStatus::Launched => "TRUE",
        }
    }

    /// Parse the exact sheet value; anything else is not a known status
    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "FALSE" => Some(LaunchStatus::Pending),
            "TRUE" => Some(LaunchStatus::Launched),
            _ => None,
        }
    }
}

/// Normalize a header cell into a record key
///
/// `Key points` has an explicit alias; every other header is only lowercased.
pub fn normalize_header(header: &str) -> String {
    if header == "Key points" {
        "key_points".to_string()
    } else {
        header.to_lowercase()
    }
}

/// One data row keyed by normalized header names, in column order
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, String)>,
}

impl Record {
    pub fn new(fields: Vec<(String, String)>) -> Self {
        Self { fields }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(k, _)| k.as_str())
    }

    /// Row ordinal as written in the sheet
    pub fn no(&self) -> Option<&str> {
        self.get(NO_FIELD)
    }

    pub fn status(&self) -> Option<LaunchStatus> {
        self.get(STATUS_FIELD).and_then(LaunchStatus::parse)
    }

    /// Return a copy with `key` set to `value`, keeping column order
    ///
    /// A key the record doesn't have is appended at the end.
    pub fn with_field(&self, key: &str, value: impl Into<String>) -> Self {
        let value = value.into();
        let mut fields = self.fields.clone();
        match fields.iter_mut().find(|(k, _)| k == key) {
            Some(entry) => entry.1 = value,
            None => fields.push((key.to_string(), value)),
        }
        Self { fields }
    }

    /// Return the launched copy of this record
    pub fn mark_launched(&self) -> Self {
        self.with_field(STATUS_FIELD, LaunchStatus::Launched.as_str())
    }

    /// Cell values in column order, ready to be written back as a row
    pub fn to_row(&self) -> Vec<String> {
        self.fields.iter().map(|(_, v)| v.clone()).collect()
    }
}

/// Map a raw grid into records, treating row 0 as headers
///
/// Rows shorter than the header are padded with empty cells; cells past the
/// last header are dropped.
pub fn map_rows(grid: &[Vec<String>]) -> Vec<Record> {
    let Some((header_row, data_rows)) = grid.split_first() else {
        return Vec::new();
    };

    let headers: Vec<String> = header_row.iter().map(|h| normalize_header(h)).collect();

    data_rows
        .iter()
        .map(|row| {
            let fields = headers
                .iter()
                .enumerate()
                .map(|(i, key)| (key.clone(), row.get(i).cloned().unwrap_or_default()))
                .collect();
            Record::new(fields)
        })
        .collect()
}
