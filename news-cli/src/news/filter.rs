//! Selection of rows that still need publishing

use super::record::{LaunchStatus, Record};

/// Keep only records whose launch status is exactly `"FALSE"`
///
/// Case variants, blanks, missing status cells and `"TRUE"` are all dropped.
pub fn unpublished(records: &[Record]) -> Vec<Record> {
    records
        .iter()
        .filter(|r| r.status() == Some(LaunchStatus::Pending))
        .cloned()
        .collect()
}
