//! Marking published rows as launched in the source sheet

use log::{info, warn};

use crate::api::SheetSource;
use crate::news::record::Record;

/// Why a row was left untouched
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The first cell of the laid-out row doesn't match the row ordinal
    Misaligned { first_cell: String },
    /// The ordinal is missing or not a positive whole number
    InvalidOrdinal,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SkipReason::Misaligned { first_cell } => {
                write!(f, "first column holds '{}', not the row number", first_cell)
            }
            SkipReason::InvalidOrdinal => write!(f, "row number is not a positive integer"),
        }
    }
}

/// Result of writing back one record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Updated { no: String, row: u32 },
    Skipped { no: String, reason: SkipReason },
    Failed { no: String, row: u32, error: String },
}

/// Per-row outcomes of a write-back pass, in processing order
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WriteBackReport {
    pub outcomes: Vec<RowOutcome>,
}

impl WriteBackReport {
    pub fn updated(&self) -> usize {
        self.count(|o| matches!(o, RowOutcome::Updated { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, RowOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, RowOutcome::Failed { .. }))
    }

    /// True when every record was written
    pub fn is_complete(&self) -> bool {
        self.updated() == self.outcomes.len()
    }

    fn count(&self, pred: impl Fn(&RowOutcome) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(o)).count()
    }
}

/// Sheet row (1-based) holding the record with ordinal `no`
///
/// Row 1 is the header, so ordinal `n` lives on row `n + 1`.
pub fn sheet_row_for(no: &str) -> Option<u32> {
    match no.trim().parse::<u32>() {
        Ok(n) if n >= 1 => n.checked_add(1),
        _ => None,
    }
}

/// Flip each record to launched and write it back over its original row
///
/// Rows are written one at a time in order. A row whose first cell doesn't
/// match its ordinal is skipped; a failed write is recorded and the loop
/// moves on to the next row.
pub async fn update_news_status(
    source: &dyn SheetSource,
    tab: &str,
    records: &[Record],
) -> WriteBackReport {
    info!("Updating all rows.....");
    let mut report = WriteBackReport::default();

    for record in records {
        let launched = record.mark_launched();
        let row_values = launched.to_row();
        let no = launched.no().unwrap_or_default().to_string();

        let first_cell = row_values.first().cloned().unwrap_or_default();
        if first_cell != no {
            warn!("Skipping row no-{}: first column holds '{}'", no, first_cell);
            report.outcomes.push(RowOutcome::Skipped {
                no,
                reason: SkipReason::Misaligned { first_cell },
            });
            continue;
        }

        let Some(row) = sheet_row_for(&no) else {
            warn!("Skipping row no-{}: not a valid row number", no);
            report.outcomes.push(RowOutcome::Skipped {
                no,
                reason: SkipReason::InvalidOrdinal,
            });
            continue;
        };

        info!("Updating row no-{}...", no);
        match source.write_row(tab, row, &row_values).await {
            Ok(()) => report.outcomes.push(RowOutcome::Updated { no, row }),
            Err(e) => {
                warn!("Failed to update row no-{}: {:#}", no, e);
                report.outcomes.push(RowOutcome::Failed {
                    no,
                    row,
                    error: format!("{:#}", e),
                });
            }
        }
    }

    info!("All rows status updated.....");
    info!("{} rows affected", report.updated());
    report
}
