//! The publish run: read, map, filter, render, emit, write back

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use log::{debug, info};

use crate::api::SheetSource;
use crate::config::Config;
use crate::news::{
    Emitted, WriteBackReport, build_script, emit_script, map_rows, unpublished,
    update_news_status,
};

/// What a run did
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub records_read: usize,
    pub pending: usize,
    /// Rendered script, kept only on dry runs
    pub script: Option<String>,
    pub emitted: Option<Emitted>,
    pub write_back: Option<WriteBackReport>,
}

impl RunSummary {
    pub fn nothing_to_publish(&self) -> bool {
        self.pending == 0
    }
}

/// Run one publish pass against `source`
///
/// `now` names the output file. With `dry_run` the script is rendered and
/// returned but no file is written and the sheet is left untouched.
pub async fn run(
    source: &dyn SheetSource,
    config: &Config,
    now: NaiveDateTime,
    dry_run: bool,
) -> Result<RunSummary> {
    let grid = source
        .read_range(&config.tab_name, &config.data_range)
        .await
        .with_context(|| {
            format!(
                "Failed to read {}!{} from sheet {}",
                config.tab_name, config.data_range, config.sheet_id
            )
        })?;

    info!("Converting all data to objects.....");
    let records = map_rows(&grid);
    if let Some(first) = records.first() {
        debug!("Columns: {}", first.keys().collect::<Vec<_>>().join(", "));
    }
    info!("Data converted successfully ({} rows)", records.len());

    let pending = unpublished(&records);
    let mut summary = RunSummary {
        records_read: records.len(),
        pending: pending.len(),
        ..Default::default()
    };

    if pending.is_empty() {
        info!("There is no data which can be published!");
        return Ok(summary);
    }

    info!("Generating queries for {} rows....", pending.len());
    let script = build_script(&pending, config.quote_mode).context("Failed to generate queries")?;
    info!("Queries generated successfully.....");

    if dry_run {
        info!("Dry run: skipping file output and sheet update");
        summary.script = Some(script);
        return Ok(summary);
    }

    summary.emitted = Some(emit_script(&config.output_dir, &script, now)?);
    summary.write_back = Some(update_news_status(source, &config.tab_name, &pending).await);

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::news::{QuoteMode, RowOutcome};
    use crate::testing::MemorySheet;
    use chrono::NaiveDate;
    use std::path::Path;

    const HEADERS: [&str; 8] = [
        "No",
        "Title",
        "Date",
        "Tags",
        "Type",
        "Key points",
        "Links",
        "metercube_launch_status",
    ];

    fn row(no: &str, title: &str, date: &str, status: &str) -> Vec<String> {
        [no, title, date, "a, b", "news", "point", "http://x", status]
            .iter()
            .map(|c| c.to_string())
            .collect()
    }

    fn sheet(rows: Vec<Vec<String>>) -> MemorySheet {
        let mut grid: Vec<Vec<String>> = vec![HEADERS.iter().map(|h| h.to_string()).collect()];
        grid.extend(rows);
        MemorySheet::new(grid)
    }

    fn config(output_dir: &Path) -> Config {
        Config {
            sheet_id: "sheet-1".into(),
            tab_name: "News".into(),
            data_range: "A1:H".into(),
            key_file: "key.json".into(),
            output_dir: output_dir.to_path_buf(),
            quote_mode: QuoteMode::Strip,
        }
    }

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 7)
            .unwrap()
            .and_hms_opt(9, 5, 0)
            .unwrap()
    }

    #[tokio::test]
    async fn test_pending_row_is_published_and_flipped() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("script");
        let source = sheet(vec![
            row("1", "First", "2024-01-05", "FALSE"),
            row("2", "Second", "2024-01-06", "TRUE"),
        ]);

        let summary = run(&source, &config(&out), now(), false).await.unwrap();

        assert_eq!(summary.records_read, 2);
        assert_eq!(summary.pending, 1);

        let path = out.join("QUERY_7-MARCH-2024_09-05.sql");
        assert_eq!(summary.emitted, Some(Emitted::Written(path.clone())));
        let script = std::fs::read_to_string(path).unwrap();
        assert!(script.contains("'First'"));
        assert!(!script.contains("'Second'"));

        let report = summary.write_back.unwrap();
        assert_eq!(
            report.outcomes,
            vec![RowOutcome::Updated {
                no: "1".into(),
                row: 2
            }]
        );
        assert_eq!(source.cells()[1][7], "TRUE");
        assert_eq!(source.cells()[2][7], "TRUE");
    }

    #[tokio::test]
    async fn test_second_run_finds_nothing() {
        let tmp = tempfile::tempdir().unwrap();
        let source = sheet(vec![row("1", "First", "2024-01-05", "FALSE")]);
        let cfg = config(tmp.path());

        run(&source, &cfg, now(), false).await.unwrap();
        let second = run(&source, &cfg, now(), false).await.unwrap();

        assert!(second.nothing_to_publish());
        assert_eq!(source.writes(), vec![2]);
    }

    #[tokio::test]
    async fn test_empty_selection_skips_everything() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("script");
        let source = sheet(vec![row("1", "Done", "2024-01-05", "TRUE")]);

        let summary = run(&source, &config(&out), now(), false).await.unwrap();

        assert!(summary.nothing_to_publish());
        assert!(summary.emitted.is_none());
        assert!(summary.write_back.is_none());
        assert!(!out.exists());
        assert!(source.writes().is_empty());
    }

    #[tokio::test]
    async fn test_write_failure_still_updates_sheet() {
        let tmp = tempfile::tempdir().unwrap();
        std::fs::create_dir(tmp.path().join("QUERY_7-MARCH-2024_09-05.sql")).unwrap();
        let source = sheet(vec![row("1", "First", "2024-01-05", "FALSE")]);

        let summary = run(&source, &config(tmp.path()), now(), false).await.unwrap();

        assert!(matches!(summary.emitted, Some(Emitted::Failed { .. })));
        assert_eq!(summary.write_back.unwrap().updated(), 1);
        assert_eq!(source.cells()[1][7], "TRUE");
    }

    #[tokio::test]
    async fn test_bad_date_aborts_before_any_output() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("script");
        let source = sheet(vec![
            row("1", "First", "2024-01-05", "FALSE"),
            row("2", "Broken", "soon", "FALSE"),
        ]);

        let err = run(&source, &config(&out), now(), false).await.unwrap_err();

        assert!(format!("{:#}", err).contains("row no-2 has an unparseable date 'soon'"));
        assert!(!out.exists());
        assert!(source.writes().is_empty());
    }

    #[tokio::test]
    async fn test_blank_cells_do_not_block_publishing() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("script");
        let mut blank = row("1", "First", "2024-01-05", "FALSE");
        blank[3] = String::new();
        blank[5] = String::new();
        let source = sheet(vec![blank, row("2", "Second", "2024-01-06", "FALSE")]);

        let summary = run(&source, &config(&out), now(), false).await.unwrap();

        assert_eq!(summary.write_back.unwrap().updated(), 2);
        assert_eq!(source.writes(), vec![2, 3]);
        let script = std::fs::read_to_string(out.join("QUERY_7-MARCH-2024_09-05.sql")).unwrap();
        assert!(script.contains("  'First',\n  NULL,\n  ARRAY['Indonesia'],\n  '',\n"));
        assert!(script.contains("ARRAY['']"));
        assert!(script.contains("'Second'"));
    }

    #[tokio::test]
    async fn test_read_failure_is_fatal() {
        let tmp = tempfile::tempdir().unwrap();
        let source = sheet(vec![]).failing_reads();

        let err = run(&source, &config(tmp.path()), now(), false).await.unwrap_err();
        assert!(err.to_string().contains("Failed to read News!A1:H"));
    }

    #[tokio::test]
    async fn test_dry_run_renders_without_side_effects() {
        let tmp = tempfile::tempdir().unwrap();
        let out = tmp.path().join("script");
        let source = sheet(vec![row("1", "It's new", "2024-01-05", "FALSE")]);

        let summary = run(&source, &config(&out), now(), true).await.unwrap();

        let script = summary.script.unwrap();
        assert!(script.contains("'Its new'"));
        assert!(summary.emitted.is_none());
        assert!(!out.exists());
        assert!(source.writes().is_empty());
        assert_eq!(source.cells()[1][7], "FALSE");
    }
}
