//! In-memory sheet used by the tests

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Mutex;

use crate::api::SheetSource;

/// A sheet held in memory; `write_row` overwrites rows in place
#[derive(Debug, Default)]
pub struct MemorySheet {
    cells: Mutex<Vec<Vec<String>>>,
    writes: Mutex<Vec<u32>>,
    fail_row: Option<u32>,
    fail_read: bool,
}

impl MemorySheet {
    pub fn new(cells: Vec<Vec<String>>) -> Self {
        Self {
            cells: Mutex::new(cells),
            ..Default::default()
        }
    }

    /// Make writes to `row` (1-based) fail
    pub fn failing_on_row(mut self, row: u32) -> Self {
        self.fail_row = Some(row);
        self
    }

    /// Make every read fail
    pub fn failing_reads(mut self) -> Self {
        self.fail_read = true;
        self
    }

    pub fn cells(&self) -> Vec<Vec<String>> {
        self.cells.lock().unwrap().clone()
    }

    /// Rows written so far, in order
    pub fn writes(&self) -> Vec<u32> {
        self.writes.lock().unwrap().clone()
    }
}

#[async_trait]
impl SheetSource for MemorySheet {
    async fn read_range(&self, _tab: &str, _range: &str) -> Result<Vec<Vec<String>>> {
        if self.fail_read {
            anyhow::bail!("Reading failed with HTTP 404 Not Found");
        }
        Ok(self.cells())
    }

    async fn write_row(&self, _tab: &str, row: u32, values: &[String]) -> Result<()> {
        if self.fail_row == Some(row) {
            anyhow::bail!("Updating row {} failed with HTTP 500", row);
        }

        let mut cells = self.cells.lock().unwrap();
        let index = (row - 1) as usize;
        if cells.len() <= index {
            cells.resize(index + 1, Vec::new());
        }
        cells[index] = values.to_vec();
        self.writes.lock().unwrap().push(row);
        Ok(())
    }
}
