//! Google Sheets API access
//!
//! Service account authentication plus the small slice of the
//! `spreadsheets.values` API needed to read a tab and write rows back.

pub mod auth;
pub mod client;
pub mod models;
pub mod range;

pub use auth::AuthManager;
pub use client::{SheetSource, SheetsClient};
