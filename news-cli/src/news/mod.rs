//! News publishing: sheet rows in, SQL script and launch flags out

pub mod emit;
pub mod filter;
pub mod query;
pub mod record;
pub mod write_back;

pub use emit::{Emitted, emit_script};
pub use filter::unpublished;
pub use query::{QuoteMode, build_script};
pub use record::map_rows;
pub use write_back::{RowOutcome, WriteBackReport, update_news_status};
