pub mod export;
pub mod types;

pub use export::{detail_pairs, export_results, render};
pub use types::{CitationStats, ExportFormat};
