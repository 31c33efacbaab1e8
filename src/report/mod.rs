//! Report module for aggregating scrape results
//!
//! This module handles:
//! - Projecting scraped pages into category records
//! - Summarizing a run
//! - Rendering JSON, CSV and HTML reports
//! - Writing the report files

mod category;
mod csv_output;
mod html;
mod json;
mod projection;
mod records;
pub mod summary;
mod writer;

pub use category::Category;
pub use csv_output::{csv_headers, render_csv, LIST_SEPARATOR};
pub use html::{escape_html, format_html_report, DESCRIPTION_PREVIEW_CHARS};
pub use json::render_json;
pub use projection::{project, GOVERNMENT_KEYWORDS, NEWS_KEYWORDS};
pub use records::{CategoryRecord, GovernmentRecord, KeywordCounts, NewsRecord, SchoolRecord};
pub use summary::{print_summary, summarize, RunSummary};
pub use writer::{write_atomic, write_reports, ReportPaths, WriteOutcome};

use chrono::NaiveDateTime;
use std::fmt;
use thiserror::Error;

/// Errors that can occur while rendering or writing a report
#[derive(Debug, Error)]
pub enum ReportError {
    #[error("Failed to serialize JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] ::csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("A {found} record cannot be rendered in the {expected} report")]
    CategoryMismatch { expected: Category, found: Category },

    #[error("Failed to format output: {0}")]
    Format(String),
}

/// Result type for report operations
pub type ReportResult<T> = Result<T, ReportError>;

/// Output formats written for every category
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReportFormat {
    Json,
    Csv,
    Html,
}

impl ReportFormat {
    pub const ALL: [ReportFormat; 3] = [ReportFormat::Json, ReportFormat::Csv, ReportFormat::Html];
}

impl fmt::Display for ReportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReportFormat::Json => "JSON",
            ReportFormat::Csv => "CSV",
            ReportFormat::Html => "HTML",
        };
        write!(f, "{}", name)
    }
}

/// The three renderings of one record set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedReports {
    pub json: String,
    pub csv: String,
    pub html: String,
}

/// Renders `records` in every format without touching the filesystem
pub fn render(
    records: &[CategoryRecord],
    category: Category,
    generated_at: NaiveDateTime,
) -> ReportResult<RenderedReports> {
    Ok(RenderedReports {
        json: render_json(records)?,
        csv: render_csv(records, category)?,
        html: format_html_report(records, category, generated_at),
    })
}
