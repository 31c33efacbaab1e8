//! Run summaries
//!
//! This module reduces a finished list of records into aggregate counts and
//! prints them to stdout.

use crate::report::{Category, CategoryRecord};
use serde::Serialize;

/// Aggregate statistics for one category run
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RunSummary {
    /// Records produced (targets that were scraped)
    pub records: usize,

    /// Targets dropped after exhausting their attempts
    pub failed_targets: usize,

    pub total_emails: usize,
    pub total_phones: usize,

    /// Sum over records that track links
    pub total_links: usize,

    /// Sum over records that track words
    pub total_words: usize,

    /// `total_words / records`, integer division, 0 without records
    pub average_words_per_record: usize,

    /// `total_links / records`, 0.0 without records
    pub average_links_per_record: f64,
}

impl RunSummary {
    /// Sets the number of failed targets
    pub fn with_failed_targets(mut self, failed_targets: usize) -> Self {
        self.failed_targets = failed_targets;
        self
    }

    pub fn attempted_targets(&self) -> usize {
        self.records + self.failed_targets
    }

    /// Returns the success rate as a percentage
    pub fn success_rate(&self) -> f64 {
        let attempted = self.attempted_targets();
        if attempted == 0 {
            return 0.0;
        }
        (self.records as f64 / attempted as f64) * 100.0
    }
}

/// Reduces `records` into a [`RunSummary`]
///
/// An empty slice yields all-zero aggregates.
pub fn summarize(records: &[CategoryRecord]) -> RunSummary {
    let total_emails = records.iter().map(|r| r.emails().len()).sum();
    let total_phones = records.iter().map(|r| r.phones().len()).sum();
    let total_links: usize = records.iter().filter_map(CategoryRecord::link_count).sum();
    let total_words: usize = records.iter().filter_map(CategoryRecord::word_count).sum();

    let (average_words_per_record, average_links_per_record) = if records.is_empty() {
        (0, 0.0)
    } else {
        (
            total_words / records.len(),
            total_links as f64 / records.len() as f64,
        )
    };

    RunSummary {
        records: records.len(),
        failed_targets: 0,
        total_emails,
        total_phones,
        total_links,
        total_words,
        average_words_per_record,
        average_links_per_record,
    }
}

/// Prints a summary to stdout in a formatted manner
pub fn print_summary(category: Category, summary: &RunSummary) {
    println!("\n=== Ringkasan {} ===\n", category.heading());

    println!("  Berhasil: {}", summary.records);
    println!("  Gagal: {}", summary.failed_targets);
    println!(
        "  Success Rate: {:.1}% ({} / {} targets)",
        summary.success_rate(),
        summary.records,
        summary.attempted_targets()
    );

    match category {
        Category::School => {
            println!("  Total email ditemukan: {}", summary.total_emails);
            println!("  Total telepon ditemukan: {}", summary.total_phones);
        }
        Category::Government => {
            println!("  Total link: {}", summary.total_links);
            println!(
                "  Rata-rata link per situs: {:.1}",
                summary.average_links_per_record
            );
        }
        Category::News => {
            println!("  Total kata: {}", summary.total_words);
            println!("  Total link: {}", summary.total_links);
            println!(
                "  Rata-rata kata per media: {}",
                summary.average_words_per_record
            );
        }
    }
}
