//! Report file output
//!
//! Writes the JSON, CSV and HTML reports of one category. Each file is
//! written to a temporary sibling and renamed into place, so an interrupted
//! run never leaves a truncated report behind. A failure in one format does
//! not stop the others.

use crate::report::csv_output::render_csv;
use crate::report::html::format_html_report;
use crate::report::json::render_json;
use crate::report::{Category, CategoryRecord, ReportError, ReportFormat, ReportResult};
use chrono::{DateTime, Local};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Paths of the three report files of a category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
    pub html: PathBuf,
}

impl ReportPaths {
    /// Paths inside `output_dir`; the HTML name embeds the date of `generated_at`
    pub fn new(output_dir: &Path, category: Category, generated_at: DateTime<Local>) -> Self {
        Self {
            json: output_dir.join(category.json_file_name()),
            csv: output_dir.join(category.csv_file_name()),
            html: output_dir.join(category.html_file_name(generated_at.date_naive())),
        }
    }

    pub fn path_for(&self, format: ReportFormat) -> &Path {
        match format {
            ReportFormat::Json => &self.json,
            ReportFormat::Csv => &self.csv,
            ReportFormat::Html => &self.html,
        }
    }
}

/// What happened when writing a category's reports
#[derive(Debug, Default)]
pub struct WriteOutcome {
    /// Files written successfully
    pub written: Vec<PathBuf>,

    /// Formats that failed, with the reason
    pub failures: Vec<(ReportFormat, ReportError)>,
}

impl WriteOutcome {
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Renders and writes all three reports for `category`
///
/// Existing files of the same name are replaced.
pub fn write_reports(
    records: &[CategoryRecord],
    category: Category,
    output_dir: &Path,
    generated_at: DateTime<Local>,
) -> WriteOutcome {
    let paths = ReportPaths::new(output_dir, category, generated_at);
    let mut outcome = WriteOutcome::default();

    if let Err(e) = fs::create_dir_all(output_dir) {
        tracing::error!(
            "Failed to create output directory {}: {}",
            output_dir.display(),
            e
        );
        for format in ReportFormat::ALL {
            outcome
                .failures
                .push((format, ReportError::Io(io::Error::new(e.kind(), e.to_string()))));
        }
        return outcome;
    }

    for format in ReportFormat::ALL {
        let path = paths.path_for(format);
        let result = render(records, category, format, generated_at)
            .and_then(|contents| write_atomic(path, &contents).map_err(ReportError::from));

        match result {
            Ok(()) => {
                tracing::debug!("Wrote {} report to {}", format, path.display());
                outcome.written.push(path.to_path_buf());
            }
            Err(e) => {
                tracing::error!("Failed to write {} report {}: {}", format, path.display(), e);
                outcome.failures.push((format, e));
            }
        }
    }

    outcome
}

fn render(
    records: &[CategoryRecord],
    category: Category,
    format: ReportFormat,
    generated_at: DateTime<Local>,
) -> ReportResult<String> {
    match format {
        ReportFormat::Json => render_json(records),
        ReportFormat::Csv => render_csv(records, category),
        ReportFormat::Html => Ok(format_html_report(
            records,
            category,
            generated_at.naive_local(),
        )),
    }
}

/// Writes `contents` to a temporary sibling of `path`, then renames it over `path`
pub fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let mut tmp_name = path
        .file_name()
        .map(|name| name.to_os_string())
        .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidInput, "path has no file name"))?;
    tmp_name.push(".tmp");
    let tmp_path = path.with_file_name(tmp_name);

    if let Err(e) = fs::write(&tmp_path, contents.as_bytes()) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    if let Err(e) = fs::rename(&tmp_path, path) {
        let _ = fs::remove_file(&tmp_path);
        return Err(e);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use tempfile::TempDir;

    fn generated_at() -> DateTime<Local> {
        Local.with_ymd_and_hms(2024, 8, 17, 9, 30, 0).unwrap()
    }

    #[test]
    fn test_report_paths() {
        let paths = ReportPaths::new(Path::new("/out"), Category::Government, generated_at());
        assert_eq!(paths.json, PathBuf::from("/out/pemerintah_indonesia.json"));
        assert_eq!(paths.csv, PathBuf::from("/out/pemerintah_indonesia.csv"));
        assert_eq!(
            paths.html,
            PathBuf::from("/out/laporan_pemerintah_20240817.html")
        );
    }

    #[test]
    fn test_write_atomic_replaces_and_cleans_up() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("report.json");

        write_atomic(&path, "first").unwrap();
        write_atomic(&path, "second").unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap(), "second");
        assert!(!dir.path().join("report.json.tmp").exists());
    }

    #[test]
    fn test_write_reports_creates_directory() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("nested").join("reports");

        let outcome = write_reports(&[], Category::School, &output, generated_at());

        assert!(outcome.is_complete());
        assert_eq!(outcome.written.len(), 3);
        assert_eq!(
            fs::read_to_string(output.join("sekolah_indonesia.json")).unwrap(),
            "[]"
        );
        assert!(output.join("laporan_sekolah_20240817.html").exists());
    }

    #[test]
    fn test_unwritable_directory_fails_every_format() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("not-a-dir");
        fs::write(&blocker, "file").unwrap();

        let outcome = write_reports(&[], Category::News, &blocker, generated_at());

        assert!(outcome.written.is_empty());
        assert_eq!(outcome.failures.len(), 3);
    }
}
