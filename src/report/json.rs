use crate::report::{CategoryRecord, ReportResult};

/// Renders records as a pretty-printed JSON array
///
/// Non-ASCII text is written as-is, not `\u` escaped.
pub fn render_json(records: &[CategoryRecord]) -> ReportResult<String> {
    Ok(serde_json::to_string_pretty(records)?)
}
