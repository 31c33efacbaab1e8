//! HTML report generation
//!
//! Produces a single self-contained document: a header with the generation
//! time and record count, then one block per record. Fields a record's
//! category does not carry are shown as `N/A`.

use crate::report::{Category, CategoryRecord};
use chrono::NaiveDateTime;

/// Characters of description shown per record
pub const DESCRIPTION_PREVIEW_CHARS: usize = 200;

const PLACEHOLDER: &str = "N/A";

const STYLE: &str = r#"        body { font-family: Arial, sans-serif; margin: 20px; }
        .header { background: #2c3e50; color: white; padding: 20px; border-radius: 5px; }
        .item { border: 1px solid #ddd; margin: 10px 0; padding: 15px; border-radius: 5px; }
        .success { border-left: 5px solid #27ae60; }
        .stats { background: #f8f9fa; padding: 10px; border-radius: 5px; margin: 10px 0; }
        .contact { background: #e8f4f8; padding: 10px; margin: 5px 0; }
"#;

/// Formats records of `category` as an HTML report
///
/// # Arguments
///
/// * `records` - The records to show, in order
/// * `category` - Category used for the title
/// * `generated_at` - Local time printed in the header
pub fn format_html_report(
    records: &[CategoryRecord],
    category: Category,
    generated_at: NaiveDateTime,
) -> String {
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"id\">\n<head>\n");
    html.push_str("    <meta charset=\"UTF-8\">\n");
    html.push_str(
        "    <meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n",
    );
    html.push_str(&format!(
        "    <title>Laporan {} - Indo Harvest</title>\n",
        escape_html(category.heading())
    ));
    html.push_str("    <style>\n");
    html.push_str(STYLE);
    html.push_str("    </style>\n</head>\n<body>\n");

    // Header
    html.push_str("    <div class=\"header\">\n");
    html.push_str(&format!(
        "        <h1>Laporan Scraping {}</h1>\n",
        escape_html(category.heading())
    ));
    html.push_str(&format!(
        "        <p>Generated: {}</p>\n",
        generated_at.format("%Y-%m-%d %H:%M:%S")
    ));
    html.push_str(&format!("        <p>Total item: {}</p>\n", records.len()));
    html.push_str("    </div>\n");

    for (index, record) in records.iter().enumerate() {
        html.push_str(&format_record(index + 1, record));
    }

    html.push_str("</body>\n</html>\n");
    html
}

/// Formats one record block
fn format_record(position: usize, record: &CategoryRecord) -> String {
    let name = if record.display_name().is_empty() {
        "Unknown"
    } else {
        record.display_name()
    };
    let website = escape_html(record.website());
    let description = record
        .description()
        .map(|d| escape_html(&truncate_chars(d, DESCRIPTION_PREVIEW_CHARS)))
        .unwrap_or_else(|| PLACEHOLDER.to_string());

    let mut block = String::new();
    block.push_str("    <div class=\"item success\">\n");
    block.push_str(&format!(
        "        <h3>{}. {}</h3>\n",
        position,
        escape_html(name)
    ));
    block.push_str(&format!(
        "        <p><strong>Website:</strong> <a href=\"{}\">{}</a></p>\n",
        website, website
    ));
    block.push_str(&format!(
        "        <p><strong>Deskripsi:</strong> {}</p>\n",
        description
    ));

    block.push_str("        <div class=\"contact\">\n");
    block.push_str("            <strong>Kontak:</strong><br>\n");
    block.push_str(&format!(
        "            Email: {}<br>\n",
        escape_html(&join(record.emails()))
    ));
    block.push_str(&format!(
        "            Telepon: {}<br>\n",
        escape_html(&join(record.phones()))
    ));
    block.push_str("        </div>\n");

    block.push_str("        <div class=\"stats\">\n");
    block.push_str("            <strong>Statistik:</strong><br>\n");
    block.push_str(&format!(
        "            Link: {}<br>\n",
        or_placeholder(record.link_count())
    ));
    block.push_str(&format!(
        "            Halaman: {}<br>\n",
        or_placeholder(record.page_count())
    ));
    block.push_str(&format!(
        "            Scraping: {}\n",
        record.scraped_at().format("%Y-%m-%d %H:%M:%S UTC")
    ));
    block.push_str("        </div>\n");
    block.push_str("    </div>\n");

    block
}

/// First `max` characters of `text`, with "..." appended when cut
fn truncate_chars(text: &str, max: usize) -> String {
    match text.char_indices().nth(max) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

fn join<'a>(values: impl IntoIterator<Item = &'a String>) -> String {
    values
        .into_iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

fn or_placeholder<T: ToString>(value: Option<T>) -> String {
    value
        .map(|v| v.to_string())
        .unwrap_or_else(|| PLACEHOLDER.to_string())
}

/// Escapes text for use in element content and double-quoted attributes
pub fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::project;
    use crate::scrape::ScrapedPage;
    use chrono::NaiveDate;

    fn generated_at() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 8, 17)
            .unwrap()
            .and_hms_opt(10, 0, 0)
            .unwrap()
    }

    #[test]
    fn test_header_has_timestamp_and_count() {
        let html = format_html_report(&[], Category::Government, generated_at());
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("Generated: 2024-08-17 10:00:00"));
        assert!(html.contains("Total item: 0"));
        assert!(html.trim_end().ends_with("</html>"));
    }

    #[test]
    fn test_news_record_uses_placeholders() {
        let mut page = ScrapedPage::new("https://www.kompas.com/");
        page.title = "Kompas".to_string();
        let record = project(&page, "https://www.kompas.com/", Category::News);

        let html = format_html_report(&[record], Category::News, generated_at());

        assert!(html.contains("<h3>1. Kompas</h3>"));
        assert!(html.contains("<strong>Deskripsi:</strong> N/A"));
        assert!(html.contains("Halaman: N/A"));
        assert!(html.contains("Link: 0"));
        assert!(html.contains("<a href=\"https://www.kompas.com/\">"));
    }

    #[test]
    fn test_description_is_truncated_and_escaped() {
        let mut page = ScrapedPage::new("https://a.sch.id/");
        page.title = "<Sekolah & Co>".to_string();
        page.description = "é".repeat(250);
        let record = project(&page, "https://a.sch.id/", Category::School);

        let html = format_html_report(&[record], Category::School, generated_at());

        assert!(html.contains("&lt;Sekolah &amp; Co&gt;"));
        assert!(html.contains(&format!("{}...", "é".repeat(200))));
        assert!(!html.contains(&"é".repeat(201)));
        assert!(html.contains("Halaman: 1"));
        assert!(html.contains("Link: N/A"));
    }

    #[test]
    fn test_empty_name_falls_back_to_unknown() {
        let page = ScrapedPage::new("https://b.go.id/");
        let record = project(&page, "https://b.go.id/", Category::Government);
        let html = format_html_report(&[record], Category::Government, generated_at());
        assert!(html.contains("<h3>1. Unknown</h3>"));
    }

    #[test]
    fn test_truncate_short_text_untouched() {
        assert_eq!(truncate_chars("pendek", 200), "pendek");
        assert_eq!(truncate_chars("abcdef", 3), "abc...");
    }
}
