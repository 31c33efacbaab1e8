//! CSV rendering
//!
//! One header row plus one row per record. Collection fields are joined into
//! a single cell with [`LIST_SEPARATOR`]; keyword counts get one column each.

use crate::report::projection::{GOVERNMENT_KEYWORDS, NEWS_KEYWORDS};
use crate::report::records::KeywordCounts;
use crate::report::{Category, CategoryRecord, ReportError, ReportResult};
use std::collections::{BTreeMap, BTreeSet};

/// Separator for list values inside one cell
pub const LIST_SEPARATOR: &str = "; ";

/// Column names for a category
pub fn csv_headers(category: Category) -> Vec<String> {
    let fixed: &[&str] = match category {
        Category::School => &[
            "nama_sekolah",
            "website",
            "deskripsi",
            "email",
            "telepon",
            "alamat",
            "jumlah_halaman",
            "waktu_scraping",
        ],
        Category::Government => &[
            "kementerian",
            "website",
            "domain",
            "deskripsi",
            "email",
            "telepon",
            "alamat",
            "metadata",
            "total_links",
            "waktu_scraping",
        ],
        Category::News => &[
            "media",
            "website",
            "word_count",
            "char_count",
            "link_count",
            "image_count",
            "top_keyword",
            "email",
            "telepon",
            "scraped_at",
        ],
    };

    let mut headers: Vec<String> = fixed.iter().map(|h| h.to_string()).collect();
    headers.extend(
        keywords_for(category)
            .iter()
            .map(|keyword| format!("keyword_{}", keyword)),
    );
    headers
}

/// Renders records of `category` as CSV
///
/// # Returns
///
/// * `Ok(String)` - Header row followed by one row per record
/// * `Err(ReportError::CategoryMismatch)` - A record belongs to another category
pub fn render_csv(records: &[CategoryRecord], category: Category) -> ReportResult<String> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(csv_headers(category))?;

    for record in records {
        if record.category() != category {
            return Err(ReportError::CategoryMismatch {
                expected: category,
                found: record.category(),
            });
        }
        writer.write_record(csv_row(record))?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| ReportError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ReportError::Format(e.to_string()))
}

/// Flattens one record into cells matching [`csv_headers`]
fn csv_row(record: &CategoryRecord) -> Vec<String> {
    match record {
        CategoryRecord::School(r) => vec![
            r.name.clone(),
            r.website.clone(),
            r.description.clone(),
            join(&r.emails),
            join(&r.phones),
            join(&r.addresses),
            r.pages_scraped.to_string(),
            r.scraped_at.to_rfc3339(),
        ],
        CategoryRecord::Government(r) => {
            let mut row = vec![
                r.name.clone(),
                r.website.clone(),
                r.domain.clone(),
                r.description.clone(),
                join(&r.contact.emails),
                join(&r.contact.phones),
                join(&r.contact.addresses),
                join_metadata(&r.metadata),
                r.total_links.to_string(),
                r.scraped_at.to_rfc3339(),
            ];
            row.extend(keyword_cells(&r.keyword_analysis, &GOVERNMENT_KEYWORDS));
            row
        }
        CategoryRecord::News(r) => {
            let mut row = vec![
                r.name.clone(),
                r.website.clone(),
                r.word_count.to_string(),
                r.char_count.to_string(),
                r.link_count.to_string(),
                r.image_count.to_string(),
                r.top_keyword.clone(),
                join(&r.contact_info.emails),
                join(&r.contact_info.phones),
                r.scraped_at.to_rfc3339(),
            ];
            row.extend(keyword_cells(&r.keyword_frequency, &NEWS_KEYWORDS));
            row
        }
    }
}

fn keywords_for(category: Category) -> &'static [&'static str] {
    match category {
        Category::School => &[],
        Category::Government => &GOVERNMENT_KEYWORDS,
        Category::News => &NEWS_KEYWORDS,
    }
}

fn keyword_cells(counts: &KeywordCounts, keywords: &[&str]) -> Vec<String> {
    keywords
        .iter()
        .map(|keyword| counts.get(keyword).unwrap_or(0).to_string())
        .collect()
}

fn join(values: &BTreeSet<String>) -> String {
    values
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

fn join_metadata(metadata: &BTreeMap<String, String>) -> String {
    metadata
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join(LIST_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::project;
    use crate::scrape::ScrapedPage;

    fn school_page() -> ScrapedPage {
        let mut page = ScrapedPage::new("https://www.smkn1jakarta.sch.id/");
        page.title = "SMKN 1 Jakarta, Unggulan".to_string();
        page.contact_info.emails.insert("a@smkn1.sch.id".to_string());
        page.contact_info.emails.insert("b@smkn1.sch.id".to_string());
        page
    }

    fn parse(csv_text: &str) -> Vec<csv::StringRecord> {
        csv::Reader::from_reader(csv_text.as_bytes())
            .records()
            .collect::<Result<_, _>>()
            .unwrap()
    }

    #[test]
    fn test_header_only_for_empty_list() {
        let text = render_csv(&[], Category::News).unwrap();
        assert_eq!(text.lines().count(), 1);
        assert!(text.starts_with("media,website,word_count"));
        assert!(text.trim_end().ends_with("keyword_kesehatan"));
    }

    #[test]
    fn test_lists_are_joined_and_commas_quoted() {
        let record = project(&school_page(), "https://www.smkn1jakarta.sch.id/", Category::School);
        let text = render_csv(&[record], Category::School).unwrap();

        let rows = parse(&text);
        assert_eq!(rows.len(), 1);
        assert_eq!(&rows[0][0], "SMKN 1 Jakarta, Unggulan");
        assert_eq!(&rows[0][3], "a@smkn1.sch.id; b@smkn1.sch.id");
        assert_eq!(&rows[0][6], "1");
    }

    #[test]
    fn test_row_width_matches_headers() {
        for category in Category::ALL {
            let record = project(&school_page(), "https://x.id/", category);
            let text = render_csv(&[record], category).unwrap();
            let rows = parse(&text);
            assert_eq!(rows[0].len(), csv_headers(category).len());
        }
    }

    #[test]
    fn test_mismatched_category_is_rejected() {
        let record = project(&school_page(), "https://x.id/", Category::School);
        let err = render_csv(&[record], Category::News).unwrap_err();
        assert!(matches!(
            err,
            ReportError::CategoryMismatch {
                expected: Category::News,
                found: Category::School
            }
        ));
    }
}
