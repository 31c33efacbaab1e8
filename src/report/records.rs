//! Category records
//!
//! A [`CategoryRecord`] is the projection of one successful scrape. The JSON
//! keys are the ones the reports have always used, hence the renames.

use crate::report::Category;
use crate::scrape::ContactInfo;
use chrono::{DateTime, Utc};
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};
use std::collections::{BTreeMap, BTreeSet};

/// Keyword occurrence counts, kept in keyword order
///
/// Serializes as a JSON object whose keys follow that order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeywordCounts(Vec<(String, usize)>);

impl KeywordCounts {
    /// Counts non-overlapping occurrences of each keyword in the lower-cased content
    pub fn count_in(content: &str, keywords: &[&str]) -> Self {
        let content = content.to_lowercase();
        Self(
            keywords
                .iter()
                .map(|keyword| (keyword.to_string(), content.matches(keyword).count()))
                .collect(),
        )
    }

    pub fn get(&self, keyword: &str) -> Option<usize> {
        self.0
            .iter()
            .find(|(k, _)| k == keyword)
            .map(|(_, count)| *count)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.0.iter().map(|(k, count)| (k.as_str(), *count))
    }

    /// The most frequent keyword; the first one listed wins a tie
    pub fn top(&self) -> Option<&str> {
        let mut best: Option<&(String, usize)> = None;
        for entry in &self.0 {
            if best.map_or(true, |b| entry.1 > b.1) {
                best = Some(entry);
            }
        }
        best.map(|(k, _)| k.as_str())
    }
}

impl Serialize for KeywordCounts {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (keyword, count) in &self.0 {
            map.serialize_entry(keyword, count)?;
        }
        map.end()
    }
}

/// A scraped school website
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SchoolRecord {
    #[serde(rename = "nama_sekolah")]
    pub name: String,
    pub website: String,
    #[serde(rename = "deskripsi")]
    pub description: String,
    #[serde(rename = "email")]
    pub emails: BTreeSet<String>,
    #[serde(rename = "telepon")]
    pub phones: BTreeSet<String>,
    #[serde(rename = "alamat")]
    pub addresses: BTreeSet<String>,
    #[serde(rename = "jumlah_halaman")]
    pub pages_scraped: u32,
    #[serde(rename = "waktu_scraping")]
    pub scraped_at: DateTime<Utc>,
}

/// A scraped government portal
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GovernmentRecord {
    #[serde(rename = "kementerian")]
    pub name: String,
    pub website: String,
    pub domain: String,
    #[serde(rename = "deskripsi")]
    pub description: String,
    #[serde(rename = "kontak")]
    pub contact: ContactInfo,
    pub metadata: BTreeMap<String, String>,
    pub total_links: usize,
    #[serde(rename = "waktu_scraping")]
    pub scraped_at: DateTime<Utc>,
    pub keyword_analysis: KeywordCounts,
}

/// A scraped news site with content statistics
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsRecord {
    #[serde(rename = "media")]
    pub name: String,
    pub website: String,
    pub word_count: usize,
    pub char_count: usize,
    pub link_count: usize,
    pub image_count: usize,
    pub keyword_frequency: KeywordCounts,
    pub top_keyword: String,
    pub contact_info: ContactInfo,
    pub scraped_at: DateTime<Utc>,
}

/// One aggregated result, tagged by category
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CategoryRecord {
    School(SchoolRecord),
    Government(GovernmentRecord),
    News(NewsRecord),
}

impl CategoryRecord {
    pub fn category(&self) -> Category {
        match self {
            CategoryRecord::School(_) => Category::School,
            CategoryRecord::Government(_) => Category::Government,
            CategoryRecord::News(_) => Category::News,
        }
    }

    /// School, ministry or media name
    pub fn display_name(&self) -> &str {
        match self {
            CategoryRecord::School(r) => &r.name,
            CategoryRecord::Government(r) => &r.name,
            CategoryRecord::News(r) => &r.name,
        }
    }

    pub fn website(&self) -> &str {
        match self {
            CategoryRecord::School(r) => &r.website,
            CategoryRecord::Government(r) => &r.website,
            CategoryRecord::News(r) => &r.website,
        }
    }

    pub fn scraped_at(&self) -> DateTime<Utc> {
        match self {
            CategoryRecord::School(r) => r.scraped_at,
            CategoryRecord::Government(r) => r.scraped_at,
            CategoryRecord::News(r) => r.scraped_at,
        }
    }

    /// Site description; news records carry none
    pub fn description(&self) -> Option<&str> {
        match self {
            CategoryRecord::School(r) => Some(&r.description),
            CategoryRecord::Government(r) => Some(&r.description),
            CategoryRecord::News(_) => None,
        }
    }

    pub fn emails(&self) -> &BTreeSet<String> {
        match self {
            CategoryRecord::School(r) => &r.emails,
            CategoryRecord::Government(r) => &r.contact.emails,
            CategoryRecord::News(r) => &r.contact_info.emails,
        }
    }

    pub fn phones(&self) -> &BTreeSet<String> {
        match self {
            CategoryRecord::School(r) => &r.phones,
            CategoryRecord::Government(r) => &r.contact.phones,
            CategoryRecord::News(r) => &r.contact_info.phones,
        }
    }

    /// Links found on the site; school records do not track them
    pub fn link_count(&self) -> Option<usize> {
        match self {
            CategoryRecord::School(_) => None,
            CategoryRecord::Government(r) => Some(r.total_links),
            CategoryRecord::News(r) => Some(r.link_count),
        }
    }

    /// Pages visited; only school records track it
    pub fn page_count(&self) -> Option<u32> {
        match self {
            CategoryRecord::School(r) => Some(r.pages_scraped),
            CategoryRecord::Government(_) | CategoryRecord::News(_) => None,
        }
    }

    /// Words of content; only news records track it
    pub fn word_count(&self) -> Option<usize> {
        match self {
            CategoryRecord::News(r) => Some(r.word_count),
            CategoryRecord::School(_) | CategoryRecord::Government(_) => None,
        }
    }
}
