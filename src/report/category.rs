//! Report categories
//!
//! Each category owns its file names and the Indonesian labels used in the
//! generated reports.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The kind of site a workflow scrapes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// School directories
    School,

    /// Government portals
    Government,

    /// News sites
    News,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::School, Category::Government, Category::News];

    /// Name embedded in the HTML report file name
    pub fn report_name(&self) -> &'static str {
        match self {
            Category::School => "sekolah",
            Category::Government => "pemerintah",
            Category::News => "berita",
        }
    }

    /// Base name of the JSON and CSV files
    pub fn file_stem(&self) -> &'static str {
        match self {
            Category::School => "sekolah_indonesia",
            Category::Government => "pemerintah_indonesia",
            Category::News => "analisis_berita",
        }
    }

    /// Heading used in console output and report titles
    pub fn heading(&self) -> &'static str {
        match self {
            Category::School => "Direktori Sekolah Indonesia",
            Category::Government => "Portal Pemerintah",
            Category::News => "Analisis Situs Berita",
        }
    }

    pub fn json_file_name(&self) -> String {
        format!("{}.json", self.file_stem())
    }

    pub fn csv_file_name(&self) -> String {
        format!("{}.csv", self.file_stem())
    }

    /// `laporan_<category>_<YYYYMMDD>.html`
    pub fn html_file_name(&self, date: NaiveDate) -> String {
        format!("laporan_{}_{}.html", self.report_name(), date.format("%Y%m%d"))
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Category::School => "school",
            Category::Government => "government",
            Category::News => "news",
        };
        write!(f, "{}", name)
    }
}
