use crate::report::records::{
    CategoryRecord, GovernmentRecord, KeywordCounts, NewsRecord, SchoolRecord,
};
use crate::report::Category;
use crate::scrape::ScrapedPage;

/// Keywords counted on government portals
pub const GOVERNMENT_KEYWORDS: [&str; 5] = [
    "pelayanan",
    "informasi",
    "berita",
    "pengumuman",
    "regulasi",
];

/// Keywords counted on news sites
pub const NEWS_KEYWORDS: [&str; 5] = [
    "politik",
    "ekonomi",
    "olahraga",
    "teknologi",
    "kesehatan",
];

/// Projects a successful scrape into the record for `category`
///
/// Pure: the same page, target and category always give the same record.
/// `website` is the requested target, not the URL the scraper ended on.
pub fn project(page: &ScrapedPage, target: &str, category: Category) -> CategoryRecord {
    match category {
        Category::School => CategoryRecord::School(SchoolRecord {
            name: page.title.clone(),
            website: target.to_string(),
            description: page.description.clone(),
            emails: page.contact_info.emails.clone(),
            phones: page.contact_info.phones.clone(),
            addresses: page.contact_info.addresses.clone(),
            pages_scraped: page.pages_scraped,
            scraped_at: page.timestamp,
        }),
        Category::Government => CategoryRecord::Government(GovernmentRecord {
            name: page.title.clone(),
            website: target.to_string(),
            domain: page.domain.clone(),
            description: page.description.clone(),
            contact: page.contact_info.clone(),
            metadata: page.metadata.clone(),
            total_links: page.links.len(),
            scraped_at: page.timestamp,
            keyword_analysis: KeywordCounts::count_in(&page.content, &GOVERNMENT_KEYWORDS),
        }),
        Category::News => {
            let keyword_frequency = KeywordCounts::count_in(&page.content, &NEWS_KEYWORDS);
            let top_keyword = keyword_frequency.top().unwrap_or_default().to_string();

            CategoryRecord::News(NewsRecord {
                name: page.title.clone(),
                website: target.to_string(),
                word_count: page.content.split_whitespace().count(),
                char_count: page.content.chars().count(),
                link_count: page.links.len(),
                image_count: page.images.len(),
                keyword_frequency,
                top_keyword,
                contact_info: page.contact_info.clone(),
                scraped_at: page.timestamp,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scrape::{Image, Link};

    fn sample_page() -> ScrapedPage {
        let mut page = ScrapedPage::new("https://www.kemkes.go.id/");
        page.title = "Kementerian Kesehatan".to_string();
        page.description = "Portal resmi".to_string();
        page.content = "Pelayanan kesehatan dan informasi. Pengumuman: informasi vaksin ekonomi".to_string();
        page.links = vec![
            Link {
                url: "https://www.kemkes.go.id/a".to_string(),
                text: "A".to_string(),
            },
            Link {
                url: "https://www.kemkes.go.id/b".to_string(),
                text: "B".to_string(),
            },
        ];
        page.images = vec![Image {
            src: "https://www.kemkes.go.id/logo.png".to_string(),
            alt: None,
        }];
        page.contact_info
            .emails
            .insert("kontak@kemkes.go.id".to_string());
        page.pages_scraped = 2;
        page
    }

    #[test]
    fn test_school_projection() {
        let page = sample_page();
        let record = project(&page, "https://target.sch.id/", Category::School);

        let CategoryRecord::School(school) = &record else {
            panic!("expected a school record");
        };
        assert_eq!(school.name, "Kementerian Kesehatan");
        assert_eq!(school.website, "https://target.sch.id/");
        assert_eq!(school.pages_scraped, 2);
        assert!(school.emails.contains("kontak@kemkes.go.id"));
        assert_eq!(record.link_count(), None);
    }

    #[test]
    fn test_government_keyword_analysis() {
        let record = project(&sample_page(), "https://www.kemkes.go.id/", Category::Government);

        let CategoryRecord::Government(gov) = &record else {
            panic!("expected a government record");
        };
        assert_eq!(gov.domain, "www.kemkes.go.id");
        assert_eq!(gov.total_links, 2);
        assert_eq!(gov.keyword_analysis.get("pelayanan"), Some(1));
        assert_eq!(gov.keyword_analysis.get("informasi"), Some(2));
        assert_eq!(gov.keyword_analysis.get("pengumuman"), Some(1));
        assert_eq!(gov.keyword_analysis.get("regulasi"), Some(0));
    }

    #[test]
    fn test_news_statistics() {
        let mut page = sample_page();
        page.content = "Ekonomi naik,  politik panas. Ekonomi é".to_string();
        let record = project(&page, "https://www.tempo.co/", Category::News);

        let CategoryRecord::News(news) = &record else {
            panic!("expected a news record");
        };
        assert_eq!(news.word_count, 6);
        assert_eq!(news.char_count, 39);
        assert_eq!(news.link_count, 2);
        assert_eq!(news.image_count, 1);
        assert_eq!(news.keyword_frequency.get("ekonomi"), Some(2));
        assert_eq!(news.top_keyword, "ekonomi");
        assert_eq!(record.description(), None);
    }

    #[test]
    fn test_news_top_keyword_tie_prefers_first() {
        let mut page = sample_page();
        page.content = "teknologi olahraga".to_string();
        let CategoryRecord::News(news) = project(&page, "https://www.detik.com/", Category::News)
        else {
            panic!("expected a news record");
        };
        assert_eq!(news.top_keyword, "olahraga");
    }

    #[test]
    fn test_projection_is_pure() {
        let page = sample_page();
        for category in Category::ALL {
            let first = project(&page, "https://x.go.id/", category);
            let second = project(&page, "https://x.go.id/", category);
            assert_eq!(first, second);
            assert_eq!(first.category(), category);
        }
    }
}
