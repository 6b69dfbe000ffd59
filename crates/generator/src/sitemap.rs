use crate::template::html_escape;
use chrono::{DateTime, Utc};
use jobspot_core::{Article, JobPosting, to_iso8601};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
}

impl fmt::Display for ChangeFreq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChangeFreq::Daily => write!(f, "daily"),
            ChangeFreq::Weekly => write!(f, "weekly"),
        }
    }
}

/// One `<url>` element
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: DateTime<Utc>,
    pub changefreq: ChangeFreq,
    pub priority: f32,
}

/// Home and articles index first, then every job, then every article.
///
/// The two index pages take `now` as their lastmod; detail pages use the
/// entity's own date.
pub fn sitemap_entries(
    base_url: &str,
    jobs: &[JobPosting],
    articles: &[Article],
    now: DateTime<Utc>,
) -> Vec<SitemapEntry> {
    let mut entries = vec![
        SitemapEntry {
            loc: base_url.to_string(),
            lastmod: now,
            changefreq: ChangeFreq::Daily,
            priority: 1.0,
        },
        SitemapEntry {
            loc: format!("{}/articles", base_url),
            lastmod: now,
            changefreq: ChangeFreq::Daily,
            priority: 0.8,
        },
    ];

    entries.extend(jobs.iter().map(|job| SitemapEntry {
        loc: format!("{}{}", base_url, job.path()),
        lastmod: job.posted_date,
        changefreq: ChangeFreq::Weekly,
        priority: 1.0,
    }));

    entries.extend(articles.iter().map(|article| SitemapEntry {
        loc: format!("{}{}", base_url, article.path()),
        lastmod: article.publish_date,
        changefreq: ChangeFreq::Weekly,
        priority: 0.8,
    }));

    entries
}

pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let urls: String = entries
        .iter()
        .map(|entry| {
            format!(
                "  <url>\n    <loc>{}</loc>\n    <lastmod>{}</lastmod>\n    <changefreq>{}</changefreq>\n    <priority>{:.1}</priority>\n  </url>\n",
                html_escape(&entry.loc),
                to_iso8601(&entry.lastmod),
                entry.changefreq,
                entry.priority
            )
        })
        .collect();

    format!(
        "<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">\n{}</urlset>\n",
        urls
    )
}

/// Full sitemap document for the site
pub fn generate_sitemap(
    base_url: &str,
    jobs: &[JobPosting],
    articles: &[Article],
    now: DateTime<Utc>,
) -> String {
    render_sitemap(&sitemap_entries(base_url, jobs, articles, now))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const BASE: &str = "https://www.ai-job-spot.com";

    fn job(id: &str, day: u32) -> JobPosting {
        JobPosting {
            id: id.to_string(),
            title: "Robotics Engineer".to_string(),
            company: "Boston Dynamics".to_string(),
            description: "<p>Robots</p>".to_string(),
            location: "Waltham, MA".to_string(),
            salary_range: None,
            posted_date: Utc.with_ymd_and_hms(2025, 6, day, 16, 0, 0).unwrap(),
            application_link: "https://www.bostondynamics.com/careers/12349".to_string(),
            tags: vec![],
        }
    }

    fn article(slug: &str) -> Article {
        Article {
            id: "a1".to_string(),
            slug: slug.to_string(),
            title: "T".to_string(),
            author: "A".to_string(),
            publish_date: Utc.with_ymd_and_hms(2025, 7, 3, 8, 0, 0).unwrap(),
            content: "<p>c</p>".to_string(),
            image_url: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, 4, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_entries_order_and_attributes() {
        let entries = sitemap_entries(BASE, &[job("j1", 18)], &[article("the-rise")], now());

        assert_eq!(entries.len(), 4);
        assert_eq!(entries[0].loc, BASE);
        assert_eq!(entries[0].changefreq, ChangeFreq::Daily);
        assert_eq!(entries[0].lastmod, now());
        assert_eq!(entries[1].loc, "https://www.ai-job-spot.com/articles");
        assert_eq!(entries[1].priority, 0.8);

        assert_eq!(entries[2].loc, "https://www.ai-job-spot.com/jobs/j1");
        assert_eq!(entries[2].changefreq, ChangeFreq::Weekly);
        assert_eq!(entries[2].priority, 1.0);
        assert_eq!(entries[2].lastmod, Utc.with_ymd_and_hms(2025, 6, 18, 16, 0, 0).unwrap());

        assert_eq!(entries[3].loc, "https://www.ai-job-spot.com/articles/the-rise");
        assert_eq!(entries[3].priority, 0.8);
    }

    #[test]
    fn test_render_xml() {
        let xml = generate_sitemap(BASE, &[job("j1", 18)], &[], now());

        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<urlset xmlns=\"http://www.sitemaps.org/schemas/sitemap/0.9\">"));
        assert!(xml.contains("<loc>https://www.ai-job-spot.com/jobs/j1</loc>"));
        assert!(xml.contains("<lastmod>2025-06-18T16:00:00.000Z</lastmod>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
        assert!(xml.contains("<priority>1.0</priority>"));
        assert!(xml.contains("<priority>0.8</priority>"));
        assert_eq!(xml.matches("<url>").count(), 3);
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn test_empty_store_keeps_static_entries() {
        let xml = generate_sitemap(BASE, &[], &[], now());
        assert_eq!(xml.matches("<url>").count(), 2);
        assert!(xml.contains("<lastmod>2025-07-04T12:00:00.000Z</lastmod>"));
    }

    #[test]
    fn test_loc_is_escaped() {
        let xml = generate_sitemap("https://example.com", &[job("a&b", 1)], &[], now());
        assert!(xml.contains("<loc>https://example.com/jobs/a&amp;b</loc>"));
    }
}
