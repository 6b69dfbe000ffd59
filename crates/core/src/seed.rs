use crate::error::{Error, Result};
use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Raw TOML seed file structure
#[derive(Debug, Deserialize)]
struct RawSeed {
    #[serde(default)]
    job: Vec<RawJob>,
    #[serde(default)]
    article: Vec<RawArticle>,
}

#[derive(Debug, Deserialize)]
struct RawJob {
    title: String,
    company: String,
    description: String,
    location: String,
    salary_range: Option<String>,
    posted_date: String, // RFC 3339 or YYYY-MM-DD
    application_link: String,
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct RawArticle {
    slug: String,
    title: String,
    author: String,
    publish_date: String, // RFC 3339 or YYYY-MM-DD
    content: String,
    image_url: Option<String>,
}

/// Validated contents of a seed file, ready to be written to the store
#[derive(Debug, Clone, PartialEq)]
pub struct SeedData {
    pub jobs: Vec<JobSeed>,
    pub articles: Vec<ArticleSeed>,
}

/// A job document before the store has assigned it an id
#[derive(Debug, Clone, PartialEq)]
pub struct JobSeed {
    pub title: String,
    pub company: String,
    pub description: String,
    pub location: String,
    pub salary_range: Option<String>,
    pub posted_date: DateTime<Utc>,
    pub application_link: String,
    pub tags: Vec<String>,
}

/// An article document before the store has assigned it an id
#[derive(Debug, Clone, PartialEq)]
pub struct ArticleSeed {
    pub slug: String,
    pub title: String,
    pub author: String,
    pub publish_date: DateTime<Utc>,
    pub content: String,
    pub image_url: Option<String>,
}

/// Parse a seed file from a path
pub fn parse_seed_toml<P: AsRef<Path>>(path: P) -> Result<SeedData> {
    let content = fs::read_to_string(path)?;
    parse_seed_toml_str(&content)
}

/// Parse a seed file from a string (useful for testing)
pub fn parse_seed_toml_str(content: &str) -> Result<SeedData> {
    let raw: RawSeed = toml::from_str(content)?;

    let jobs: Result<Vec<JobSeed>> = raw
        .job
        .into_iter()
        .enumerate()
        .map(|(i, j)| {
            let field = |name: &str| format!("job[{}].{}", i, name);

            Ok(JobSeed {
                title: require(j.title, &field("title"))?,
                company: require(j.company, &field("company"))?,
                description: require(j.description, &field("description"))?,
                location: require(j.location, &field("location"))?,
                salary_range: j.salary_range.filter(|s| !s.trim().is_empty()),
                posted_date: parse_date(&j.posted_date, &field("posted_date"))?,
                application_link: validate_link(&j.application_link, &field("application_link"))?,
                tags: j.tags,
            })
        })
        .collect();

    let mut seen_slugs = HashSet::new();
    let articles: Result<Vec<ArticleSeed>> = raw
        .article
        .into_iter()
        .enumerate()
        .map(|(i, a)| {
            let field = |name: &str| format!("article[{}].{}", i, name);

            let slug = validate_slug(&a.slug, &field("slug"))?;
            if !seen_slugs.insert(slug.clone()) {
                return Err(Error::SeedParse(format!(
                    "Duplicate slug '{}' in '{}'",
                    slug,
                    field("slug")
                )));
            }

            Ok(ArticleSeed {
                slug,
                title: require(a.title, &field("title"))?,
                author: require(a.author, &field("author"))?,
                publish_date: parse_date(&a.publish_date, &field("publish_date"))?,
                content: require(a.content, &field("content"))?,
                image_url: a.image_url.filter(|s| !s.trim().is_empty()),
            })
        })
        .collect();

    Ok(SeedData {
        jobs: jobs?,
        articles: articles?,
    })
}

fn require(value: String, field_name: &str) -> Result<String> {
    if value.trim().is_empty() {
        return Err(Error::SeedParse(format!("Empty value in '{}'", field_name)));
    }
    Ok(value)
}

/// Accept a full RFC 3339 instant or a bare date (taken as midnight UTC)
fn parse_date(s: &str, field_name: &str) -> Result<DateTime<Utc>> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(s) {
        return Ok(instant.with_timezone(&Utc));
    }

    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc())
        .ok_or_else(|| {
            Error::SeedParse(format!(
                "Invalid date '{}' in '{}', expected RFC 3339 or YYYY-MM-DD",
                s, field_name
            ))
        })
}

fn validate_link(link: &str, field_name: &str) -> Result<String> {
    let link = link.trim();
    let rest = link
        .strip_prefix("https://")
        .or_else(|| link.strip_prefix("http://"));

    match rest {
        Some(host) if !host.is_empty() => Ok(link.to_string()),
        _ => Err(Error::SeedParse(format!(
            "'{}' must be an absolute http(s) URL, got '{}'",
            field_name, link
        ))),
    }
}

/// Slugs are path segments: lowercase ASCII letters, digits and hyphens
fn validate_slug(slug: &str, field_name: &str) -> Result<String> {
    let valid = !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-');

    if !valid {
        return Err(Error::SeedParse(format!(
            "Invalid slug '{}' in '{}': use lowercase letters, digits and hyphens",
            slug, field_name
        )));
    }

    Ok(slug.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    const MINIMAL: &str = r##"
[[job]]
title = "AI Research Scientist"
company = "Google"
description = "<p>Research</p>"
location = "Mountain View, CA"
salary_range = "$150,000 - $250,000"
posted_date = "2025-07-01T10:00:00Z"
application_link = "https://careers.google.com/jobs/results/12345/"
tags = ["AI", "Research", "Full-time", "Machine Learning"]

[[job]]
title = "Machine Learning Engineer"
company = "OpenAI"
description = "<p>Build</p>"
location = "San Francisco, CA"
posted_date = "2025-06-28"
application_link = "https://openai.com/careers/12346"

[[article]]
slug = "the-rise-of-generative-ai"
title = "The Rise of Generative AI"
author = "AI Job Spot Team"
publish_date = "2025-07-03T08:00:00Z"
content = "<p>Generative AI</p>"
image_url = "/images/generative-ai.jpg"
"##;

    #[test]
    fn test_parse_minimal_seed() {
        let seed = parse_seed_toml_str(MINIMAL).unwrap();
        assert_eq!(seed.jobs.len(), 2);
        assert_eq!(seed.articles.len(), 1);

        let first = &seed.jobs[0];
        assert_eq!(first.company, "Google");
        assert_eq!(
            first.posted_date,
            Utc.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap()
        );
        assert_eq!(first.tags, vec!["AI", "Research", "Full-time", "Machine Learning"]);

        let second = &seed.jobs[1];
        assert!(second.salary_range.is_none());
        assert!(second.tags.is_empty());
        assert_eq!(
            second.posted_date,
            Utc.with_ymd_and_hms(2025, 6, 28, 0, 0, 0).unwrap()
        );

        assert_eq!(
            seed.articles[0].image_url.as_deref(),
            Some("/images/generative-ai.jpg")
        );
    }

    #[test]
    fn test_parse_empty_seed() {
        let seed = parse_seed_toml_str("").unwrap();
        assert!(seed.jobs.is_empty());
        assert!(seed.articles.is_empty());
    }

    #[test]
    fn test_parse_date_offsets_normalized_to_utc() {
        let date = parse_date("2025-07-01T02:00:00-08:00", "d").unwrap();
        assert_eq!(date, Utc.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap());
    }

    #[test]
    fn test_parse_date_rejects_garbage() {
        let result = parse_date("July 1st", "job[0].posted_date");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("job[0].posted_date"));
    }

    #[test]
    fn test_validate_link() {
        assert!(validate_link("https://openai.com/careers/1", "l").is_ok());
        assert!(validate_link("http://example.com", "l").is_ok());
        assert!(validate_link("openai.com/careers", "l").is_err());
        assert!(validate_link("https://", "l").is_err());
        assert!(validate_link("javascript:alert(1)", "l").is_err());
    }

    #[test]
    fn test_validate_slug() {
        assert!(validate_slug("ethical-considerations-in-ai", "s").is_ok());
        assert!(validate_slug("top-10-tips", "s").is_ok());
        assert!(validate_slug("", "s").is_err());
        assert!(validate_slug("Has Spaces", "s").is_err());
        assert!(validate_slug("../etc", "s").is_err());
        assert!(validate_slug("-leading", "s").is_err());
    }

    #[test]
    fn test_rejects_duplicate_slugs() {
        let toml = r##"
[[article]]
slug = "same"
title = "One"
author = "A"
publish_date = "2025-07-03"
content = "<p>1</p>"

[[article]]
slug = "same"
title = "Two"
author = "B"
publish_date = "2025-07-04"
content = "<p>2</p>"
"##;
        let result = parse_seed_toml_str(toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("Duplicate slug"));
    }

    #[test]
    fn test_rejects_empty_required_field() {
        let toml = r##"
[[job]]
title = "  "
company = "Google"
description = "<p>x</p>"
location = "Remote"
posted_date = "2025-07-01"
application_link = "https://example.com"
"##;
        let result = parse_seed_toml_str(toml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("job[0].title"));
    }

    #[test]
    fn test_rejects_missing_field() {
        let toml = r##"
[[job]]
title = "No company"
"##;
        assert!(parse_seed_toml_str(toml).is_err());
    }
}
