use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// A job listing from the `jobs` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JobPosting {
    pub id: String,
    pub title: String,
    pub company: String,
    /// Rich text, rendered as raw markup
    pub description: String,
    pub location: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub salary_range: Option<String>,
    pub posted_date: DateTime<Utc>,
    pub application_link: String,
    pub tags: Vec<String>,
}

impl JobPosting {
    /// Site path of the job detail page
    pub fn path(&self) -> String {
        format!("/jobs/{}", self.id)
    }
}

/// An article from the `articles` collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Article {
    pub id: String,
    /// Routing key; equals `id` when the stored document has none
    pub slug: String,
    pub title: String,
    pub author: String,
    pub publish_date: DateTime<Utc>,
    /// Rich text, rendered as raw markup
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

impl Article {
    /// Site path of the article detail page
    pub fn path(&self) -> String {
        format!("/articles/{}", self.slug)
    }

    /// Plain-text teaser for listing pages
    pub fn excerpt(&self, max_chars: usize) -> String {
        excerpt(&self.content, max_chars)
    }
}

/// Serialize an instant the way the sitemap and JSON payloads expect it
/// (`2025-07-01T10:00:00.000Z`)
pub fn to_iso8601(instant: &DateTime<Utc>) -> String {
    instant.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Human-readable calendar date, e.g. "July 1, 2025"
pub fn format_display_date(instant: &DateTime<Utc>) -> String {
    instant.format("%B %-d, %Y").to_string()
}

/// Strip markup from rich text and cut it to `max_chars` characters.
///
/// Whitespace runs collapse to a single space. An ellipsis is appended only
/// when the text was actually shortened.
pub fn excerpt(markup: &str, max_chars: usize) -> String {
    let mut text = String::with_capacity(markup.len());
    let mut in_tag = false;
    let mut pending_space = false;

    for c in markup.chars() {
        match c {
            '<' => {
                in_tag = true;
                pending_space = true;
            }
            '>' if in_tag => in_tag = false,
            _ if in_tag => {}
            c if c.is_whitespace() => pending_space = true,
            c => {
                if pending_space && !text.is_empty() {
                    text.push(' ');
                }
                pending_space = false;
                text.push(c);
            }
        }
    }

    if text.chars().count() <= max_chars {
        return text;
    }

    let cut: String = text.chars().take(max_chars).collect();
    format!("{}...", cut.trim_end())
}
