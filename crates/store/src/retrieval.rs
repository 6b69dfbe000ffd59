//! Typed reads over the `jobs` and `articles` collections.
//!
//! Every timestamp leaves this module as a UTC instant. A document whose
//! date field is missing gets the instant of the read instead; that keeps
//! pages rendering but hides bad seed data, so each substitution is logged
//! as a warning.

use crate::document::{Direction, Document, FieldError, Query, Value};
use crate::error::{Result, StoreError};
use crate::ContentStore;
use chrono::{DateTime, Utc};
use jobspot_core::{Article, JobPosting};

pub const JOBS: &str = "jobs";
pub const ARTICLES: &str = "articles";

pub const POSTED_DATE: &str = "postedDate";
pub const PUBLISH_DATE: &str = "publishDate";

/// All job postings, newest first
pub async fn list_jobs(store: &dyn ContentStore) -> Result<Vec<JobPosting>> {
    let query = Query::new().order_by(POSTED_DATE, Direction::Descending);
    let documents = store.run_query(JOBS, &query).await?;
    let now = Utc::now();

    let mut jobs = decode_all(JOBS, &documents, |doc| job_from_document(doc, now));
    // The store orders by raw field kind first; string and substituted
    // dates only sort correctly once normalized. Stable, so ties keep
    // store order.
    jobs.sort_by(|a, b| b.posted_date.cmp(&a.posted_date));
    Ok(jobs)
}

/// All articles, newest first
pub async fn list_articles(store: &dyn ContentStore) -> Result<Vec<Article>> {
    let query = Query::new().order_by(PUBLISH_DATE, Direction::Descending);
    let documents = store.run_query(ARTICLES, &query).await?;
    let now = Utc::now();

    let mut articles = decode_all(ARTICLES, &documents, |doc| {
        article_from_document(doc, now)
    });
    articles.sort_by(|a, b| b.publish_date.cmp(&a.publish_date));
    Ok(articles)
}

/// Look an article up by slug.
///
/// The query is limited to one result. Should two documents share a slug,
/// whichever the store returns first wins.
pub async fn get_article_by_slug(
    store: &dyn ContentStore,
    slug: &str,
) -> Result<Option<Article>> {
    let query = Query::new().where_eq("slug", slug).limit(1);
    let documents = store.run_query(ARTICLES, &query).await?;

    match documents.first() {
        Some(doc) => article_from_document(doc, Utc::now())
            .map(Some)
            .map_err(|source| malformed(ARTICLES, doc, source)),
        None => Ok(None),
    }
}

/// Point lookup of a job posting by document id
pub async fn get_job_by_id(store: &dyn ContentStore, id: &str) -> Result<Option<JobPosting>> {
    // A slash would address a subcollection instead of a document
    if id.is_empty() || id.contains('/') {
        return Ok(None);
    }

    match store.get_document(JOBS, id).await? {
        Some(doc) => job_from_document(&doc, Utc::now())
            .map(Some)
            .map_err(|source| malformed(JOBS, &doc, source)),
        None => Ok(None),
    }
}

fn malformed(collection: &str, doc: &Document, source: FieldError) -> StoreError {
    StoreError::Malformed {
        collection: collection.to_string(),
        id: doc.id.clone(),
        source,
    }
}

/// Decode a listing, skipping (and logging) documents that do not fit
fn decode_all<T, F>(collection: &str, documents: &[Document], decode: F) -> Vec<T>
where
    F: Fn(&Document) -> std::result::Result<T, FieldError>,
{
    documents
        .iter()
        .filter_map(|doc| match decode(doc) {
            Ok(record) => Some(record),
            Err(e) => {
                tracing::warn!(collection, id = %doc.id, error = %e, "skipping malformed document");
                None
            }
        })
        .collect()
}

/// Map a `jobs` document to a [`JobPosting`]
pub fn job_from_document(
    doc: &Document,
    now: DateTime<Utc>,
) -> std::result::Result<JobPosting, FieldError> {
    Ok(JobPosting {
        id: doc.id.clone(),
        title: doc.string("title")?,
        company: doc.string("company")?,
        description: doc.string("description")?,
        location: doc.string("location")?,
        salary_range: doc.optional_string("salaryRange")?.filter(|s| !s.is_empty()),
        posted_date: normalize_timestamp(JOBS, doc, POSTED_DATE, now),
        application_link: doc.string("applicationLink")?,
        tags: doc.string_array("tags")?,
    })
}

/// Map an `articles` document to an [`Article`]
pub fn article_from_document(
    doc: &Document,
    now: DateTime<Utc>,
) -> std::result::Result<Article, FieldError> {
    let slug = doc
        .optional_string("slug")?
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| doc.id.clone());

    // Older documents keep the body under `contentBody`
    let content = match doc.optional_string("content")? {
        Some(content) => content,
        None => doc
            .optional_string("contentBody")?
            .ok_or_else(|| FieldError::Missing("content".to_string()))?,
    };

    Ok(Article {
        id: doc.id.clone(),
        slug,
        title: doc.string("title")?,
        author: doc.string("author")?,
        publish_date: normalize_timestamp(ARTICLES, doc, PUBLISH_DATE, now),
        content,
        image_url: doc.optional_string("imageUrl")?.filter(|s| !s.is_empty()),
    })
}

/// Read a date field as a UTC instant, substituting `now` when it is absent
/// or unreadable.
///
/// Native timestamps and RFC 3339 strings are both accepted.
pub fn normalize_timestamp(
    collection: &str,
    doc: &Document,
    field: &str,
    now: DateTime<Utc>,
) -> DateTime<Utc> {
    let parsed = match doc.get(field) {
        Some(Value::Timestamp(instant)) => return *instant,
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|t| t.with_timezone(&Utc))
            .ok(),
        _ => None,
    };

    match parsed {
        Some(instant) => instant,
        None => {
            tracing::warn!(
                collection,
                id = %doc.id,
                field,
                found = doc.get(field).map_or("nothing", |v| v.kind()),
                "date field missing or unreadable, substituting the current time"
            );
            now
        }
    }
}
