use crate::ContentWriter;
use crate::document::{Fields, Value};
use crate::retrieval::{ARTICLES, JOBS, POSTED_DATE, PUBLISH_DATE};
use jobspot_core::{ArticleSeed, JobSeed, SeedData};

/// Outcome of a seeding run
#[derive(Debug, Default)]
pub struct SeedReport {
    pub jobs_added: usize,
    pub articles_added: usize,
    /// One line per entry that could not be written
    pub failures: Vec<String>,
}

impl SeedReport {
    pub fn is_clean(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Store fields for a job, using the collection's camelCase field names
pub fn job_fields(job: &JobSeed) -> Fields {
    let mut fields = Fields::new();
    fields.insert("title".into(), job.title.as_str().into());
    fields.insert("company".into(), job.company.as_str().into());
    fields.insert("description".into(), job.description.as_str().into());
    fields.insert("location".into(), job.location.as_str().into());
    if let Some(salary) = &job.salary_range {
        fields.insert("salaryRange".into(), salary.as_str().into());
    }
    fields.insert(POSTED_DATE.into(), Value::Timestamp(job.posted_date));
    fields.insert("applicationLink".into(), job.application_link.as_str().into());
    fields.insert(
        "tags".into(),
        Value::Array(job.tags.iter().map(|t| t.as_str().into()).collect()),
    );
    fields
}

/// Store fields for an article
pub fn article_fields(article: &ArticleSeed) -> Fields {
    let mut fields = Fields::new();
    fields.insert("slug".into(), article.slug.as_str().into());
    fields.insert("title".into(), article.title.as_str().into());
    fields.insert("author".into(), article.author.as_str().into());
    fields.insert(PUBLISH_DATE.into(), Value::Timestamp(article.publish_date));
    fields.insert("content".into(), article.content.as_str().into());
    if let Some(image) = &article.image_url {
        fields.insert("imageUrl".into(), image.as_str().into());
    }
    fields
}

/// Write every seed entry as a new document.
///
/// A failed entry is logged and recorded in the report; the run carries on
/// with the next one.
pub async fn seed_store(writer: &dyn ContentWriter, seed: &SeedData) -> SeedReport {
    let mut report = SeedReport::default();

    for job in &seed.jobs {
        match writer.add_document(JOBS, job_fields(job)).await {
            Ok(id) => {
                tracing::info!(%id, title = %job.title, company = %job.company, "added job");
                report.jobs_added += 1;
            }
            Err(e) => {
                tracing::error!(title = %job.title, error = %e, "failed to add job");
                report
                    .failures
                    .push(format!("job '{}' at {}: {}", job.title, job.company, e));
            }
        }
    }

    for article in &seed.articles {
        match writer.add_document(ARTICLES, article_fields(article)).await {
            Ok(id) => {
                tracing::info!(%id, slug = %article.slug, "added article");
                report.articles_added += 1;
            }
            Err(e) => {
                tracing::error!(slug = %article.slug, error = %e, "failed to add article");
                report
                    .failures
                    .push(format!("article '{}': {}", article.title, e));
            }
        }
    }

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, StoreError};
    use crate::memory::MemoryStore;
    use crate::retrieval::{get_article_by_slug, list_jobs};
    use async_trait::async_trait;
    use chrono::{TimeZone, Utc};

    fn sample_seed() -> SeedData {
        SeedData {
            jobs: vec![
                JobSeed {
                    title: "Machine Learning Engineer".into(),
                    company: "OpenAI".into(),
                    description: "<p>Build</p>".into(),
                    location: "San Francisco, CA".into(),
                    salary_range: None,
                    posted_date: Utc.with_ymd_and_hms(2025, 6, 28, 14, 30, 0).unwrap(),
                    application_link: "https://openai.com/careers/12346".into(),
                    tags: vec!["ML".into(), "Deep Learning".into()],
                },
                JobSeed {
                    title: "AI Research Scientist".into(),
                    company: "Google".into(),
                    description: "<p>Research</p>".into(),
                    location: "Mountain View, CA".into(),
                    salary_range: Some("$150,000 - $250,000".into()),
                    posted_date: Utc.with_ymd_and_hms(2025, 7, 1, 10, 0, 0).unwrap(),
                    application_link: "https://careers.google.com/jobs/results/12345/".into(),
                    tags: vec!["AI".into()],
                },
            ],
            articles: vec![ArticleSeed {
                slug: "the-rise-of-generative-ai".into(),
                title: "The Rise of Generative AI".into(),
                author: "AI Job Spot Team".into(),
                publish_date: Utc.with_ymd_and_hms(2025, 7, 3, 8, 0, 0).unwrap(),
                content: "<p>Generative AI</p>".into(),
                image_url: Some("/images/generative-ai.jpg".into()),
            }],
        }
    }

    struct RejectingWriter;

    #[async_trait]
    impl ContentWriter for RejectingWriter {
        async fn add_document(&self, collection: &str, _: Fields) -> Result<String> {
            if collection == JOBS {
                return Err(StoreError::Backend {
                    status: 403,
                    message: "Missing or insufficient permissions.".into(),
                });
            }
            Ok("ok".into())
        }
    }

    #[tokio::test]
    async fn test_seeded_documents_read_back() {
        let store = MemoryStore::new();
        let report = seed_store(&store, &sample_seed()).await;

        assert!(report.is_clean());
        assert_eq!(report.jobs_added, 2);
        assert_eq!(report.articles_added, 1);

        let jobs = list_jobs(&store).await.unwrap();
        assert_eq!(jobs[0].title, "AI Research Scientist");
        assert_eq!(jobs[0].salary_range.as_deref(), Some("$150,000 - $250,000"));
        assert_eq!(jobs[1].tags, vec!["ML", "Deep Learning"]);

        let article = get_article_by_slug(&store, "the-rise-of-generative-ai")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(article.image_url.as_deref(), Some("/images/generative-ai.jpg"));
    }

    #[tokio::test]
    async fn test_failures_do_not_stop_the_run() {
        let report = seed_store(&RejectingWriter, &sample_seed()).await;

        assert_eq!(report.jobs_added, 0);
        assert_eq!(report.articles_added, 1);
        assert_eq!(report.failures.len(), 2);
        assert!(report.failures[0].contains("Machine Learning Engineer"));
        assert!(!report.is_clean());
    }

    #[test]
    fn test_from_seed_matches_seed_store() {
        let store = MemoryStore::from_seed(&sample_seed());
        assert_eq!(store.len(JOBS), 2);
        assert_eq!(store.len(ARTICLES), 1);
    }

    #[test]
    fn test_optional_fields_omitted() {
        let seed = sample_seed();
        let fields = job_fields(&seed.jobs[0]);
        assert!(!fields.contains_key("salaryRange"));
        assert_eq!(
            fields.get("tags"),
            Some(&Value::Array(vec!["ML".into(), "Deep Learning".into()]))
        );
    }
}
