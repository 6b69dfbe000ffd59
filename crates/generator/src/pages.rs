//! Page builders for every route the site serves.

use crate::sitemap::generate_sitemap;
use crate::template;
use chrono::Utc;
use jobspot_core::SiteConfig;
use jobspot_store::{ContentStore, StoreError, retrieval};
use sha2::{Digest, Sha256};
use std::time::Duration;

pub const JOB_PAGES_REVALIDATE: Duration = Duration::from_secs(60);
pub const ARTICLE_PAGES_REVALIDATE: Duration = Duration::from_secs(3600);
pub const SITEMAP_REVALIDATE: Duration = Duration::from_secs(3600);

/// A route of the site
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Route {
    /// `/`, the job listing
    Home,
    /// `/jobs/{id}`
    Job(String),
    /// `/articles`
    Articles,
    /// `/articles/{slug}`
    Article(String),
    /// `/sitemap.xml`
    Sitemap,
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Job(id) => format!("/jobs/{}", id),
            Route::Articles => "/articles".to_string(),
            Route::Article(slug) => format!("/articles/{}", slug),
            Route::Sitemap => "/sitemap.xml".to_string(),
        }
    }

    /// Staleness window: how long rendered output is served as fresh
    pub fn revalidate(&self) -> Duration {
        match self {
            Route::Home | Route::Job(_) => JOB_PAGES_REVALIDATE,
            Route::Articles | Route::Article(_) => ARTICLE_PAGES_REVALIDATE,
            Route::Sitemap => SITEMAP_REVALIDATE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageStatus {
    Ok,
    NotFound,
}

/// Rendered output of one route
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    pub status: PageStatus,
    pub content_type: &'static str,
    pub body: String,
    /// Quoted strong validator derived from the body
    pub etag: String,
}

impl RenderedPage {
    fn new(status: PageStatus, content_type: &'static str, body: String) -> Self {
        let etag = format!("\"{:x}\"", Sha256::digest(body.as_bytes()));
        Self {
            status,
            content_type,
            body,
            etag,
        }
    }

    pub fn html(body: String) -> Self {
        Self::new(PageStatus::Ok, "text/html; charset=utf-8", body)
    }

    pub fn not_found(body: String) -> Self {
        Self::new(PageStatus::NotFound, "text/html; charset=utf-8", body)
    }

    pub fn xml(body: String) -> Self {
        Self::new(PageStatus::Ok, "application/xml; charset=utf-8", body)
    }

    pub fn is_not_found(&self) -> bool {
        self.status == PageStatus::NotFound
    }
}

/// Render a route from the store.
///
/// A missing job or article is a successful render of the not-found page.
/// Store failures come back as errors so the caller can decide between
/// keeping older output and serving [`fallback`].
pub async fn render(
    route: &Route,
    store: &dyn ContentStore,
    site: &SiteConfig,
) -> Result<RenderedPage, StoreError> {
    let page = match route {
        Route::Home => {
            let jobs = retrieval::list_jobs(store).await?;
            RenderedPage::html(template::job_listing(site, &jobs))
        }
        Route::Job(id) => match retrieval::get_job_by_id(store, id).await? {
            Some(job) => RenderedPage::html(template::job_detail(site, &job)),
            None => job_not_found(site),
        },
        Route::Articles => {
            let articles = retrieval::list_articles(store).await?;
            RenderedPage::html(template::article_listing(site, &articles))
        }
        Route::Article(slug) => match retrieval::get_article_by_slug(store, slug).await? {
            Some(article) => RenderedPage::html(template::article_detail(site, &article)),
            None => article_not_found(site),
        },
        Route::Sitemap => {
            let jobs = retrieval::list_jobs(store).await?;
            let articles = retrieval::list_articles(store).await?;
            RenderedPage::xml(generate_sitemap(&site.base_url, &jobs, &articles, Utc::now()))
        }
    };

    Ok(page)
}

/// What a route shows when the store cannot be read and there is no
/// earlier output: listings render empty, detail pages render not-found.
pub fn fallback(route: &Route, site: &SiteConfig) -> RenderedPage {
    match route {
        Route::Home => RenderedPage::html(template::job_listing(site, &[])),
        Route::Job(_) => job_not_found(site),
        Route::Articles => RenderedPage::html(template::article_listing(site, &[])),
        Route::Article(_) => article_not_found(site),
        Route::Sitemap => RenderedPage::xml(generate_sitemap(&site.base_url, &[], &[], Utc::now())),
    }
}

fn job_not_found(site: &SiteConfig) -> RenderedPage {
    RenderedPage::not_found(template::not_found(site, "Job", "/", "Back to Jobs"))
}

fn article_not_found(site: &SiteConfig) -> RenderedPage {
    RenderedPage::not_found(template::not_found(
        site,
        "Article",
        "/articles",
        "Back to Articles",
    ))
}
