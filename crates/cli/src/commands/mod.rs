pub mod build;
pub mod seed;
pub mod serve;
pub mod sitemap;

use anyhow::{Context, Result};
use jobspot_core::{SiteConfig, parse_seed_toml};
use jobspot_store::{ContentStore, FirestoreClient, MemoryStore};
use std::path::Path;
use std::sync::Arc;

/// Pick the content source: a seed file loaded into memory when given,
/// otherwise the configured Firestore project.
pub fn open_store(site: &SiteConfig, fixture: Option<&Path>) -> Result<Arc<dyn ContentStore>> {
    if let Some(path) = fixture {
        let seed = parse_seed_toml(path)
            .with_context(|| format!("Failed to load fixture {}", path.display()))?;
        tracing::info!(
            path = %path.display(),
            jobs = seed.jobs.len(),
            articles = seed.articles.len(),
            "serving content from fixture"
        );
        return Ok(Arc::new(MemoryStore::from_seed(&seed)));
    }

    let config = site.firestore.as_ref().context(
        "FIRESTORE_PROJECT_ID is not set\nSet it in the environment or .env, or pass --fixture <seed.toml>",
    )?;
    let client = FirestoreClient::new(config).context("Failed to create Firestore client")?;
    tracing::info!(url = %client.documents_url(), "using Firestore");

    Ok(Arc::new(client))
}
