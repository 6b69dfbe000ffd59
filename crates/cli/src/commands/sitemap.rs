use anyhow::{Context, Result};
use chrono::Utc;
use jobspot_core::SiteConfig;
use jobspot_generator::generate_sitemap;
use jobspot_store::{ContentStore, list_articles, list_jobs};
use std::fs;
use std::path::{Path, PathBuf};

/// Read both collections and write `sitemap.xml`
pub async fn run(site: SiteConfig, output: PathBuf, fixture: Option<PathBuf>) -> Result<()> {
    println!("🗺  Generating sitemap for {}...", site.base_url);

    let store = super::open_store(&site, fixture.as_deref())?;
    let entries = write_sitemap(store.as_ref(), &site.base_url, &output).await?;

    println!("✅ Wrote {} URLs to {}", entries, output.display());
    Ok(())
}

/// Write the sitemap and return the number of `<url>` entries
pub async fn write_sitemap(store: &dyn ContentStore, base_url: &str, output: &Path) -> Result<usize> {
    let jobs = list_jobs(store).await.context("Failed to list jobs")?;
    let articles = list_articles(store).await.context("Failed to list articles")?;

    let xml = generate_sitemap(base_url, &jobs, &articles, Utc::now());

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(output, xml).with_context(|| format!("Failed to write {}", output.display()))?;

    Ok(2 + jobs.len() + articles.len())
}
