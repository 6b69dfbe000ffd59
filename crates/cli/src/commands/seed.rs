use anyhow::{Context, Result};
use jobspot_core::{SiteConfig, parse_seed_toml};
use jobspot_store::FirestoreClient;
use jobspot_store::seed::seed_store;
use std::path::PathBuf;

/// Add every job and article of a seed file to Firestore
pub async fn run(site: SiteConfig, path: PathBuf) -> Result<()> {
    println!("🌱 Seeding Firestore from {}...", path.display());

    let seed = parse_seed_toml(&path)
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    println!("✓ Loaded {} jobs and {} articles", seed.jobs.len(), seed.articles.len());

    let config = site
        .firestore
        .as_ref()
        .context("FIRESTORE_PROJECT_ID is not set\nSet it in the environment or .env before seeding")?;
    let client = FirestoreClient::new(config).context("Failed to create Firestore client")?;

    let report = seed_store(&client, &seed).await;

    println!();
    println!("   Jobs added:     {}", report.jobs_added);
    println!("   Articles added: {}", report.articles_added);

    if !report.is_clean() {
        println!();
        for failure in &report.failures {
            eprintln!("   ✗ {}", failure);
        }
        anyhow::bail!("{} entries could not be added", report.failures.len());
    }

    println!();
    println!("✅ Seeding complete!");
    Ok(())
}
