use anyhow::{Context, Result};
use jobspot_core::SiteConfig;
use jobspot_generator::{RenderedPage, Route, render};
use jobspot_store::{ContentStore, list_articles, list_jobs};
use std::fs;
use std::path::{Component, Path, PathBuf};

/// Render every route to static files under `output`
pub async fn run(site: SiteConfig, output: PathBuf, fixture: Option<PathBuf>) -> Result<()> {
    println!("🔨 Building static site...");
    println!("   Output: {}", output.display());
    println!();

    let store = super::open_store(&site, fixture.as_deref())?;
    let written = build_site(store.as_ref(), &site, &output).await?;

    println!();
    println!("✅ Build complete!");
    println!("   {} files written to {}", written, output.display());
    println!();
    println!("To test locally:");
    println!("   cd {} && python3 -m http.server 8000", output.display());
    println!();

    Ok(())
}

/// Write the site and return the number of files written
pub async fn build_site(store: &dyn ContentStore, site: &SiteConfig, output: &Path) -> Result<usize> {
    fs::create_dir_all(output).context("Failed to create output directory")?;

    let jobs = list_jobs(store).await.context("Failed to list jobs")?;
    let articles = list_articles(store).await.context("Failed to list articles")?;
    println!("✓ Loaded {} jobs and {} articles", jobs.len(), articles.len());

    let mut routes = vec![Route::Home, Route::Articles, Route::Sitemap];
    routes.extend(jobs.iter().map(|job| Route::Job(job.id.clone())));
    routes.extend(articles.iter().map(|article| Route::Article(article.slug.clone())));

    println!("📄 Rendering {} pages...", routes.len());
    let mut written = 0;
    for route in &routes {
        let Some(path) = output_path(output, route) else {
            eprintln!("   ⚠ Warning: {} is not a safe file path, skipping", route.path());
            continue;
        };

        let page = render(route, store, site)
            .await
            .with_context(|| format!("Failed to render {}", route.path()))?;

        if page.is_not_found() {
            eprintln!("   ⚠ Warning: {} rendered as not found, skipping", route.path());
            continue;
        }

        write_page(&path, &page)?;
        written += 1;
    }
    println!("   ✓ Rendered {} pages", written);

    Ok(written)
}

/// `/articles/x` becomes `articles/x/index.html` so links resolve on a
/// plain static file server.
///
/// Ids and slugs come from the store unchecked; `None` when one would not
/// stay a single directory under `output`.
fn output_path(output: &Path, route: &Route) -> Option<PathBuf> {
    let segment = match route {
        Route::Job(id) => Some(id),
        Route::Article(slug) => Some(slug),
        Route::Home | Route::Articles | Route::Sitemap => None,
    };
    if let Some(segment) = segment
        && !is_plain_segment(segment)
    {
        return None;
    }

    Some(match route {
        Route::Sitemap => output.join("sitemap.xml"),
        _ => output
            .join(route.path().trim_start_matches('/'))
            .join("index.html"),
    })
}

fn is_plain_segment(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    let single = matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    );
    single && !segment.contains(['/', '\\'])
}

fn write_page(path: &Path, page: &RenderedPage) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create {}", parent.display()))?;
    }
    fs::write(path, &page.body).with_context(|| format!("Failed to write {}", path.display()))?;
    Ok(())
}
