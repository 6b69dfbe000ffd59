//! Stale-while-revalidate page cache.
//!
//! Each route's output moves through three states:
//!
//! - fresh: younger than the route's window, served as is
//! - stale: older than the window, still served while one background
//!   regeneration runs
//! - regenerating: at most one regeneration per route is in flight; when it
//!   fails the previous output stays in place and the next stale request
//!   tries again
//!
//! Not-found pages are never stored, so content published later shows up on
//! the next request.

use crate::pages::{self, RenderedPage, Route};
use jobspot_core::SiteConfig;
use jobspot_store::ContentStore;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, PoisonError};
use tokio::time::Instant;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    /// Served from a fresh entry
    Hit,
    /// Served from an expired entry; a regeneration was started or is running
    Stale,
    /// Rendered for this request
    Miss,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "hit",
            CacheStatus::Stale => "stale",
            CacheStatus::Miss => "miss",
        }
    }
}

impl fmt::Display for CacheStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

struct Entry {
    page: Arc<RenderedPage>,
    rendered_at: Instant,
    regenerating: bool,
}

type Entries = Arc<Mutex<HashMap<Route, Entry>>>;

/// Rendered pages keyed by route, shared across request handlers
#[derive(Clone)]
pub struct PageCache {
    store: Arc<dyn ContentStore>,
    site: Arc<SiteConfig>,
    entries: Entries,
}

impl PageCache {
    pub fn new(store: Arc<dyn ContentStore>, site: Arc<SiteConfig>) -> Self {
        Self {
            store,
            site,
            entries: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Output for a route, rendering or scheduling regeneration as needed
    pub async fn serve(&self, route: Route) -> (Arc<RenderedPage>, CacheStatus) {
        if let Some(served) = self.lookup(&route) {
            return served;
        }

        match pages::render(&route, self.store.as_ref(), &self.site).await {
            Ok(page) => {
                let page = Arc::new(page);
                if !page.is_not_found() {
                    lock(&self.entries).insert(
                        route,
                        Entry {
                            page: Arc::clone(&page),
                            rendered_at: Instant::now(),
                            regenerating: false,
                        },
                    );
                }
                (page, CacheStatus::Miss)
            }
            Err(e) => {
                tracing::error!(path = %route.path(), error = %e, "render failed, serving fallback");
                (
                    Arc::new(pages::fallback(&route, &self.site)),
                    CacheStatus::Miss,
                )
            }
        }
    }

    /// Number of stored pages
    pub fn len(&self) -> usize {
        lock(&self.entries).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lookup(&self, route: &Route) -> Option<(Arc<RenderedPage>, CacheStatus)> {
        let mut entries = lock(&self.entries);
        let entry = entries.get_mut(route)?;

        if entry.rendered_at.elapsed() < route.revalidate() {
            return Some((Arc::clone(&entry.page), CacheStatus::Hit));
        }

        if !entry.regenerating {
            entry.regenerating = true;
            self.spawn_regeneration(route.clone());
        }

        Some((Arc::clone(&entry.page), CacheStatus::Stale))
    }

    fn spawn_regeneration(&self, route: Route) {
        let store = Arc::clone(&self.store);
        let site = Arc::clone(&self.site);
        let entries = Arc::clone(&self.entries);

        tokio::spawn(async move {
            tracing::debug!(path = %route.path(), "regenerating");
            let result = pages::render(&route, store.as_ref(), &site).await;

            let mut entries = lock(&entries);
            match result {
                Ok(page) if page.is_not_found() => {
                    tracing::info!(path = %route.path(), "page no longer exists, dropping cached output");
                    entries.remove(&route);
                }
                Ok(page) => {
                    entries.insert(
                        route,
                        Entry {
                            page: Arc::new(page),
                            rendered_at: Instant::now(),
                            regenerating: false,
                        },
                    );
                }
                Err(e) => {
                    tracing::error!(path = %route.path(), error = %e, "regeneration failed, keeping previous output");
                    if let Some(entry) = entries.get_mut(&route) {
                        entry.regenerating = false;
                    }
                }
            }
        });
    }
}

fn lock(entries: &Entries) -> std::sync::MutexGuard<'_, HashMap<Route, Entry>> {
    entries.lock().unwrap_or_else(PoisonError::into_inner)
}
