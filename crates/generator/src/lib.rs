//! HTML and sitemap rendering for the job board, plus the page cache the
//! server puts in front of it.

pub mod ads;
pub mod cache;
pub mod pages;
pub mod sitemap;
pub mod template;

pub use cache::{CacheStatus, PageCache};
pub use pages::{PageStatus, RenderedPage, Route, fallback, render};
pub use sitemap::{SitemapEntry, generate_sitemap, sitemap_entries};
