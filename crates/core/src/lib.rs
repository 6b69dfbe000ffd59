pub mod config;
pub mod error;
pub mod seed;
pub mod types;

pub use config::{AdsConfig, FirestoreConfig, SiteConfig};
pub use error::{Error, Result};
pub use seed::{ArticleSeed, JobSeed, SeedData, parse_seed_toml, parse_seed_toml_str};
pub use types::*;
