mod commands;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{Shell, generate};
use jobspot_core::SiteConfig;
use std::io;
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "jobspot")]
#[command(version, about = "Job board and articles site backed by Firestore", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// Serve the site with stale-while-revalidate page caching
    Serve {
        /// Port to listen on (overrides PORT)
        #[arg(short, long)]
        port: Option<u16>,

        /// Serve from a seed file held in memory instead of Firestore
        #[arg(long)]
        fixture: Option<PathBuf>,
    },

    /// Render every page to a directory of static files
    Build {
        /// Output directory for the generated site
        #[arg(short, long)]
        output: PathBuf,

        /// Build from a seed file instead of Firestore
        #[arg(long)]
        fixture: Option<PathBuf>,
    },

    /// Write sitemap.xml for the current content
    Sitemap {
        /// Where to write the sitemap
        #[arg(short, long, default_value = "sitemap.xml")]
        output: PathBuf,

        /// Read content from a seed file instead of Firestore
        #[arg(long)]
        fixture: Option<PathBuf>,
    },

    /// Add every entry of a seed file to Firestore
    Seed {
        /// Path to the seed file
        path: PathBuf,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Command::Completions { shell } = cli.command {
        let mut cmd = Cli::command();
        generate(shell, &mut cmd, "jobspot", &mut io::stdout());
        return Ok(());
    }

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,jobspot=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let site = SiteConfig::from_env().context("Failed to load configuration")?;

    match cli.command {
        Command::Serve { port, fixture } => commands::serve::run(site, port, fixture).await,
        Command::Build { output, fixture } => commands::build::run(site, output, fixture).await,
        Command::Sitemap { output, fixture } => {
            commands::sitemap::run(site, output, fixture).await
        }
        Command::Seed { path } => commands::seed::run(site, path).await,
        Command::Completions { .. } => Ok(()),
    }
}
