//! CLI entry point for blogkit

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "blogkit")]
#[command(version)]
#[command(about = "Slug, post-metadata and image helpers for a content-driven blog", long_about = None)]
struct Cli {
    /// Set the base directory (defaults to current directory)
    #[arg(short, long, global = true)]
    cwd: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a slug derived from the title to every post that lacks one
    Slugs,

    /// List site information
    List {
        /// Type of content to list (post, tag, author)
        #[arg(default_value = "post")]
        r#type: String,

        /// Include draft posts
        #[arg(long)]
        drafts: bool,
    },

    /// Check that images exist (defaults to every post's cover image)
    #[command(alias = "check")]
    CheckImage {
        /// Image paths such as /images/cover.png
        paths: Vec<String>,

        /// Ask the deployed site instead of the public directory
        #[arg(short, long)]
        remote: bool,
    },

    /// Create a new post
    New {
        /// Title of the new post
        title: String,

        /// Slug to use instead of the one derived from the title
        #[arg(short, long)]
        slug: Option<String>,
    },

    /// Display version information
    Version,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.debug {
        "blogkit=debug,info"
    } else {
        "blogkit=info"
    };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Determine base directory
    let base_dir = match cli.cwd {
        Some(dir) => dir,
        None => std::env::current_dir()?,
    };

    match cli.command {
        Commands::Slugs => {
            let blog = blogkit::Blog::new(&base_dir)?;
            blog.backfill_slugs()?;
        }

        Commands::List { r#type, drafts } => {
            let blog = blogkit::Blog::new(&base_dir)?;
            blogkit::commands::list::run(&blog, &r#type, drafts)?;
        }

        Commands::CheckImage { paths, remote } => {
            let blog = blogkit::Blog::new(&base_dir)?;
            let missing = blogkit::commands::check::run(&blog, &paths, remote).await?;
            if !missing.is_empty() {
                anyhow::bail!("{} images missing", missing.len());
            }
        }

        Commands::New { title, slug } => {
            let blog = blogkit::Blog::new(&base_dir)?;
            tracing::info!("Creating new post with title: {}", title);
            blogkit::commands::new::create_post(&blog, &title, slug.as_deref())?;
        }

        Commands::Version => {
            println!("blogkit version {}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
