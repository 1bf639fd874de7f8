//! CLI command definitions

use crate::domain::TagPolicy;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "ghost-migrate")]
#[command(about = "Migrate a Ghost blog export to WordPress or Write.as", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (default: $GHOST_MIGRATE_CONFIG if set)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Show debug output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List the posts of an export with their effective dates and tags
    Inspect {
        /// Ghost JSON export file
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Publish tags, posts, and pages to a WordPress XML-RPC endpoint
    Wordpress {
        /// Ghost JSON export file
        #[arg(short, long)]
        file: PathBuf,

        /// XML-RPC API endpoint (e.g., https://example.com/xmlrpc.php)
        #[arg(short, long)]
        endpoint: Option<String>,

        /// WordPress username
        #[arg(short, long)]
        username: Option<String>,

        /// WordPress password (prompted if not given)
        #[arg(short, long)]
        password: Option<String>,

        /// Blog id for multisite installs
        #[arg(long)]
        blog_id: Option<i64>,

        /// Tag handling
        #[arg(long, value_enum, ignore_case = true)]
        tag_policy: Option<TagPolicy>,
    },

    /// Convert posts to Markdown files and publish them to a Write.as publication
    Writeas {
        /// Ghost JSON export file
        #[arg(short, long)]
        file: PathBuf,

        /// Name of the Write.as publication (blog name)
        #[arg(short, long)]
        blog: Option<String>,

        /// Write.as username
        #[arg(short, long)]
        user: Option<String>,

        /// Write.as password (prompted if not given)
        #[arg(short, long)]
        password: Option<String>,

        /// Directory for the Markdown files (default: posts)
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Seconds to wait between posts (default: 10)
        #[arg(long)]
        delay: Option<u64>,

        /// Write.as API base URL (default: https://write.as)
        #[arg(long)]
        base_url: Option<String>,

        /// Write the Markdown files without contacting Write.as
        #[arg(long)]
        dry_run: bool,
    },
}
