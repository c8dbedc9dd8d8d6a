//! mdepub CLI - build EPUB archives from markdown project directories

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mdepub")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build an EPUB from a project directory
    Build {
        /// Project directory containing markdown chapters and an images/ subdirectory
        project_dir: String,

        /// Directory the finished .epub is written to
        #[arg(short, long, default_value = ".")]
        output_dir: String,

        /// Override the book title
        #[arg(long)]
        title: Option<String>,

        /// Override the author(s)
        #[arg(long)]
        author: Option<String>,

        /// Cover image filename (must exist in the images directory)
        #[arg(long)]
        cover: Option<String>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose {
        "mdepub_cli=debug,mdepub_core=debug"
    } else {
        "mdepub_cli=info,mdepub_core=warn"
    };

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(filter))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::Build {
            project_dir,
            output_dir,
            title,
            author,
            cover,
        } => commands::build(&project_dir, &output_dir, title, author, cover),
    }
}
