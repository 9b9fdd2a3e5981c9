mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};
use define_remix_app::RoutingPattern;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "remix-routes")]
#[command(version, about = "Inspect, watch and edit the route tree of a Remix app", long_about = None)]
pub struct Cli {
    /// Project root (default: current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Configuration file (default: <project>/remix-routes.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Routing pattern for new pages: file, folder(route) or folder(index)
    #[arg(long, global = true)]
    pub pattern: Option<RoutingPattern>,

    /// Show debug logs
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the route manifest
    Manifest {
        /// Print JSON instead of a tree
        #[arg(long)]
        json: bool,
    },

    /// Print the route manifest every time it changes
    Watch {
        /// Print JSON instead of a tree
        #[arg(long)]
        json: bool,
    },

    /// Plan (and optionally create) a page for a URI such as `about/us` or `product/$id`
    NewPage {
        /// Readable URI of the page
        uri: String,

        /// Create the file
        #[arg(short, long)]
        write: bool,
    },

    /// Plan (and optionally perform) moving a route file to another URI
    MovePage {
        /// Route file to move
        file: PathBuf,

        /// Readable URI the file should serve
        uri: String,

        /// Move the file
        #[arg(short, long)]
        write: bool,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    // Parse CLI arguments
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    // Execute command
    runtime.block_on(async {
        match &cli.command {
            Commands::Manifest { json } => commands::manifest::execute(&cli, *json).await,
            Commands::Watch { json } => commands::watch::execute(&cli, *json).await,
            Commands::NewPage { uri, write } => commands::new_page::execute(&cli, uri, *write).await,
            Commands::MovePage { file, uri, write } => {
                commands::move_page::execute(&cli, file, uri, *write).await
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_new_page_with_global_flags() {
        let cli = Cli::try_parse_from([
            "remix-routes",
            "new-page",
            "about/us",
            "--write",
            "--pattern",
            "folder(route)",
        ])
        .unwrap();

        assert_eq!(cli.pattern, Some(RoutingPattern::FolderRoute));
        assert!(matches!(
            cli.command,
            Commands::NewPage { ref uri, write: true } if uri == "about/us"
        ));
    }
}
