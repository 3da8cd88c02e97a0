//! Command-line front end.
//!
//! # Usage
//!
//! ```bash
//! # Show the gallery grid
//! gallery-export --shop shop.example.com --token $TOKEN list
//!
//! # Show decks as JSON
//! gallery-export list decks --json
//!
//! # Export gallery items 0 and 2 to a PDF
//! gallery-export export-pdf --select 0,2 --output-dir exports
//!
//! # Download every deck
//! gallery-export download-decks --all --dir decks
//! ```
//!
//! Credentials come from flags, `STOREFRONT_SHOP` / `STOREFRONT_TOKEN`, or
//! a config file.

use crate::app::GalleryApp;
use crate::config::{Config, ImageSource, LoadPolicy};
use crate::error::Result;
use crate::types::{DownloadOutcome, ExportOutcome, ViewKind};
use crate::view::ViewModel;
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Browse storefront gallery items and presentation decks, export selections
#[derive(Parser, Debug)]
#[command(name = "gallery-export")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Shop domain
    #[arg(long, global = true, env = "STOREFRONT_SHOP")]
    pub shop: Option<String>,

    /// Storefront access token
    #[arg(long, global = true, env = "STOREFRONT_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Full GraphQL endpoint URL, overriding the one derived from the shop
    #[arg(long, global = true, env = "STOREFRONT_ENDPOINT")]
    pub endpoint: Option<String>,

    /// How the gallery and deck fetches combine
    #[arg(long, global = true, value_enum)]
    pub policy: Option<PolicyArg>,

    /// Resolve gallery images through file references
    #[arg(long, global = true)]
    pub file_references: bool,

    /// Print controller events to stderr as JSON lines
    #[arg(long, global = true)]
    pub events: bool,

    /// Command to run
    #[command(subcommand)]
    pub command: Commands,
}

/// `--policy` values
#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum PolicyArg {
    /// Gallery must load; decks are optional
    BestEffort,
    /// Both must load
    AllOrNothing,
}

impl From<PolicyArg> for LoadPolicy {
    fn from(policy: PolicyArg) -> Self {
        match policy {
            PolicyArg::BestEffort => LoadPolicy::BestEffort,
            PolicyArg::AllOrNothing => LoadPolicy::AllOrNothing,
        }
    }
}

/// Which positions a command acts on
#[derive(clap::Args, Debug, Clone, PartialEq, Eq)]
pub struct SelectArgs {
    /// Comma-separated zero-based positions, as shown by `list`
    #[arg(long, value_delimiter = ',', conflicts_with = "all", required_unless_present = "all")]
    pub select: Vec<usize>,

    /// Select every record
    #[arg(long)]
    pub all: bool,
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Load records and print a grid
    List {
        /// Which view to print
        #[arg(default_value = "gallery")]
        view: ViewKind,

        /// Print the view model as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export selected gallery items as a PDF, one page each
    ExportPdf {
        /// Gallery or deck positions to act on
        #[command(flatten)]
        selection: SelectArgs,

        /// Output directory
        #[arg(short, long)]
        output_dir: Option<PathBuf>,

        /// Output file name
        #[arg(long)]
        file_name: Option<String>,

        /// Add a timestamp to the file name
        #[arg(long)]
        timestamped: bool,
    },

    /// Download selected presentation decks
    DownloadDecks {
        /// Gallery or deck positions to act on
        #[command(flatten)]
        selection: SelectArgs,

        /// Download directory
        #[arg(short, long)]
        dir: Option<PathBuf>,

        /// Delay step between downloads in milliseconds
        #[arg(long)]
        stagger_ms: Option<u64>,
    },
}

impl Cli {
    /// Configuration from the file (if any) with flag overrides applied
    pub fn resolve_config(&self) -> Result<Config> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(shop) = &self.shop {
            config.storefront.shop_domain = shop.clone();
        }
        if let Some(token) = &self.token {
            config.storefront.access_token = token.clone();
        }
        if let Some(endpoint) = &self.endpoint {
            config.storefront.endpoint = Some(endpoint.clone());
        }
        if let Some(policy) = self.policy {
            config.load_policy = policy.into();
        }
        if self.file_references {
            config.gallery.image_source = ImageSource::FileReference;
        }

        match &self.command {
            Commands::List { .. } => {}
            Commands::ExportPdf {
                output_dir,
                file_name,
                timestamped,
                ..
            } => {
                if let Some(dir) = output_dir {
                    config.export.output_dir = dir.clone();
                }
                if let Some(name) = file_name {
                    config.export.file_name = name.clone();
                }
                config.export.timestamped |= *timestamped;
            }
            Commands::DownloadDecks { dir, stagger_ms, .. } => {
                if let Some(dir) = dir {
                    config.download.download_dir = dir.clone();
                }
                if let Some(ms) = stagger_ms {
                    config.download.stagger = Duration::from_millis(*ms);
                }
            }
        }

        Ok(config)
    }
}

/// Run one command against a freshly loaded controller
pub async fn run(cli: Cli) -> Result<()> {
    let config = cli.resolve_config()?;
    let app = GalleryApp::new(config)?;

    if cli.events {
        let mut events = app.subscribe();
        tokio::spawn(async move {
            while let Ok(event) = events.recv().await {
                if let Ok(line) = serde_json::to_string(&event) {
                    eprintln!("{line}");
                }
            }
        });
    }

    app.load().await?;

    match cli.command {
        Commands::List { view, json } => {
            let model = app.render_view(view).await;
            if json {
                println!("{}", serde_json::to_string_pretty(&model)?);
            } else {
                print_view(&model);
            }
        }
        Commands::ExportPdf { selection, .. } => {
            select(&app, ViewKind::Gallery, &selection).await?;
            if let ExportOutcome::Pdf(report) = app.export().await? {
                println!("Wrote {} ({} pages)", report.path.display(), report.pages);
                for id in &report.skipped_images {
                    println!("  image skipped for {id}");
                }
            }
        }
        Commands::DownloadDecks { selection, .. } => {
            select(&app, ViewKind::Decks, &selection).await?;
            println!("Downloading to {}", app.config().download.download_dir.display());
            if let ExportOutcome::Downloads { outcomes } = app.export().await? {
                for outcome in &outcomes {
                    print_outcome(outcome);
                }
            }
        }
    }

    Ok(())
}

async fn select(app: &GalleryApp, view: ViewKind, args: &SelectArgs) -> Result<()> {
    app.switch_view(view).await;
    if args.all {
        app.toggle_all(view).await;
    } else {
        let mut positions = args.select.clone();
        positions.sort_unstable();
        positions.dedup();
        for position in positions {
            app.toggle(view, position).await?;
        }
    }

    let selected = app.state().await.selection(view).positions();
    tracing::info!(%view, ?selected, "selection ready");
    Ok(())
}

fn print_view(model: &ViewModel) {
    match model {
        ViewModel::Loading => println!("Loading..."),
        ViewModel::Failed { message } | ViewModel::Empty { message } => println!("{message}"),
        ViewModel::Grid { tiles } => {
            for tile in tiles {
                println!("[{:>3}] {}  {}", tile.position, tile.label, tile.image_url);
            }
        }
    }
}

fn print_outcome(outcome: &DownloadOutcome) {
    match outcome {
        DownloadOutcome::Saved { title, path } => println!("saved     {title} -> {}", path.display()),
        DownloadOutcome::HandedOff { title, url, path } => {
            println!("handed off {title} ({url}) -> {}", path.display())
        }
        DownloadOutcome::Failed { title, error } => println!("failed    {title}: {error}"),
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_pdf_takes_positions_and_overrides() {
        let cli = Cli::try_parse_from([
            "gallery-export",
            "--shop",
            "shop.example.com",
            "--token",
            "abc",
            "export-pdf",
            "--select",
            "2,0",
            "--output-dir",
            "out",
            "--timestamped",
        ])
        .unwrap();

        let config = cli.resolve_config().unwrap();
        assert_eq!(config.storefront.shop_domain, "shop.example.com");
        assert_eq!(config.export.output_dir, PathBuf::from("out"));
        assert!(config.export.timestamped);
        match cli.command {
            Commands::ExportPdf { selection, .. } => assert_eq!(selection.select, [2, 0]),
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn select_and_all_are_exclusive_and_one_is_required() {
        assert!(Cli::try_parse_from(["gallery-export", "download-decks", "--all", "--select", "1"]).is_err());
        assert!(Cli::try_parse_from(["gallery-export", "download-decks"]).is_err());
        assert!(Cli::try_parse_from(["gallery-export", "download-decks", "--all"]).is_ok());
    }

    #[test]
    fn download_overrides_apply() {
        let cli = Cli::try_parse_from([
            "gallery-export",
            "--policy",
            "all-or-nothing",
            "download-decks",
            "--all",
            "--stagger-ms",
            "0",
        ])
        .unwrap();

        let config = cli.resolve_config().unwrap();
        assert_eq!(config.load_policy, LoadPolicy::AllOrNothing);
        assert_eq!(config.download.stagger, Duration::ZERO);
    }

    #[test]
    fn list_view_parses() {
        let cli = Cli::try_parse_from(["gallery-export", "list", "decks", "--json"]).unwrap();

        assert!(matches!(
            cli.command,
            Commands::List {
                view: ViewKind::Decks,
                json: true
            }
        ));
    }
}
