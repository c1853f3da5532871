use anyhow::{Context, Result};
use asset_browser_core::browser::AssetBrowser;
use asset_browser_core::config::{self, AppConfig, ViewConfig};
use asset_browser_core::models::{SortDirection, SortKey, TimeRange};
use asset_browser_core::scanner::FsMetadataProvider;
use clap::{Args, Parser, Subcommand};
use cli::{render, session, watch};
use std::io;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();
    let cfg = config::load(cli.config.as_deref())?;

    match cli.command {
        Commands::List {
            select,
            json,
            expand_all,
            expand,
            reveal,
        } => run_list(cfg, select, json, expand_all, expand, reveal).await,
        Commands::Browse { select } => run_browse(cfg, select).await,
        Commands::Watch {
            select,
            json,
            debounce_ms,
        } => {
            let debounce = Duration::from_millis(debounce_ms.unwrap_or(cfg.watch.debounce_ms));
            let browser = open_browser(&cfg, &select).await?;
            watch::watch_roots(browser, debounce, json).await
        }
    }
}

#[derive(Parser)]
#[command(name = "recent-assets")]
#[command(about = "Browse recently created assets as a folder tree", long_about = None)]
struct Cli {
    /// Path to config TOML
    #[arg(short, long)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the tree once
    List {
        #[command(flatten)]
        select: SelectArgs,
        /// Output JSON
        #[arg(long)]
        json: bool,
        /// Open every directory
        #[arg(long, default_value_t = false)]
        expand_all: bool,
        /// Directories to open, by full path
        #[arg(long, value_delimiter = ',', num_args = 1..)]
        expand: Vec<String>,
        /// Open the directories above this asset
        #[arg(long)]
        reveal: Option<String>,
    },
    /// Interactive session reading commands from stdin
    Browse {
        #[command(flatten)]
        select: SelectArgs,
    },
    /// Reprint the tree whenever files under the roots change
    Watch {
        #[command(flatten)]
        select: SelectArgs,
        /// Output JSON
        #[arg(long)]
        json: bool,
        /// Quiet period before refreshing, overrides the config
        #[arg(long)]
        debounce_ms: Option<u64>,
    },
}

#[derive(Args, Debug, Clone)]
struct SelectArgs {
    /// Roots to scan, overrides the config
    roots: Vec<String>,
    /// Extra glob patterns to skip
    #[arg(long, value_delimiter = ',', num_args = 1..)]
    exclude: Vec<String>,
    /// Time window, e.g. last24_hours
    #[arg(long)]
    range: Option<TimeRange>,
    /// Sort key: creation_time or name
    #[arg(long)]
    sort: Option<SortKey>,
    /// Sort direction: ascending or descending
    #[arg(long)]
    direction: Option<SortDirection>,
    /// Initial search text
    #[arg(long)]
    search: Option<String>,
}

impl SelectArgs {
    fn view(&self, base: &ViewConfig) -> ViewConfig {
        ViewConfig {
            time_range: self.range.unwrap_or(base.time_range),
            sort_key: self.sort.unwrap_or(base.sort_key),
            sort_direction: self.direction.unwrap_or(base.sort_direction),
            search: self.search.clone().unwrap_or_else(|| base.search.clone()),
        }
    }
}

async fn open_browser(
    cfg: &AppConfig,
    select: &SelectArgs,
) -> Result<AssetBrowser<FsMetadataProvider>> {
    let mut scan = cfg.scan.clone();
    if !select.roots.is_empty() {
        scan.include = select.roots.clone();
    }
    scan.exclude.extend(select.exclude.iter().cloned());
    let provider = FsMetadataProvider::new(&scan).context("opening scan roots")?;
    let view = select.view(&cfg.view);
    tokio::task::spawn_blocking(move || AssetBrowser::new(provider, view))
        .await
        .context("initial scan failed")
}

async fn run_list(
    cfg: AppConfig,
    select: SelectArgs,
    json: bool,
    expand_all: bool,
    expand: Vec<String>,
    reveal: Option<String>,
) -> Result<()> {
    let mut browser = open_browser(&cfg, &select).await?;
    if expand_all {
        browser.expand_all();
    }
    for dir in &expand {
        if browser.tree().find_dir(dir).is_none() {
            tracing::warn!(dir = %dir, "no such directory in the tree");
            continue;
        }
        browser.expand_dir(dir);
    }
    if let Some(path) = reveal.as_deref() {
        if browser.reveal(path).is_none() {
            tracing::warn!(path = %path, "no such asset in the tree");
        }
    }
    println!("{}", render::render_view(&browser, json)?.trim_end());
    Ok(())
}

async fn run_browse(cfg: AppConfig, select: SelectArgs) -> Result<()> {
    let mut browser = open_browser(&cfg, &select).await?;
    tokio::task::spawn_blocking(move || {
        let stdin = io::stdin();
        session::run(&mut browser, stdin.lock(), io::stdout().lock())
    })
    .await
    .context("session task failed")?
}
