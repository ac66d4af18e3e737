use anyhow::{ Context, Result };
use clap::{ Args, Parser, Subcommand };
use std::path::PathBuf;
use tracing::{ error, info };
use tracing_subscriber::EnvFilter;
mod config;
mod error;
mod indexer;
mod models;
mod search;
mod snapshot;
use config::Config;
use models::SearchResult;
use search::DirectoryFilter;
use snapshot::{ LiveDirectory, SnapshotFile, SnapshotSource };

pub struct IconBrowser {
    source: Box<dyn SnapshotSource>,
}

impl IconBrowser {
    pub fn new(source: Box<dyn SnapshotSource>) -> Self {
        Self { source }
    }

    /// Runs one query against a fresh snapshot. Failures degrade to an empty
    /// result carrying a generic error marker.
    pub async fn query(&self, query: &str, filter: Option<&DirectoryFilter>) -> SearchResult {
        match self.source.load().await {
            Ok(records) => search::search(&records, query, filter),
            Err(e) => {
                error!(source = %self.source.describe(), error = %e, "Icon search failed");
                SearchResult::failed(query)
            }
        }
    }
}

#[derive(Parser)]
#[command(name = "icon-search")]
#[command(about = "Index and search static image assets")]
#[command(version)]
struct Cli {
    /// YAML config file (default: <config dir>/icon-search/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Debug)]
struct SourceArgs {
    /// Index this directory live instead of the configured root
    #[arg(long)]
    root: Option<PathBuf>,

    /// Read records from a snapshot written by `index`
    #[arg(long, conflicts_with = "root")]
    snapshot: Option<PathBuf>,

    #[arg(long)]
    max_depth: Option<usize>,
}

#[derive(Subcommand)]
enum Commands {
    /// Walk the asset root once and write a JSON snapshot
    Index {
        #[arg(long)]
        root: Option<PathBuf>,

        #[arg(short, long)]
        output: Option<PathBuf>,

        #[arg(long)]
        max_depth: Option<usize>,
    },

    /// Search icons and print the result as JSON
    Search {
        /// Free-text query; omit to list everything
        query: Option<String>,

        /// Only return icons in this directory
        #[arg(long = "dir")]
        directory: Option<String>,

        /// Also include icons below the --dir directory
        #[arg(long, requires = "directory")]
        include_subdirs: bool,

        #[command(flatten)]
        source: SourceArgs,
    },

    /// List every indexed directory
    Dirs {
        #[command(flatten)]
        source: SourceArgs,
    },
}

fn init_tracing(default_level: &str) {
    tracing_subscriber
        ::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level))
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn build_source(config: &Config, args: SourceArgs) -> Box<dyn SnapshotSource> {
    let mut options = config.index_options();
    if let Some(max_depth) = args.max_depth {
        options.max_depth = max_depth;
    }

    match args.snapshot {
        Some(path) => Box::new(SnapshotFile::new(path)),
        None => Box::new(LiveDirectory::new(args.root.unwrap_or_else(|| config.root.clone()), options)),
    }
}

fn build_filter(directory: Option<String>, include_subdirs: bool) -> Option<DirectoryFilter> {
    directory.map(|dir| {
        if include_subdirs { DirectoryFilter::subtree(dir) } else { DirectoryFilter::exact(dir) }
    })
}

async fn cmd_index(
    config: &Config,
    root: Option<PathBuf>,
    output: Option<PathBuf>,
    max_depth: Option<usize>
) -> Result<()> {
    let root = root.unwrap_or_else(|| config.root.clone());
    let output = output.unwrap_or_else(|| config.snapshot_path.clone());
    let mut options = config.index_options();
    if let Some(max_depth) = max_depth {
        options.max_depth = max_depth;
    }

    info!(root = %root.display(), "Indexing icons");
    let records = LiveDirectory::new(&root, options).load().await?;
    snapshot::write_snapshot(&output, &records).await?;

    println!("Indexed {} icons into {}", records.len(), output.display());
    Ok(())
}

async fn cmd_search(
    config: &Config,
    query: &str,
    filter: Option<DirectoryFilter>,
    source: SourceArgs
) -> Result<()> {
    let browser = IconBrowser::new(build_source(config, source));
    let result = browser.query(query, filter.as_ref()).await;
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

async fn cmd_dirs(config: &Config, source: SourceArgs) -> Result<()> {
    let browser = IconBrowser::new(build_source(config, source));
    let result = browser.query("", None).await;
    if let Some(message) = result.error {
        anyhow::bail!(message);
    }

    for directory in &result.directories {
        println!("{}", directory);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) =>
            Config::load_from(path).with_context(||
                format!("Failed to load config from {}", path.display())
            )?,
        None => Config::load().context("Failed to load default config")?,
    };

    init_tracing(&config.log_level);

    match cli.command {
        Commands::Index { root, output, max_depth } => {
            cmd_index(&config, root, output, max_depth).await
        }
        Commands::Search { query, directory, include_subdirs, source } => {
            cmd_search(&config, &query.unwrap_or_default(), build_filter(directory, include_subdirs), source).await
        }
        Commands::Dirs { source } => cmd_dirs(&config, source).await,
    }
}
