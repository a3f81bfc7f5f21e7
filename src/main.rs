use anyhow::{Context, Result};
use clap::Parser;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tokio::sync::mpsc;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::EnvFilter;

use headlines::app::{App, AppEvent};
use headlines::config::Config;
use headlines::news::{
    build_client, AggregationPipeline, CategorySelection, Feed, HeadlineFetcher, ImageResolver,
    CATEGORIES,
};
use headlines::preferences::PreferenceManager;
use headlines::storage::{Database, DatabaseError};
use headlines::ui;
use headlines::util::sanitize_line;

/// Get the config directory path (~/.config/headlines/)
fn get_config_dir() -> Result<PathBuf> {
    let home = std::env::var("HOME").context("HOME environment variable not set")?;
    Ok(PathBuf::from(home).join(".config").join("headlines"))
}

#[derive(Parser, Debug)]
#[command(
    name = "headlines",
    version,
    about = "Terminal reader for categorized top headlines"
)]
struct Args {
    /// Reset the settings database (delete and recreate)
    #[arg(long)]
    reset_db: bool,

    /// Forget the saved category selection and use the configured default
    #[arg(long)]
    reset_categories: bool,

    /// Fetch once, print the headlines to stdout, and exit
    #[arg(long)]
    print: bool,

    /// Print the category table with the current selection and exit
    #[arg(long)]
    list_categories: bool,

    /// Config file to use instead of ~/.config/headlines/config.toml
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// Route tracing output to `headlines.log`.
///
/// The TUI owns the terminal in raw mode, so logs go to a file. If the file
/// cannot be opened, logs go to stderr instead.
fn init_logging(config_dir: &Path) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("headlines=info"));

    let log_path = config_dir.join("headlines.log");
    let mut options = std::fs::OpenOptions::new();
    options.create(true).append(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }

    let writer = match options.open(&log_path) {
        Ok(file) => BoxMakeWriter::new(Mutex::new(file)),
        Err(e) => {
            eprintln!(
                "Warning: cannot open log file {}: {}",
                log_path.display(),
                e
            );
            BoxMakeWriter::new(std::io::stderr)
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(writer)
        .with_ansi(false)
        .init();
}

/// `--list-categories`: one checkbox row per category.
fn print_categories(selection: &CategorySelection) -> Result<()> {
    let mut out = std::io::stdout().lock();
    for category in CATEGORIES {
        let mark = if selection.checkbox_state(category.id) {
            "[x]"
        } else {
            "[ ]"
        };
        writeln!(
            out,
            "{} {:<14} {}",
            mark, category.id, category.display_name
        )?;
    }
    writeln!(out)?;
    writeln!(out, "Showing: {}", selection.describe())?;
    Ok(())
}

/// `--print`: one refresh, printed newest first.
async fn print_feed(pipeline: &AggregationPipeline, selection: &CategorySelection) -> Result<()> {
    let feed = pipeline
        .refresh(selection)
        .await
        .context("A refresh is already running")?;

    let mut out = std::io::stdout().lock();
    match feed {
        Feed::NothingSelected => {
            writeln!(out, "No categories selected. Please check settings.")?;
        }
        Feed::Articles(articles) if articles.is_empty() => {
            writeln!(out, "No news found from selected categories")?;
        }
        Feed::Articles(articles) => {
            for article in &articles {
                let date = article
                    .published_at
                    .map(|dt| dt.format("%Y-%m-%d").to_string())
                    .unwrap_or_else(|| "----------".to_string());
                let source = article
                    .source_name
                    .as_deref()
                    .map(sanitize_line)
                    .unwrap_or_else(|| "Unknown".to_string());
                let title = sanitize_line(&article.title);
                let title = if title.is_empty() { "No Title".to_string() } else { title };

                writeln!(out, "{}  {}  ({})", date, title, source)?;
                if !article.url.is_empty() {
                    writeln!(out, "            {}", sanitize_line(&article.url))?;
                }
            }
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Set up config directory
    let config_dir = get_config_dir()?;
    if !config_dir.exists() {
        std::fs::create_dir_all(&config_dir).context("Failed to create config directory")?;
    }

    // User-only access on Unix
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        if let Err(e) =
            std::fs::set_permissions(&config_dir, std::fs::Permissions::from_mode(0o700))
        {
            eprintln!(
                "Warning: cannot restrict permissions on {}: {}",
                config_dir.display(),
                e
            );
        }
    }

    init_logging(&config_dir);
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "Starting headlines");

    let config_path = args
        .config
        .clone()
        .unwrap_or_else(|| config_dir.join("config.toml"));
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load config from {}", config_path.display()))?;

    let db_path = config_dir.join("headlines.db");

    // Handle --reset-db flag
    if args.reset_db && db_path.exists() {
        std::fs::remove_file(&db_path).context("Failed to delete database")?;
        println!("Database reset.");
    }

    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid UTF-8 in database path"))?;
    let db = match Database::open(db_path_str).await {
        Ok(db) => db,
        Err(DatabaseError::InstanceLocked) => {
            eprintln!(
                "Error: Another instance of headlines appears to be running. Please close it and try again."
            );
            std::process::exit(1);
        }
        Err(e) => {
            return Err(anyhow::anyhow!("Failed to open database: {}", e));
        }
    };

    let mut prefs = match PreferenceManager::load(&config, &db).await {
        Ok(prefs) => prefs,
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load stored preferences, using config defaults");
            PreferenceManager::from_config(&config)
        }
    };

    if args.reset_categories {
        let removed = prefs
            .reset_categories(&db, &config)
            .await
            .context("Failed to reset category selection")?;
        if removed {
            println!("Category selection reset.");
        }
    }

    if args.list_categories {
        return print_categories(&prefs.categories());
    }

    let client = build_client(config.request_timeout()).context("Failed to build HTTP client")?;
    let pipeline = AggregationPipeline::new(HeadlineFetcher::new(
        client.clone(),
        config.news_url.as_str(),
    ));

    if args.print {
        return print_feed(&pipeline, &prefs.categories()).await;
    }

    let images = ImageResolver::new(client, config.display_box(), config.default_image.clone());
    let mut app = App::new(db, prefs, pipeline, images);

    // Create event channel for background tasks
    let (event_tx, event_rx) = mpsc::channel::<AppEvent>(32);

    ui::run(&mut app, event_tx, event_rx).await?;

    tracing::info!("Exiting");
    Ok(())
}
