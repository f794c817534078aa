mod app;
mod catalog;
mod config;
mod deck;
mod download;
mod error;
mod filter;
mod input;
mod modal;
mod theme;
mod ui;

use app::App;
use catalog::{DEFAULT_CATALOG, Location};
use clap::{Parser, Subcommand};
use config::{Config, DEFAULT_TIMEOUT_SECS};
use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use download::{DownloadMessage, DownloadRequest};
use filter::{Category, filter_skills};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, TryRecvError};
use std::time::Duration;
use theme::{LocalStorage, ThemeManager};
use tracing_subscriber::EnvFilter;

/// Browse, search and download skills from a static JSON catalog
#[derive(Parser)]
#[command(version, about)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Catalog location: a file path or an http(s) URL
    #[arg(long, global = true, default_value = DEFAULT_CATALOG)]
    catalog: Location,

    /// Directory downloaded skills are saved into
    #[arg(long, global = true)]
    download_dir: Option<PathBuf>,

    /// Settings file holding the persisted theme
    #[arg(long, global = true)]
    storage: Option<PathBuf>,

    /// Network timeout in seconds
    #[arg(long, global = true, default_value_t = DEFAULT_TIMEOUT_SECS)]
    timeout: u64,

    /// Log file (the terminal is used by the UI)
    #[arg(long, global = true)]
    log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the TUI browser (default)
    Run,
    /// Print the skills matching a search and category, then exit
    List {
        /// Case-insensitive search term
        #[arg(short, long, default_value = "")]
        search: String,
        /// Category slug, or "all"
        #[arg(short, long, default_value = "all")]
        category: String,
        /// Print as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Download one skill's SKILL.md by name, then exit
    Download {
        /// Skill name (case-insensitive)
        name: String,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::resolve(cli.catalog, cli.download_dir, cli.storage, cli.timeout, cli.log_file);
    init_logging(&config.log_file);
    tracing::info!(catalog = %config.catalog, "starting");

    match cli.command.unwrap_or(Commands::Run) {
        Commands::List { search, category, json } => {
            let skills = catalog::load_catalog(&config.catalog, config.timeout).await;
            let matches = filter_skills(&skills, &search, &Category::from_slug(&category));
            if json {
                println!("{}", serde_json::to_string_pretty(&matches)?);
            } else {
                for skill in &matches {
                    println!("{:<28} {:<16} {}", skill.name, skill.category, skill.tags.join(", "));
                }
                eprintln!("{} of {} skills", matches.len(), skills.len());
            }
        }
        Commands::Download { name } => {
            let skills = catalog::try_load_catalog(&config.catalog, config.timeout).await?;
            let Some(skill) = skills.iter().find(|s| s.name.eq_ignore_ascii_case(&name)) else {
                eprintln!("Error: no skill named '{}' in {}", name, config.catalog);
                std::process::exit(1);
            };
            let request = DownloadRequest::for_skill(skill, &config.catalog)
                .ok_or("could not resolve the skill's download location")?;
            eprintln!("Downloading {} ...", request.resource);
            let saved = download::download(&request, &config.download_dir, config.timeout).await?;
            eprintln!("Saved to {}", saved.display());
        }
        Commands::Run => {
            run_tui(config).await?;
        }
    }

    Ok(())
}

/// Send tracing output to `path`. Logging is skipped if the file can't be opened.
fn init_logging(path: &Path) {
    if let Some(parent) = path.parent() {
        let _ = std::fs::create_dir_all(parent);
    }
    let file = match std::fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Warning: logging disabled, cannot open {}: {}", path.display(), e);
            return;
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::sync::Mutex::new(file))
        .with_ansi(false)
        .try_init();
}

async fn run_tui(config: Config) -> Result<(), Box<dyn std::error::Error>> {
    // Theme is applied before the first frame
    let theme = ThemeManager::init(LocalStorage::new(config.storage_path.clone()));

    let (download_tx, download_rx) = std::sync::mpsc::channel();
    let (catalog_tx, catalog_rx) = std::sync::mpsc::channel();

    let source = config.catalog.clone();
    let timeout = config.timeout;
    tokio::spawn(async move {
        let skills = catalog::load_catalog(&source, timeout).await;
        let _ = catalog_tx.send(skills);
    });

    let mut app = App::new(config, theme, download_tx);

    let mut terminal = ratatui::init();
    execute!(std::io::stdout(), EnableMouseCapture)?;

    let result = run_app(&mut terminal, &mut app, catalog_rx, download_rx).await;

    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    if let Err(e) = result {
        tracing::error!(error = %e, "terminal loop failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
    tracing::info!("exiting");
    Ok(())
}

async fn run_app(
    terminal: &mut ratatui::DefaultTerminal,
    app: &mut App,
    catalog_rx: Receiver<Vec<catalog::Skill>>,
    download_rx: Receiver<DownloadMessage>,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut catalog_rx = Some(catalog_rx);

    loop {
        terminal.draw(|frame| ui::render(app, frame))?;

        if app.should_quit {
            return Ok(());
        }

        // The catalog arrives exactly once
        if let Some(rx) = &catalog_rx {
            match rx.try_recv() {
                Ok(skills) => {
                    app.catalog_loaded(skills);
                    catalog_rx = None;
                }
                Err(TryRecvError::Disconnected) => {
                    app.catalog_loaded(Vec::new());
                    catalog_rx = None;
                }
                Err(TryRecvError::Empty) => {}
            }
        }

        while let Ok(message) = download_rx.try_recv() {
            app.handle_download_message(message);
        }

        if event::poll(Duration::from_millis(100))? {
            match event::read()? {
                Event::Key(key) => {
                    if key.kind != KeyEventKind::Press {
                        continue;
                    }
                    input::handle_key(app, key);
                }
                Event::Mouse(mouse) => input::handle_mouse(app, mouse),
                _ => {}
            }
        }
    }
}
