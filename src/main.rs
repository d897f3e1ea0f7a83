// Main entry point
use argos_strings::application::import::import_file;
use argos_strings::application::settings::{SettingsStore, OPTIONS_TITLE};
use argos_strings::application::translate::TRANSACTION_LABEL;
use argos_strings::domain::model::{BatchReport, Location, TranslateOptions};
use argos_strings::domain::traits::{Document, StringTranslationService};
use argos_strings::infrastructure::config::{self, Config};
use argos_strings::infrastructure::options::TomlOptions;
use argos_strings::infrastructure::storage::{MemoryDocument, SqliteDocument};
use argos_strings::interfaces::cli::{parse_assignment, Cli};
use argos_strings::interfaces::task::launch_modal;
use argos_strings::presentation::report::format_report;
use argos_strings::state::AppState;
use clap::Parser;
use colored::Colorize;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = config::load_config()?;

    // Initialize logging
    if config.logging.enable {
        init_logging(&config.logging)?;
    }

    if cli.generate_config {
        // Register the options so the sample lists them with their defaults
        let mut options = TomlOptions::new(OPTIONS_TITLE, Config::default(), None);
        SettingsStore::initialize(&mut options);
        config::generate_config_sample(options.config())?;
        return Ok(());
    }
    if cli.edit_config {
        if let Some(config_path) = config::get_config_path() {
            let editor = std::env::var("EDITOR").unwrap_or_else(|_| "vi".to_string());
            let config_path_clone = config_path.clone();
            // Run editor in blocking task
            tokio::task::spawn_blocking(move || {
                std::process::Command::new(editor)
                    .arg(&config_path_clone)
                    .status()
            })
            .await??;
        } else {
            eprintln!("{}", "Config file not found".red());
        }
        return Ok(());
    }

    // Open the document database (from CLI, config or default)
    let db_path = cli
        .db
        .clone()
        .unwrap_or_else(|| config::get_database_path(&config));
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    let document = SqliteDocument::open(&db_path).await?;
    let state = AppState::new(document, config, config::get_config_path());

    let mut handled = false;
    for assignment in &cli.set {
        let (name, value) = parse_assignment(assignment)?;
        state.options.write().await.set_string(&name, &value)?;
        println!("{} = {}", name.cyan(), value);
        handled = true;
    }
    if let Some(path) = &cli.import {
        let count = import_file(&state.document, path).await?;
        println!("Imported {} strings from {}", count, path.display());
        handled = true;
    }
    if cli.options {
        print_options(&state).await;
        handled = true;
    }
    if cli.status {
        print_status(&state, &db_path).await?;
        handled = true;
    }

    let locations = select_locations(&state, &cli).await?;
    if locations.is_empty() {
        if handled {
            return Ok(());
        }
        eprintln!(
            "{}",
            "Please provide string locations, or --all to translate every string".red()
        );
        std::process::exit(1);
    }

    let report = if cli.dry_run {
        let scratch = Arc::new(MemoryDocument::new());
        for location in &locations {
            let value = state.document.string_at(location).await?;
            scratch.insert(location.clone(), value.as_deref());
        }
        run_translation(&state, scratch, locations, &cli).await?
    } else {
        run_translation(&state, state.document.clone(), locations, &cli).await?
    };

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", format_report(&report));
    }

    Ok(())
}

async fn select_locations(state: &AppState, cli: &Cli) -> anyhow::Result<Vec<Location>> {
    if !cli.all {
        return Ok(cli.locations.iter().map(|l| Location::new(l.as_str())).collect());
    }

    let mut locations = state.document.locations().await?;
    if cli.pending {
        let mut pending = Vec::with_capacity(locations.len());
        for location in locations {
            if state.document.annotation_at(&location).await?.is_none() {
                pending.push(location);
            }
        }
        locations = pending;
    }
    Ok(locations)
}

async fn run_translation<D>(
    state: &AppState,
    document: Arc<D>,
    locations: Vec<Location>,
    cli: &Cli,
) -> anyhow::Result<BatchReport>
where
    D: Document + 'static,
{
    let service = state.service.clone();
    let options = TranslateOptions {
        auto_translate: cli.auto_translate,
    };

    let report = launch_modal(TRANSACTION_LABEL, !cli.json, move |progress, cancel| async move {
        service
            .translate(&*document, &locations, &options, &progress, cancel)
            .await
    })
    .await?;

    Ok(report)
}

/// Initialize logging with path and level configuration
fn init_logging(logging: &config::Logging) -> anyhow::Result<()> {
    use tracing_subscriber::EnvFilter;

    let level = match logging.level.as_str() {
        "DEBUG" => "debug",
        "INFO" => "info",
        "WARN" => "warn",
        "ERROR" => "error",
        _ => "info",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    if let Some(path) = &logging.path {
        if !path.is_empty() {
            // Log to file
            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(file)
                .with_ansi(false)
                .init();
            return Ok(());
        }
    }

    // Log to stderr (default)
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    Ok(())
}

async fn print_options(state: &AppState) {
    let options = state.options.read().await;
    println!("{}", options.category().green().bold());
    for entry in options.entries() {
        println!("  {:<16} {}", entry.name.cyan(), entry.value);
        println!("  {:<16} {}", "", entry.help.bright_black());
    }
}

async fn print_status(state: &AppState, db_path: &std::path::Path) -> anyhow::Result<()> {
    println!("{}", state.service.service_name().green().bold());
    println!("━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━");

    let stats = state.document.stats().await?;
    println!(
        "Document: {} ({} strings, {} translated)",
        db_path.display(),
        stats.strings,
        stats.translated
    );

    let settings = state.service.settings().snapshot();
    println!(
        "Languages: {} → {}",
        settings.source_language, settings.target_language
    );
    println!("Argos: {}", settings.argos_path);
    println!(
        "Config: {}",
        config::get_config_path()
            .filter(|p| p.exists())
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "Not found".to_string())
    );

    let recent = state.document.recent_transactions(5).await?;
    if !recent.is_empty() {
        println!("Recent transactions:");
        for tx in recent {
            let when = chrono::DateTime::from_timestamp(tx.started_at, 0)
                .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
                .unwrap_or_default();
            let outcome = if tx.committed { "committed" } else { "open" };
            println!("  #{} {} {} ({})", tx.id, when, tx.label, outcome);
        }
    }

    Ok(())
}
