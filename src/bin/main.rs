//! Folio CLI - inspect and run report documents
//!
//! Usage:
//!   folio check-sql <sql>
//!   folio new <report.json>
//!   folio inspect <report.json>
//!   folio run <report.json> [--connection <name>] [--param key=value]...
//!
//! Examples:
//!   folio check-sql "SELECT region, SUM(amount) FROM sales GROUP BY region"
//!   folio run reports/sales.json --connection warehouse --param year=2024

use clap::{Parser, Subcommand};
use folio::config::Settings;
use folio::dataset::QueryParams;
use folio::executor;
use folio::logging::init_logging;
use folio::report::ReportLayout;
use folio::sql::gate_query;
use folio::ReportSession;
use std::path::PathBuf;
use std::process::ExitCode;

#[derive(Parser)]
#[command(name = "folio")]
#[command(about = "Folio - report designer core: gated SQL datasets and banded layouts")]
#[command(version)]
struct Cli {
    /// Config file (defaults to FOLIO_CONFIG, ./folio.toml, then the user config dir)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check a query against the read-only SQL gate
    CheckSql {
        /// The SQL text
        sql: String,
    },

    /// Write an empty report document using the configured page settings
    New {
        /// Output path
        file: PathBuf,

        /// Overwrite an existing file
        #[arg(short, long)]
        force: bool,
    },

    /// Summarize a report document
    Inspect {
        /// Path to the report JSON
        file: PathBuf,
    },

    /// Execute every dataset of a report and print a summary
    Run {
        /// Path to the report JSON
        file: PathBuf,

        /// Connection name from the config (default connection if omitted)
        #[arg(short, long)]
        connection: Option<String>,

        /// Query parameter as key=value (value parsed as JSON when possible)
        #[arg(short, long = "param", value_parser = parse_param)]
        params: Vec<(String, serde_json::Value)>,

        /// Print cached rows as JSON instead of a summary
        #[arg(long)]
        json: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    if let Err(e) = init_logging(&settings.logging) {
        eprintln!("Warning: {}", e);
    }

    match cli.command {
        Commands::CheckSql { sql } => cmd_check_sql(&sql),
        Commands::New { file, force } => cmd_new(&settings, file, force),
        Commands::Inspect { file } => cmd_inspect(file),
        Commands::Run {
            file,
            connection,
            params,
            json,
        } => cmd_run(&settings, file, connection, params, json).await,
    }
}

fn parse_param(s: &str) -> Result<(String, serde_json::Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got '{}'", s))?;
    let value = serde_json::from_str(value)
        .unwrap_or_else(|_| serde_json::Value::String(value.to_string()));
    Ok((key.trim().to_string(), value))
}

fn cmd_check_sql(sql: &str) -> ExitCode {
    match gate_query(sql) {
        Ok((sanitized, report)) => {
            println!("OK: {}", sanitized);
            if report.union_select {
                println!("note: UNION SELECT present (allowed, flagged)");
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Rejected: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_new(settings: &Settings, file: PathBuf, force: bool) -> ExitCode {
    if file.exists() && !force {
        eprintln!(
            "Error: '{}' already exists (use --force to overwrite)",
            file.display()
        );
        return ExitCode::FAILURE;
    }

    let layout = ReportLayout::new(settings.page.clone());
    match layout.save(&file) {
        Ok(()) => {
            println!("Created {}", file.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error writing '{}': {}", file.display(), e);
            ExitCode::FAILURE
        }
    }
}

fn cmd_inspect(file: PathBuf) -> ExitCode {
    let layout = match ReportLayout::load(&file) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error reading '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let page = &layout.page_settings;
    println!("File: {} (version {})", file.display(), layout.version);
    println!(
        "Page: {}x{} mm, {:?}",
        page.width, page.height, page.orientation
    );
    println!();

    if layout.datasets.is_empty() {
        println!("No datasets defined.");
    } else {
        println!("Datasets:");
        for ds in &layout.datasets {
            let verdict = match gate_query(&ds.sql_query) {
                Ok(_) => "ok".to_string(),
                Err(e) => e.to_string(),
            };
            println!("  - {} [{}] gate: {}", ds.name, ds.id, verdict);
            for param in ds.parameters.iter().flatten() {
                println!(
                    "      @{} ({:?}{})",
                    param.name,
                    param.param_type,
                    if param.required { ", required" } else { "" }
                );
            }
        }
    }
    println!();

    println!("Bands:");
    for band in &layout.bands {
        let kinds: Vec<_> = band.elements.iter().map(|el| el.kind().as_str()).collect();
        println!(
            "  - {:?} (height {}): {}",
            band.band_type,
            band.height,
            if kinds.is_empty() {
                "empty".to_string()
            } else {
                kinds.join(", ")
            }
        );
    }

    ExitCode::SUCCESS
}

async fn cmd_run(
    settings: &Settings,
    file: PathBuf,
    connection: Option<String>,
    params: Vec<(String, serde_json::Value)>,
    json: bool,
) -> ExitCode {
    let layout = match ReportLayout::load(&file) {
        Ok(l) => l,
        Err(e) => {
            eprintln!("Error reading '{}': {}", file.display(), e);
            return ExitCode::FAILURE;
        }
    };

    let executor = match executor::connect(settings, connection.as_deref()).await {
        Ok(ex) => ex,
        Err(e) => {
            eprintln!("Connection error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let mut session = ReportSession::open(layout, executor, &settings.canvas);
    let params: QueryParams = params.into_iter().collect();
    let params = (!params.is_empty()).then_some(&params);

    let summaries = session.datasets_mut().execute_all_datasets(params).await;
    let failed = summaries.iter().filter(|s| s.outcome.is_err()).count();

    if json {
        let caches: serde_json::Map<String, serde_json::Value> = summaries
            .iter()
            .filter_map(|s| {
                let cache = session.datasets().get_dataset_cache(&s.dataset_id)?;
                Some((s.name.clone(), serde_json::to_value(cache).ok()?))
            })
            .collect();
        match serde_json::to_string_pretty(&caches) {
            Ok(out) => println!("{}", out),
            Err(e) => {
                eprintln!("Error serializing results: {}", e);
                return ExitCode::FAILURE;
            }
        }
    } else {
        for summary in &summaries {
            match &summary.outcome {
                Ok(rows) => println!("  ok    {} ({} rows)", summary.name, rows),
                Err(e) => println!("  error {}: {}", summary.name, e),
            }
        }
        println!();
        println!("{} datasets, {} failed", summaries.len(), failed);
    }

    if failed == 0 {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
