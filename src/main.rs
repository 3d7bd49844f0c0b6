//! FloraGuard: Plant disease result resolution
//!
//! Command-line entry point. Resolves a classifier label into a full disease
//! result and prints it as a report or JSON.
//!
//! # Usage
//!
//! ```bash
//! floraguard <label> [--confidence <0..1>] [--elapsed-ms <n>] [--db <path>] \
//!     [--pdf <out>] [--json] [--record]
//! ```

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use floraguard::adapters::json::{JsonFileSource, JsonStrSource};
use floraguard::adapters::pdf::{render_pdf, report_file_name};
use floraguard::adapters::sanitize::SanitizingMakeWriter;
use floraguard::adapters::sqlite::SqliteHistory;
use floraguard::domain::report::format_report;
use floraguard::domain::HistoryRecord;
use floraguard::ports::{DiseaseSource, HistoryStore};
use floraguard::{Config, DiseaseInfoStore, DiseaseResult};

struct Args {
    label: String,
    confidence: f32,
    elapsed_ms: Option<u64>,
    db: Option<PathBuf>,
    pdf: Option<PathBuf>,
    json: bool,
    record: bool,
}

fn usage() -> String {
    "Usage: floraguard <label> [--confidence <0..1>] [--elapsed-ms <n>] [--db <path>] \
     [--pdf <out>] [--json] [--record]"
        .to_string()
}

fn parse_args() -> Result<Args, String> {
    let mut args = std::env::args().skip(1);
    let mut label: Option<String> = None;
    let mut parsed = Args {
        label: String::new(),
        confidence: 1.0,
        elapsed_ms: None,
        db: None,
        pdf: None,
        json: false,
        record: false,
    };

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--confidence" => {
                let v = args.next().ok_or_else(usage)?;
                let c = v
                    .trim()
                    .parse::<f32>()
                    .map_err(|_| "--confidence must be a number".to_string())?;
                if !(0.0..=1.0).contains(&c) {
                    return Err("--confidence must be between 0 and 1".to_string());
                }
                parsed.confidence = c;
            }
            "--elapsed-ms" => {
                let v = args.next().ok_or_else(usage)?;
                let ms = v
                    .trim()
                    .parse::<u64>()
                    .map_err(|_| "--elapsed-ms must be a u64".to_string())?;
                parsed.elapsed_ms = Some(ms);
            }
            "--db" => parsed.db = Some(PathBuf::from(args.next().ok_or_else(usage)?)),
            "--pdf" => parsed.pdf = Some(PathBuf::from(args.next().ok_or_else(usage)?)),
            "--json" => parsed.json = true,
            "--record" => parsed.record = true,
            "-h" | "--help" => return Err(usage()),
            _ => {
                if label.is_none() && !arg.starts_with("--") {
                    label = Some(arg);
                } else {
                    return Err(usage());
                }
            }
        }
    }

    parsed.label = label.ok_or_else(usage)?;
    if parsed.label.trim().is_empty() {
        return Err("Label must not be empty".to_string());
    }
    Ok(parsed)
}

fn init_logging() -> Result<tracing_appender::non_blocking::WorkerGuard> {
    // Report output goes to stdout, so logs default to stderr.
    let log_mode = std::env::var("FLORAGUARD_LOG_MODE").unwrap_or_else(|_| "auto".to_string());

    let (writer, guard) = match log_mode.as_str() {
        "file" => {
            let log_file = std::env::var("FLORAGUARD_LOG_FILE")
                .unwrap_or_else(|_| "data/floraguard.log".to_string());

            if let Some(parent) = std::path::Path::new(&log_file).parent() {
                let _ = std::fs::create_dir_all(parent);
            }

            let file = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&log_file)
                .with_context(|| format!("Failed to open log file {log_file}"))?;
            tracing_appender::non_blocking(file)
        }
        "stdout" => tracing_appender::non_blocking(std::io::stdout()),
        // auto
        _ => tracing_appender::non_blocking(std::io::stderr()),
    };

    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(SanitizingMakeWriter::new(writer)))
        .init();

    Ok(guard)
}

fn main() -> Result<()> {
    let args = match parse_args() {
        Ok(args) => args,
        Err(msg) => {
            eprintln!("{msg}");
            std::process::exit(2);
        }
    };

    let _guard = init_logging()?;

    let mut config = Config::from_env_or_default();
    if let Some(db) = &args.db {
        config.disease_db = db.clone();
    }
    tracing::debug!("Configuration: {:?}", config);

    if config.disease_db.exists() {
        run(DiseaseInfoStore::new(JsonFileSource::new(&config.disease_db)), &args, &config)
    } else if args.db.is_some() {
        bail!("Disease database not found: {}", config.disease_db.display());
    } else {
        tracing::info!(
            "{} not found, using bundled disease database",
            config.disease_db.display()
        );
        run(DiseaseInfoStore::new(JsonStrSource::bundled()), &args, &config)
    }
}

fn run<S: DiseaseSource>(store: DiseaseInfoStore<S>, args: &Args, config: &Config) -> Result<()> {
    let started = Instant::now();

    if args.confidence < config.confidence_threshold {
        tracing::info!(
            "Confidence {:.2} below threshold {:.2}",
            args.confidence,
            config.confidence_threshold
        );
        println!("No result available.");
        return Ok(());
    }

    let info = store.resolve(&args.label);
    let elapsed_ms = args
        .elapsed_ms
        .unwrap_or_else(|| u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX));
    let result = DiseaseResult::assemble(&args.label, args.confidence, elapsed_ms, info);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", format_report(&result, chrono::Local::now().date_naive()));
    }

    if let Some(out) = &args.pdf {
        let path = if out.is_dir() {
            out.join(report_file_name(&result))
        } else {
            out.clone()
        };
        let bytes = render_pdf(&result, chrono::Local::now().date_naive())?;
        std::fs::write(&path, bytes)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        tracing::info!("Wrote PDF report to {}", path.display());
    }

    if args.record {
        let history = SqliteHistory::new(&config.history_db)?;
        history.save_record(&HistoryRecord::from_result(&result, None))?;
        tracing::info!(
            "Recorded detection in {} ({} total)",
            config.history_db.display(),
            history.count()?
        );
    }

    Ok(())
}
