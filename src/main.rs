use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use kwh_import::{
    config::{FileConfig, Overrides, Settings},
    session::ImportSession,
    summary::UsageSummary,
    upload::{submit_batch, submit_record, HttpSink},
    UsageRecord,
};
use reqwest::Client;
use std::path::{Path, PathBuf};
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Validate electricity usage CSV files and import them into the dashboard backend"
)]
struct Args {
    /// YAML file with api_base / save_path / token_file
    #[arg(long, env = "KWH_IMPORT_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Backend base URL [default: http://localhost:5000]
    #[arg(long, env = "KWH_API_BASE", global = true)]
    api_base: Option<String>,

    /// Record-creation path [default: /api/save-energy-usage]
    #[arg(long, global = true)]
    save_path: Option<String>,

    /// Bearer token
    #[arg(long, env = "KWH_TOKEN", hide_env_values = true, global = true)]
    token: Option<String>,

    /// File holding the bearer token
    #[arg(long, global = true)]
    token_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Parse a CSV file and report what would be uploaded
    Check { file: PathBuf },
    /// Parse a CSV file and upload every accepted row
    Upload { file: PathBuf },
    /// Log a single usage record
    Log {
        #[arg(long)]
        company: String,
        /// YYYY-MM-DD, today if omitted
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        kwh: String,
        #[arg(long)]
        notes: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let env = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("warn,kwh_import=info"));
    fmt::Subscriber::builder()
        .with_env_filter(env)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    run(Args::parse()).await
}

async fn run(args: Args) -> Result<()> {
    let Args {
        config,
        api_base,
        save_path,
        token,
        token_file,
        command,
    } = args;
    let overrides = Overrides {
        api_base,
        save_path,
        token,
        token_file,
    };

    match command {
        Command::Check { file } => {
            let session = parse_file(&file).await;
            print_parse(&session);
        }
        Command::Upload { file } => {
            let settings = resolve_settings(config.as_deref(), overrides)?;
            let mut session = parse_file(&file).await;
            print_parse(&session);
            upload(&mut session, &settings).await?;
        }
        Command::Log {
            company,
            date,
            kwh,
            notes,
        } => {
            let settings = resolve_settings(config.as_deref(), overrides)?;
            let date = date.unwrap_or_else(today);
            let record = UsageRecord::from_raw(&date, &kwh, &company, notes.as_deref())
                .context("invalid usage record")?;
            let sink = http_sink(&settings)?;
            let credentials = settings.credential_provider();
            submit_record(&sink, &credentials, &record)
                .await
                .context("logging usage")?;
            println!("Logged {} kWh for {} on {}", record.kwh, record.company, record.date);
        }
    }

    Ok(())
}

// ─── settings ────────────────────────────────────────────────────────
fn resolve_settings(config: Option<&Path>, overrides: Overrides) -> Result<Settings> {
    let file_config = config.map(FileConfig::load).transpose()?;
    Settings::resolve(file_config, overrides)
}

/// Today's date in UTC.
fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

async fn parse_file(file: &Path) -> ImportSession {
    let mut session = ImportSession::new();
    session.select_file(file).await;
    session
}

fn http_sink(settings: &Settings) -> Result<HttpSink> {
    let sink = HttpSink::new(Client::new(), settings.endpoint()?);
    info!(endpoint = %sink.endpoint(), "using record endpoint");
    Ok(sink)
}

// ─── upload ──────────────────────────────────────────────────────────
async fn upload(session: &mut ImportSession, settings: &Settings) -> Result<()> {
    let sink = http_sink(settings)?;
    let credentials = settings.credential_provider();

    let batch = session.snapshot();
    let result = submit_batch(&sink, &credentials, batch, |report| {
        info!(saved = report.saved, "import complete; usage views are stale");
    })
    .await;
    if let Err(e) = &result {
        error!("upload not started: {}", e);
    }
    session.record_upload(result);

    if session.saved() > 0 {
        println!("Successfully uploaded {} rows.", session.saved());
    }
    print_messages(session.messages());
    Ok(())
}

// ─── output ──────────────────────────────────────────────────────────
fn print_parse(session: &ImportSession) {
    if let Some(name) = session.file_name() {
        println!("{name}");
    }
    if !session.rows().is_empty() {
        println!("Parsed {} valid rows.", session.rows().len());
        print!("{}", UsageSummary::from_rows(session.rows()));
    }
    print_messages(session.messages());
}

fn print_messages(messages: &[String]) {
    for msg in messages {
        println!("  • {msg}");
    }
}
