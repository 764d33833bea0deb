use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use thiserror::Error;

use flight_legs::config::{ConfigError, Settings};
use flight_legs::legs::{summarize, GapThreshold};
use flight_legs::pipeline::{self, parse_timezone, PipelineConfig};
use flight_legs::trace::{fetch_plan, RawPayload};

#[derive(Parser)]
#[command(name = "flight-legs")]
#[command(about = "Split ADS-B aircraft traces into flight legs")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Process fetched day payloads into a leg-annotated table
    Process {
        /// Fetched day files (one payload object or an array of them)
        #[arg(required = true)]
        payloads: Vec<PathBuf>,
        /// Settings file
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Override the time gap threshold (e.g. 20m)
        #[arg(long)]
        threshold: Option<String>,
        /// Override the timezone used for date labels
        #[arg(long)]
        timezone: Option<String>,
        /// Keep on-ground pings
        #[arg(long)]
        keep_ground: bool,
        /// Write JSON lines here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a settings file
    Validate { config: PathBuf },
    /// Print the trace URLs to fetch for aircraft over a date range
    Plan {
        #[arg(long, required = true)]
        icao: Vec<String>,
        #[arg(long)]
        start: NaiveDate,
        #[arg(long)]
        end: NaiveDate,
    },
}

#[derive(Debug, Error)]
enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("payload {path}: {source}")]
    Payload {
        path: String,
        source: serde_json::Error,
    },
    #[error("serialize error: {0}")]
    Serialize(#[from] serde_json::Error),
}

#[derive(serde::Deserialize)]
#[serde(untagged)]
enum PayloadFile {
    Many(Vec<RawPayload>),
    One(RawPayload),
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Process {
            payloads,
            config,
            threshold,
            timezone,
            keep_ground,
            output,
        } => load_config(config.as_deref(), threshold, timezone, keep_ground)
            .and_then(|cfg| process(&payloads, &cfg, output.as_deref())),
        Commands::Validate { config } => validate(&config),
        Commands::Plan { icao, start, end } => {
            plan(&icao, start, end);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {}", e);
            ExitCode::FAILURE
        }
    }
}

fn load_config(
    path: Option<&Path>,
    threshold: Option<String>,
    timezone: Option<String>,
    keep_ground: bool,
) -> Result<PipelineConfig, CliError> {
    let settings = match path {
        Some(p) => Settings::from_file(p)?,
        None => Settings::default(),
    };
    let mut config = settings.pipeline_config()?;

    if let Some(t) = threshold {
        config.threshold = GapThreshold::parse(&t)?;
    }
    if let Some(tz) = timezone {
        config.timezone = parse_timezone(&tz)?;
    }
    if keep_ground {
        config.filter_ground = false;
    }
    Ok(config)
}

fn read_payloads(paths: &[PathBuf]) -> Result<Vec<RawPayload>, CliError> {
    let mut payloads = Vec::new();
    for path in paths {
        let content = fs::read_to_string(path)?;
        let file: PayloadFile =
            serde_json::from_str(&content).map_err(|source| CliError::Payload {
                path: path.display().to_string(),
                source,
            })?;
        match file {
            PayloadFile::Many(many) => payloads.extend(many),
            PayloadFile::One(one) => payloads.push(one),
        }
    }
    Ok(payloads)
}

fn process(
    paths: &[PathBuf],
    config: &PipelineConfig,
    output: Option<&Path>,
) -> Result<(), CliError> {
    let payloads = read_payloads(paths)?;
    let result = pipeline::run(&payloads, config);

    if result.rows.is_empty() {
        log::warn!("No flight data left after processing");
    }

    let sink: Box<dyn Write> = match output {
        Some(p) => Box::new(fs::File::create(p)?),
        None => Box::new(io::stdout().lock()),
    };
    let mut out = BufWriter::new(sink);
    for row in &result.rows {
        serde_json::to_writer(&mut out, row)?;
        out.write_all(b"\n")?;
    }
    out.flush()?;

    for leg in summarize(&result.rows) {
        log::info!(
            "{}: {} points, {} -> {} ({}s)",
            leg.flight_leg,
            leg.points,
            leg.start,
            leg.end,
            leg.duration_seconds
        );
    }
    if !result.skipped.is_empty() {
        log::warn!("Skipped {} malformed trace rows", result.skipped.count());
    }
    Ok(())
}

fn validate(path: &Path) -> Result<(), CliError> {
    let settings = Settings::from_file(path)?;
    let config = settings.pipeline_config()?;

    println!("Settings are valid");
    println!("  time gap threshold: {}", config.threshold.duration());
    println!("  filter ground: {}", config.filter_ground);
    println!("  timezone: {}", config.timezone);
    match &config.mapping {
        Some(m) => println!(
            "  mapping: {} -> {} by {} ({} lookup rows)",
            m.value_column,
            m.destination_column,
            m.key_column.as_ref(),
            m.table.len()
        ),
        None => println!("  mapping: none"),
    }
    Ok(())
}

fn plan(aircraft: &[String], start: NaiveDate, end: NaiveDate) {
    for (url, icao, date) in fetch_plan(aircraft, start, end) {
        println!("{}\t{}\t{}", icao, date, url);
    }
}
