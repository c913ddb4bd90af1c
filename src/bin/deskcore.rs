//! Deskcore CLI - Command-line interface for the Deskcore engine
//!
//! Commands:
//! - report: Generate a posture analysis report from a profile
//! - record: Record a completed exercise session into the progress store
//! - summary: Print the weekly progress summary
//! - insights: Print today's daily insight cards
//! - doctor: Diagnose store health and configuration

use clap::{Parser, Subcommand, ValueEnum};
use std::collections::BTreeSet;
use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;
use std::process::ExitCode;

use chrono::{Local, NaiveDate, NaiveDateTime};

use deskcore::progress::compute_streak;
use deskcore::store::STORE_VERSION;
use deskcore::types::{FocusArea, PlanInfo, ProfileSnapshot};
use deskcore::{
    generate_report, DailyInsightEngine, JsonFileStore, LogSink, ProgressRepository,
    ENGINE_VERSION, PRODUCER_NAME,
};

/// Deskcore - On-device engagement scoring and insight engine for desk workers
#[derive(Parser)]
#[command(name = "deskcore")]
#[command(version = ENGINE_VERSION)]
#[command(about = "Score exercise engagement and generate posture insights", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a posture analysis report from a profile
    Report {
        /// Profile JSON file path (use - for stdin)
        #[arg(short, long)]
        profile: PathBuf,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Record a completed exercise session into the progress store
    Record {
        /// Progress store file path
        #[arg(short, long)]
        store: PathBuf,

        /// Session duration in seconds
        #[arg(short, long)]
        duration: u32,

        /// Focus areas covered, comma-separated (e.g. "neck,lower_back")
        #[arg(short, long, value_delimiter = ',')]
        focus_areas: Vec<CliFocusArea>,

        /// Profile JSON file path (improves scoring context)
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Completion time override, "YYYY-MM-DDTHH:MM" (defaults to now)
        #[arg(long)]
        at: Option<String>,
    },

    /// Print the weekly progress summary
    Summary {
        /// Progress store file path
        #[arg(short, long)]
        store: PathBuf,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Print today's daily insight cards
    Insights {
        /// Profile JSON file path (use - for stdin)
        #[arg(short, long)]
        profile: Option<PathBuf>,

        /// Progress store file path (supplies the weekly summary and cache)
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// Plan JSON file path
        #[arg(long)]
        plan: Option<PathBuf>,

        /// Date override, "YYYY-MM-DD" (defaults to today)
        #[arg(long)]
        date: Option<String>,

        /// Regenerate even if cached insights exist for the day
        #[arg(long)]
        refresh: bool,

        /// Output format
        #[arg(long, default_value = "json-pretty")]
        output_format: OutputFormat,
    },

    /// Diagnose store health and configuration
    Doctor {
        /// Check a progress store file
        #[arg(short, long)]
        store: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Compact JSON
    Json,
    /// Pretty-printed JSON
    JsonPretty,
}

#[derive(Clone, ValueEnum)]
enum CliFocusArea {
    Neck,
    Shoulders,
    UpperBack,
    LowerBack,
    Hips,
    Wrists,
}

impl From<CliFocusArea> for FocusArea {
    fn from(a: CliFocusArea) -> Self {
        match a {
            CliFocusArea::Neck => FocusArea::Neck,
            CliFocusArea::Shoulders => FocusArea::Shoulders,
            CliFocusArea::UpperBack => FocusArea::UpperBack,
            CliFocusArea::LowerBack => FocusArea::LowerBack,
            CliFocusArea::Hips => FocusArea::Hips,
            CliFocusArea::Wrists => FocusArea::Wrists,
        }
    }
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!(
                "{}",
                serde_json::to_string(&CliErrorReport::from(e))
                    .unwrap_or_else(|_| "Unknown error".to_string())
            );
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<(), DeskCliError> {
    match cli.command {
        Commands::Report {
            profile,
            output_format,
        } => cmd_report(&profile, output_format),

        Commands::Record {
            store,
            duration,
            focus_areas,
            profile,
            at,
        } => cmd_record(&store, duration, focus_areas, profile.as_deref(), at),

        Commands::Summary {
            store,
            output_format,
        } => cmd_summary(&store, output_format),

        Commands::Insights {
            profile,
            store,
            plan,
            date,
            refresh,
            output_format,
        } => cmd_insights(
            profile.as_deref(),
            store.as_deref(),
            plan.as_deref(),
            date,
            refresh,
            output_format,
        ),

        Commands::Doctor { store, json } => cmd_doctor(store.as_deref(), json),
    }
}

fn cmd_report(profile: &PathBuf, output_format: OutputFormat) -> Result<(), DeskCliError> {
    let profile = read_profile(profile)?;
    let report = generate_report(&profile);
    println!("{}", format_output(&report, &output_format)?);
    Ok(())
}

fn cmd_record(
    store: &std::path::Path,
    duration: u32,
    focus_areas: Vec<CliFocusArea>,
    profile: Option<&std::path::Path>,
    at: Option<String>,
) -> Result<(), DeskCliError> {
    let profile = profile.map(|p| read_profile(&p.to_path_buf())).transpose()?;
    let now = match at {
        Some(raw) => NaiveDateTime::parse_from_str(&raw, "%Y-%m-%dT%H:%M")
            .map_err(|e| DeskCliError::InvalidInput(format!("Bad --at timestamp: {e}")))?,
        None => Local::now().naive_local(),
    };

    let areas: BTreeSet<FocusArea> = focus_areas.into_iter().map(FocusArea::from).collect();

    let mut repo = ProgressRepository::new(Box::new(JsonFileStore::new(store)), now.date());
    let streak = compute_streak(repo.entries(), now.date());
    repo.record_session_completion(duration, &areas, profile.as_ref(), streak, now);

    match repo.todays_entry(now.date()) {
        Some(entry) => println!("{}", serde_json::to_string_pretty(entry)?),
        None => return Err(DeskCliError::NoEntry),
    }
    Ok(())
}

fn cmd_summary(store: &std::path::Path, output_format: OutputFormat) -> Result<(), DeskCliError> {
    let today = Local::now().date_naive();
    let repo = ProgressRepository::new(Box::new(JsonFileStore::new(store)), today);
    println!("{}", format_output(repo.summary(), &output_format)?);
    Ok(())
}

fn cmd_insights(
    profile: Option<&std::path::Path>,
    store: Option<&std::path::Path>,
    plan: Option<&std::path::Path>,
    date: Option<String>,
    refresh: bool,
    output_format: OutputFormat,
) -> Result<(), DeskCliError> {
    let profile = profile.map(|p| read_profile(&p.to_path_buf())).transpose()?;
    let plan: Option<PlanInfo> = match plan {
        Some(path) => Some(serde_json::from_str(&fs::read_to_string(path)?)?),
        None => None,
    };
    let today = match date {
        Some(raw) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|e| DeskCliError::InvalidInput(format!("Bad --date: {e}")))?,
        None => Local::now().date_naive(),
    };

    let mut repo = store.map(|path| {
        ProgressRepository::new(Box::new(JsonFileStore::new(path)), today)
    });
    let summary = repo.as_ref().map(|r| r.summary().clone());
    let cache = repo.as_ref().and_then(|r| r.insight_cache().cloned());

    let mut engine = DailyInsightEngine::with_cache(Box::new(LogSink), cache);
    let insights = if refresh {
        engine.force_refresh(profile.as_ref(), summary.as_ref(), plan.as_ref(), today)
    } else {
        engine.today(profile.as_ref(), summary.as_ref(), plan.as_ref(), today)
    };

    // Persist the cache so repeated invocations stay stable for the day
    if let (Some(repo), Some(cache)) = (repo.as_mut(), engine.cache()) {
        repo.set_insight_cache(cache.clone());
    }

    println!("{}", format_output(&insights, &output_format)?);
    Ok(())
}

fn cmd_doctor(store: Option<&std::path::Path>, json: bool) -> Result<(), DeskCliError> {
    let mut checks: Vec<DoctorCheck> = Vec::new();

    checks.push(DoctorCheck {
        name: "engine_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Deskcore version {}", ENGINE_VERSION),
    });

    checks.push(DoctorCheck {
        name: "store_version".to_string(),
        status: CheckStatus::Ok,
        message: format!("Progress store schema: v{}", STORE_VERSION),
    });

    if let Some(store_path) = store {
        if store_path.exists() {
            match fs::read_to_string(store_path) {
                Ok(content) => match serde_json::from_str::<serde_json::Value>(&content) {
                    Ok(value) => {
                        let entries = value
                            .get("entries")
                            .and_then(|v| v.as_array())
                            .map(|a| a.len())
                            .unwrap_or(0);
                        checks.push(DoctorCheck {
                            name: "store".to_string(),
                            status: CheckStatus::Ok,
                            message: format!("Store file valid ({} daily entries)", entries),
                        });
                    }
                    Err(e) => {
                        checks.push(DoctorCheck {
                            name: "store".to_string(),
                            status: CheckStatus::Error,
                            message: format!("Invalid store JSON: {}", e),
                        });
                    }
                },
                Err(e) => {
                    checks.push(DoctorCheck {
                        name: "store".to_string(),
                        status: CheckStatus::Error,
                        message: format!("Cannot read store file: {}", e),
                    });
                }
            }
        } else {
            checks.push(DoctorCheck {
                name: "store".to_string(),
                status: CheckStatus::Warning,
                message: "Store file does not exist (a fresh one will be created)".to_string(),
            });
        }
    }

    let stdin_check = if atty::is(atty::Stream::Stdin) {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a TTY (interactive mode)".to_string(),
        }
    } else {
        DoctorCheck {
            name: "stdin".to_string(),
            status: CheckStatus::Ok,
            message: "stdin is a pipe (profile can be streamed)".to_string(),
        }
    };
    checks.push(stdin_check);

    let report = DoctorReport {
        producer: PRODUCER_NAME.to_string(),
        version: ENGINE_VERSION.to_string(),
        checks,
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("Deskcore Doctor Report");
        println!("======================");
        println!("Producer: {}", report.producer);
        println!("Version:  {}", report.version);
        println!("\nChecks:");

        for check in &report.checks {
            let status_icon = match check.status {
                CheckStatus::Ok => "[OK]",
                CheckStatus::Warning => "[WARN]",
                CheckStatus::Error => "[ERR]",
            };
            println!("  {} {}: {}", status_icon, check.name, check.message);
        }
    }

    let has_errors = report
        .checks
        .iter()
        .any(|c| matches!(c.status, CheckStatus::Error));
    if has_errors {
        Err(DeskCliError::DoctorFailed)
    } else {
        Ok(())
    }
}

// Helper functions

fn read_profile(path: &PathBuf) -> Result<ProfileSnapshot, DeskCliError> {
    let data = if path.to_string_lossy() == "-" {
        let mut buffer = String::new();
        io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        fs::read_to_string(path)?
    };
    Ok(serde_json::from_str(&data)?)
}

fn format_output<T: serde::Serialize>(
    value: &T,
    format: &OutputFormat,
) -> Result<String, DeskCliError> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string(value)?),
        OutputFormat::JsonPretty => Ok(serde_json::to_string_pretty(value)?),
    }
}

// Error types

#[derive(Debug)]
enum DeskCliError {
    Io(io::Error),
    Json(serde_json::Error),
    InvalidInput(String),
    NoEntry,
    DoctorFailed,
}

impl From<io::Error> for DeskCliError {
    fn from(e: io::Error) -> Self {
        DeskCliError::Io(e)
    }
}

impl From<serde_json::Error> for DeskCliError {
    fn from(e: serde_json::Error) -> Self {
        DeskCliError::Json(e)
    }
}

#[derive(serde::Serialize)]
struct CliErrorReport {
    code: String,
    message: String,
    hint: Option<String>,
}

impl From<DeskCliError> for CliErrorReport {
    fn from(e: DeskCliError) -> Self {
        match e {
            DeskCliError::Io(e) => CliErrorReport {
                code: "IO_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check file paths and permissions".to_string()),
            },
            DeskCliError::Json(e) => CliErrorReport {
                code: "JSON_ERROR".to_string(),
                message: e.to_string(),
                hint: Some("Check JSON syntax and field names".to_string()),
            },
            DeskCliError::InvalidInput(msg) => CliErrorReport {
                code: "INVALID_INPUT".to_string(),
                message: msg,
                hint: None,
            },
            DeskCliError::NoEntry => CliErrorReport {
                code: "NO_ENTRY".to_string(),
                message: "No entry was recorded for today".to_string(),
                hint: Some("Ensure the session duration is greater than zero".to_string()),
            },
            DeskCliError::DoctorFailed => CliErrorReport {
                code: "DOCTOR_FAILED".to_string(),
                message: "One or more health checks failed".to_string(),
                hint: Some("Review the doctor report for details".to_string()),
            },
        }
    }
}

// Report types

#[derive(serde::Serialize)]
struct DoctorReport {
    producer: String,
    version: String,
    checks: Vec<DoctorCheck>,
}

#[derive(serde::Serialize)]
struct DoctorCheck {
    name: String,
    status: CheckStatus,
    message: String,
}

#[derive(serde::Serialize)]
enum CheckStatus {
    Ok,
    Warning,
    Error,
}
