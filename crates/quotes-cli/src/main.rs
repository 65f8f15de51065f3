use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use quotes_acquire::{FetchConfig, PaperQuotes};
use quotes_index::PickPlan;

const DEFAULT_LANGUAGES: &str = "hi";

/// Exit status for configuration rejected before any work started.
const EXIT_INVALID_CONFIG: u8 = 2;

#[derive(Parser)]
#[command(name = "quotes")]
#[command(about = "Fetch multilingual quotes, bundle them into a JSON index, and pick from it")]
#[command(version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUILD_HASH"), ")"))]
struct Cli {
    /// Log level: error, warn, info, debug, trace
    #[arg(long, global = true, default_value = "info", value_enum)]
    log_level: LogLevel,

    /// Use UTC timestamps instead of local time
    #[arg(long, global = true)]
    utc: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch quotes from the PaperQuotes API into per-language text files
    Fetch {
        /// Output directory for per-language text files
        #[arg(long, default_value = "quotes")]
        out: PathBuf,

        /// Maximum number of pages to fetch per language
        #[arg(long, default_value_t = 50, allow_negative_numbers = true)]
        pages: i64,

        /// Comma-separated list of language codes to fetch
        #[arg(long, default_value = DEFAULT_LANGUAGES)]
        langs: String,

        /// Delay in seconds between API calls
        #[arg(long, default_value_t = 0.2, allow_negative_numbers = true)]
        delay: f64,

        /// Base URL of the quotes API
        #[arg(long, default_value = quotes_acquire::DEFAULT_BASE_URL)]
        api_base: String,
    },

    /// Bundle every quote .txt file into a single JSON index
    Index {
        /// Directory that relative --input and --output paths are resolved against
        #[arg(long, default_value = ".")]
        root: PathBuf,

        /// Directory containing the per-language .txt files
        #[arg(long, default_value = "public/quotes")]
        input: PathBuf,

        /// Path of the JSON index to write
        #[arg(long, default_value = "src/quotes/index.json")]
        output: PathBuf,
    },

    /// Compose a block of random quotes from a JSON index
    Pick {
        /// Path of the JSON index to read
        #[arg(long, default_value = "src/quotes/index.json")]
        index: PathBuf,

        /// Draw COUNT lines from FILE, as FILE=COUNT (repeatable)
        #[arg(long, default_values = ["en.txt=6", "hi.txt=8"])]
        take: Vec<String>,

        /// Lines drawn from one random file not named by --take
        #[arg(long, default_value_t = 1)]
        others: usize,

        /// Text appended after the picked quotes
        #[arg(long, default_value_t)]
        thought: String,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();
    init_tracing(&cli.log_level, cli.utc);

    let status = match cli.command {
        Commands::Fetch {
            out,
            pages,
            langs,
            delay,
            api_base,
        } => {
            let config = FetchConfig {
                out_dir: out,
                pages,
                languages: quotes_acquire::split_languages(&langs),
                delay_secs: delay,
            };
            run_fetch(&config, &api_base).await?
        }
        Commands::Index { root, input, output } => {
            run_index(&root.join(input), &root.join(output))?;
            0
        }
        Commands::Pick {
            index,
            take,
            others,
            thought,
        } => {
            run_pick(&index, &take, others, &thought)?;
            0
        }
    };

    Ok(ExitCode::from(status))
}

fn init_tracing(level: &LogLevel, utc: bool) {
    // Quiet the HTTP stack's connection chatter at debug/trace
    let level = match level {
        LogLevel::Error => "error",
        LogLevel::Warn  => "warn",
        LogLevel::Info  => "info",
        LogLevel::Debug => "debug,hyper_util=info,rustls=info",
        LogLevel::Trace => "trace,hyper_util=info,rustls=info",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    // Timestamp format: 2026-02-14 19:44:09.123 -08:00
    let time_format = "%Y-%m-%d %H:%M:%S%.3f %:z";

    // Logs go to stderr so `pick` output can be piped.
    if utc {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoUtc::new(time_format.to_string()))
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_writer(std::io::stderr)
            .with_env_filter(env_filter)
            .with_timer(tracing_subscriber::fmt::time::ChronoLocal::new(time_format.to_string()))
            .init();
    }
}

/// Run the fetcher. Page failures never change the exit status; only
/// invalid configuration does.
async fn run_fetch(config: &FetchConfig, api_base: &str) -> Result<u8> {
    let client = PaperQuotes::new(api_base).context("Failed to build HTTP client")?;

    match quotes_acquire::fetch_all(&client, config).await {
        Ok(reports) => {
            let quotes: usize = reports.iter().map(|r| r.quotes_written).sum();
            let failed: u32 = reports.iter().map(|r| r.pages_failed).sum();
            tracing::info!(
                languages = reports.len(),
                quotes,
                failed_pages = failed,
                path = %config.out_dir.display(),
                "Fetch complete"
            );
            Ok(0)
        }
        Err(e) if e.is_invalid_config() => {
            tracing::error!("{e}");
            Ok(EXIT_INVALID_CONFIG)
        }
        Err(e) => Err(e.into()),
    }
}

fn run_index(input: &Path, output: &Path) -> Result<usize> {
    tracing::info!(input = %input.display(), output = %output.display(), "Building quotes index");
    let count = quotes_index::build_index(input, output)?;
    println!("Wrote {} with {count} files.", output.display());
    Ok(count)
}

fn run_pick(index_path: &Path, take: &[String], others: usize, thought: &str) -> Result<()> {
    let sources = take
        .iter()
        .map(|t| PickPlan::parse_take(t))
        .collect::<Result<Vec<_>, _>>()?;
    let plan = PickPlan { sources, others };

    let index = quotes_index::load_index(index_path)
        .with_context(|| format!("Failed to load index {}", index_path.display()))?;
    tracing::debug!(files = index.len(), "Loaded quotes index");

    let block = quotes_index::compose_block(&index, &plan, thought, &mut rand::thread_rng());
    println!("{block}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use std::fs;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_fetch_defaults() {
        let cli = Cli::try_parse_from(["quotes", "fetch"]).unwrap();
        match cli.command {
            Commands::Fetch { out, pages, langs, delay, api_base } => {
                assert_eq!(out, PathBuf::from("quotes"));
                assert_eq!(pages, 50);
                assert_eq!(langs, "hi");
                assert_eq!(delay, 0.2);
                assert_eq!(api_base, "https://api.paperquotes.com");
            }
            _ => panic!("expected fetch"),
        }
    }

    #[test]
    fn test_fetch_accepts_negative_pages() {
        let cli = Cli::try_parse_from(["quotes", "fetch", "--pages", "-3"]).unwrap();
        assert!(matches!(cli.command, Commands::Fetch { pages: -3, .. }));
    }

    #[test]
    fn test_pick_defaults() {
        let cli = Cli::try_parse_from(["quotes", "pick"]).unwrap();
        match cli.command {
            Commands::Pick { index, take, others, thought } => {
                assert_eq!(index, PathBuf::from("src/quotes/index.json"));
                assert_eq!(take, vec!["en.txt=6", "hi.txt=8"]);
                assert_eq!(others, 1);
                assert!(thought.is_empty());
            }
            _ => panic!("expected pick"),
        }
    }

    #[tokio::test]
    async fn zero_pages_exits_with_invalid_config() {
        let dir = tempfile::tempdir().unwrap();
        let config = FetchConfig {
            out_dir: dir.path().join("quotes"),
            pages: 0,
            languages: vec!["en".to_string()],
            delay_secs: 0.2,
        };

        // Nothing listens on the discard port; validation must fail first.
        let status = run_fetch(&config, "http://127.0.0.1:9").await.unwrap();
        assert_eq!(status, EXIT_INVALID_CONFIG);
        assert!(!config.out_dir.exists());
    }

    #[test]
    fn test_run_index_missing_dir_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let output = dir.path().join("src/quotes/index.json");
        assert!(run_index(&dir.path().join("public/quotes"), &output).is_err());
        assert!(!output.exists());
    }

    #[test]
    fn test_run_index_then_pick() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("public/quotes");
        fs::create_dir_all(&input).unwrap();
        fs::write(input.join("en.txt"), "hi\n").unwrap();
        fs::write(input.join("fr.txt"), "salut\n").unwrap();
        let output = dir.path().join("src/quotes/index.json");

        assert_eq!(run_index(&input, &output).unwrap(), 2);
        run_pick(&output, &["en.txt=1".to_string()], 1, "").unwrap();
        assert!(run_pick(&output, &["en.txt".to_string()], 1, "").is_err());
    }
}
