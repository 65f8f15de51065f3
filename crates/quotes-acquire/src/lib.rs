pub mod output;
pub mod paperquotes;
pub mod sleep;

use std::path::PathBuf;
use std::time::Duration;

pub use paperquotes::{LanguageReport, PaperQuotes, StopReason, DEFAULT_BASE_URL};
pub use sleep::{Sleeper, TokioSleeper};

pub const USER_AGENT: &str = concat!("quotes/", env!("CARGO_PKG_VERSION"));

#[derive(Debug, thiserror::Error)]
pub enum AcquireError {
    #[error("--pages must be a positive integer, got {0}")]
    InvalidPageBudget(i64),

    #[error("--delay must be a non-negative number of seconds, got {0}")]
    InvalidDelay(f64),

    #[error("failed to create output directory {}: {source}", path.display())]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl AcquireError {
    /// True for errors caught by validation before any work started.
    pub fn is_invalid_config(&self) -> bool {
        matches!(self, Self::InvalidPageBudget(_) | Self::InvalidDelay(_))
    }
}

/// Settings for one fetch run, as given on the command line.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub out_dir: PathBuf,
    /// Maximum pages per language. Kept signed so a non-positive value can be
    /// reported instead of rejected by the argument parser.
    pub pages: i64,
    pub languages: Vec<String>,
    /// Pause between page requests, in seconds.
    pub delay_secs: f64,
}

impl FetchConfig {
    pub fn page_budget(&self) -> Result<u32, AcquireError> {
        u32::try_from(self.pages)
            .ok()
            .filter(|&pages| pages > 0)
            .ok_or(AcquireError::InvalidPageBudget(self.pages))
    }

    pub fn delay(&self) -> Result<Duration, AcquireError> {
        Duration::try_from_secs_f64(self.delay_secs)
            .map_err(|_| AcquireError::InvalidDelay(self.delay_secs))
    }
}

/// Split a comma-separated language list, dropping blanks.
pub fn split_languages(csv: &str) -> Vec<String> {
    csv.split(',')
        .map(str::trim)
        .filter(|code| !code.is_empty())
        .map(String::from)
        .collect()
}

/// Fetch every configured language in turn.
///
/// Configuration is validated before the output directory is created or any
/// request is made. Individual page failures never fail the run.
pub async fn fetch_all<S: Sleeper>(
    client: &PaperQuotes<S>,
    config: &FetchConfig,
) -> Result<Vec<LanguageReport>, AcquireError> {
    let pages = config.page_budget()?;
    let delay = config.delay()?;

    std::fs::create_dir_all(&config.out_dir).map_err(|source| AcquireError::CreateDir {
        path: config.out_dir.clone(),
        source,
    })?;

    let mut reports = Vec::with_capacity(config.languages.len());
    for language in &config.languages {
        reports.push(
            client
                .fetch_for_language(language, &config.out_dir, pages, delay)
                .await,
        );
    }

    Ok(reports)
}
