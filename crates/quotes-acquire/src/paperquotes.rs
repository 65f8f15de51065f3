use std::path::Path;
use std::time::Duration;

use quotes_model::{extract_quotes, language_file_name, QuotePage};
use reqwest::{Client, StatusCode};
use serde_json::Value;

use crate::output;
use crate::sleep::{Sleeper, TokioSleeper};

pub const DEFAULT_BASE_URL: &str = "https://api.paperquotes.com";

/// The API only accepts offsets that are multiples of this.
pub const PAGE_SIZE: u64 = 5;

pub const DEFAULT_MAX_RETRIES: u32 = 1;
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(20);
pub const RETRY_BASE_DELAY: Duration = Duration::from_millis(200);

const ERROR_BODY_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("response is not a JSON object")]
    NotAnObject,

    #[error("response is an empty JSON object")]
    EmptyPayload,
}

/// Why a language stopped requesting pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// A page came back with a falsy `next`.
    NoNextPage,
    /// Every offset in the page budget was attempted.
    BudgetExhausted,
}

/// Outcome of fetching one language. Page failures are counted, not raised.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LanguageReport {
    pub language: String,
    pub pages_requested: u32,
    pub pages_failed: u32,
    pub quotes_written: usize,
    pub stop: StopReason,
}

/// Client for the PaperQuotes listing endpoint.
pub struct PaperQuotes<S = TokioSleeper> {
    http: Client,
    base_url: String,
    max_retries: u32,
    timeout: Duration,
    retry_delay: Duration,
    sleeper: S,
}

impl PaperQuotes {
    pub fn new(base_url: &str) -> Result<Self, reqwest::Error> {
        let http = Client::builder().user_agent(crate::USER_AGENT).build()?;
        Ok(Self::with_client(http, base_url, TokioSleeper))
    }
}

impl<S: Sleeper> PaperQuotes<S> {
    pub fn with_client(http: Client, base_url: &str, sleeper: S) -> Self {
        Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            max_retries: DEFAULT_MAX_RETRIES,
            timeout: REQUEST_TIMEOUT,
            retry_delay: RETRY_BASE_DELAY,
            sleeper,
        }
    }

    /// Override how many extra attempts a page gets and the base of the
    /// linear backoff between them.
    pub fn with_retries(mut self, max_retries: u32, retry_delay: Duration) -> Self {
        self.max_retries = max_retries;
        self.retry_delay = retry_delay;
        self
    }

    pub fn sleeper(&self) -> &S {
        &self.sleeper
    }

    pub fn page_url(&self, language: &str, offset: u64) -> String {
        format!(
            "{}/apiv1/quotes/?lang={language}&offset={offset}",
            self.base_url
        )
    }

    /// Fetch one page, retrying up to `max_retries` extra times.
    ///
    /// Retry `n` waits `retry_delay * n` first. Transport errors, non-200
    /// statuses, and bodies that are not a quote page all count as failed
    /// attempts. When every attempt fails the last error is logged and
    /// `None` is returned; nothing is raised to the caller. An empty `{}`
    /// body is not retried: the page is skipped straight away.
    pub async fn fetch_page(
        &self,
        url: &str,
        max_retries: u32,
        timeout: Duration,
    ) -> Option<QuotePage> {
        let mut attempt = 0;
        loop {
            match self.request_page(url, timeout).await {
                Ok(page) => {
                    tracing::debug!(url = %url, attempt, results = page.result_count(), "Fetched page");
                    return Some(page);
                }
                Err(FetchError::EmptyPayload) => {
                    tracing::warn!(url = %url, "Empty payload, skipping page");
                    return None;
                }
                // Backoff only sits between attempts. The final failure
                // returns at once; the page loop then waits `delay` anyway.
                Err(e) if attempt < max_retries => {
                    attempt += 1;
                    tracing::warn!(url = %url, attempt, "Retrying page: {e}");
                    self.sleeper.sleep(self.retry_delay * attempt).await;
                }
                Err(e) => {
                    tracing::error!(url = %url, attempts = attempt + 1, "Request failed: {e}");
                    return None;
                }
            }
        }
    }

    async fn request_page(&self, url: &str, timeout: Duration) -> Result<QuotePage, FetchError> {
        let response = self.http.get(url).timeout(timeout).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if status != StatusCode::OK {
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: body.chars().take(ERROR_BODY_CHARS).collect(),
            });
        }

        let value: Value = serde_json::from_str(&body)?;
        match value.as_object() {
            None => return Err(FetchError::NotAnObject),
            Some(map) if map.is_empty() => return Err(FetchError::EmptyPayload),
            Some(_) => {}
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Walk offsets `0, 5, 10, ...` for up to `page_budget` pages, appending
    /// every page's quotes to `<output_dir>/<language>.txt`.
    ///
    /// A failed page (fetch, empty payload, or append) is skipped after
    /// sleeping `delay`. Failed fetches and empty payloads leave the
    /// language file untouched.
    /// A page with a falsy `next` ends the language immediately.
    pub async fn fetch_for_language(
        &self,
        language: &str,
        output_dir: &Path,
        page_budget: u32,
        delay: Duration,
    ) -> LanguageReport {
        let target = output_dir.join(language_file_name(language));
        let mut report = LanguageReport {
            language: language.to_string(),
            pages_requested: 0,
            pages_failed: 0,
            quotes_written: 0,
            stop: StopReason::BudgetExhausted,
        };

        tracing::info!(language, pages = page_budget, path = %target.display(), "Fetching quotes");

        for page_index in 0..page_budget {
            let offset = u64::from(page_index) * PAGE_SIZE;
            let url = self.page_url(language, offset);
            report.pages_requested += 1;

            let Some(page) = self.fetch_page(&url, self.max_retries, self.timeout).await else {
                report.pages_failed += 1;
                self.sleeper.sleep(delay).await;
                continue;
            };

            match output::append_quotes(&target, extract_quotes(&page)) {
                Ok(written) => {
                    report.quotes_written += written;
                    tracing::debug!(language, offset, quotes = written, "Appended quotes");
                }
                Err(e) => {
                    tracing::error!(path = %target.display(), offset, "Failed appending quotes: {e}");
                    report.pages_failed += 1;
                    self.sleeper.sleep(delay).await;
                    continue;
                }
            }

            if !page.has_next() {
                report.stop = StopReason::NoNextPage;
                break;
            }

            self.sleeper.sleep(delay).await;
        }

        tracing::info!(
            language,
            requested = report.pages_requested,
            failed = report.pages_failed,
            quotes = report.quotes_written,
            stop = ?report.stop,
            "Finished language"
        );

        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_url() {
        let client = PaperQuotes::new(DEFAULT_BASE_URL).unwrap();
        assert_eq!(
            client.page_url("hi", 15),
            "https://api.paperquotes.com/apiv1/quotes/?lang=hi&offset=15"
        );
    }

    #[test]
    fn test_page_url_trims_trailing_slash() {
        let client = PaperQuotes::new("http://127.0.0.1:9000/").unwrap();
        assert_eq!(
            client.page_url("en", 0),
            "http://127.0.0.1:9000/apiv1/quotes/?lang=en&offset=0"
        );
    }
}
