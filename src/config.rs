//! Runtime configuration from environment variables.

use std::env;
use std::time::Duration;

/// Corpus ingested next to the chat history unless disabled.
pub const DEFAULT_CORPUS_URL: &str =
    "https://raw.githubusercontent.com/ryanmcdermott/trump-speeches/master/speeches.txt";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Entries shown by ranked queries
    pub display_limit: usize,

    /// Messages requested per history page
    pub page_size: usize,

    /// Failed page fetches tolerated per channel before it is abandoned
    pub retry_budget: u32,

    /// First retry delay, doubled on every further failure
    pub retry_delay: Duration,

    /// Upper bound for the retry delay
    pub retry_max_delay: Duration,

    /// External corpus, `None` when disabled
    pub corpus_url: Option<String>,

    /// Group the corpus lines are counted under
    pub corpus_author: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            display_limit: 5,
            page_size: 100,
            retry_budget: 10,
            retry_delay: Duration::from_millis(250),
            retry_max_delay: Duration::from_millis(5_000),
            corpus_url: Some(DEFAULT_CORPUS_URL.to_string()),
            corpus_author: "trump".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `WORD_TALLY_DISPLAY_LIMIT` (default: 5)
    /// - `WORD_TALLY_PAGE_SIZE` (default: 100)
    /// - `WORD_TALLY_RETRY_BUDGET` (default: 10)
    /// - `WORD_TALLY_RETRY_DELAY_MS` (default: 250)
    /// - `WORD_TALLY_RETRY_MAX_DELAY_MS` (default: 5000)
    /// - `WORD_TALLY_CORPUS_URL` (default: the speeches corpus, empty disables)
    /// - `WORD_TALLY_CORPUS_AUTHOR` (default: trump)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`Config::from_env`] with a custom variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let parsed = |key: &str| lookup(key).and_then(|s| s.trim().parse::<u64>().ok());

        Self {
            display_limit: parsed("WORD_TALLY_DISPLAY_LIMIT")
                .and_then(|n| usize::try_from(n).ok())
                .filter(|&n| n > 0)
                .unwrap_or(defaults.display_limit),

            page_size: parsed("WORD_TALLY_PAGE_SIZE")
                .and_then(|n| usize::try_from(n).ok())
                .filter(|&n| n > 0)
                .unwrap_or(defaults.page_size),

            retry_budget: parsed("WORD_TALLY_RETRY_BUDGET")
                .and_then(|n| u32::try_from(n).ok())
                .unwrap_or(defaults.retry_budget),

            retry_delay: parsed("WORD_TALLY_RETRY_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_delay),

            retry_max_delay: parsed("WORD_TALLY_RETRY_MAX_DELAY_MS")
                .map(Duration::from_millis)
                .unwrap_or(defaults.retry_max_delay),

            corpus_url: match lookup("WORD_TALLY_CORPUS_URL") {
                Some(url) if url.trim().is_empty() => None,
                Some(url) => Some(url.trim().to_string()),
                None => defaults.corpus_url,
            },

            corpus_author: lookup("WORD_TALLY_CORPUS_AUTHOR")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .unwrap_or(defaults.corpus_author),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::from_lookup(|_| None);
        assert_eq!(config, Config::default());
        assert_eq!(config.display_limit, 5);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.retry_budget, 10);
        assert_eq!(config.corpus_author, "trump");
        assert_eq!(config.corpus_url.as_deref(), Some(DEFAULT_CORPUS_URL));
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup_from(&[
            ("WORD_TALLY_DISPLAY_LIMIT", "10"),
            ("WORD_TALLY_PAGE_SIZE", "50"),
            ("WORD_TALLY_RETRY_BUDGET", "3"),
            ("WORD_TALLY_RETRY_DELAY_MS", "0"),
            ("WORD_TALLY_CORPUS_URL", ""),
            ("WORD_TALLY_CORPUS_AUTHOR", "lincoln"),
        ]));
        assert_eq!(config.display_limit, 10);
        assert_eq!(config.page_size, 50);
        assert_eq!(config.retry_budget, 3);
        assert_eq!(config.retry_delay, Duration::ZERO);
        assert_eq!(config.corpus_url, None);
        assert_eq!(config.corpus_author, "lincoln");
    }

    #[test]
    fn test_invalid_values_fall_back() {
        let config = Config::from_lookup(lookup_from(&[
            ("WORD_TALLY_DISPLAY_LIMIT", "0"),
            ("WORD_TALLY_PAGE_SIZE", "many"),
            ("WORD_TALLY_RETRY_BUDGET", "-1"),
        ]));
        assert_eq!(config.display_limit, 5);
        assert_eq!(config.page_size, 100);
        assert_eq!(config.retry_budget, 10);
    }

    #[test]
    fn test_out_of_range_values_are_not_truncated() {
        let config = Config::from_lookup(lookup_from(&[
            ("WORD_TALLY_PAGE_SIZE", "18446744073709551615"),
            ("WORD_TALLY_RETRY_BUDGET", "4294967296"),
        ]));
        assert_eq!(config.page_size, usize::try_from(u64::MAX).unwrap_or(100));
        assert_eq!(config.retry_budget, 10);
    }
}
