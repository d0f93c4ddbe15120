use std::time::Duration;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::SourceError;
use crate::ingest::source::{Author, Message, TextSource};

/// Section headers of the speech corpus, not content.
static HEADER_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^SPEECH \d+").unwrap()
});

/// Plain-text corpus served over HTTP(S).
pub struct HttpCorpus {
    url: String,
    client: reqwest::blocking::Client,
}

impl HttpCorpus {
    pub fn new(url: impl Into<String>) -> Result<Self, SourceError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;
        Ok(Self { url: url.into(), client })
    }
}

impl TextSource for HttpCorpus {
    fn fetch_text(&self) -> Result<String, SourceError> {
        let response = self.client.get(&self.url).send()?.error_for_status()?;
        Ok(response.text()?)
    }
}

/// Turn corpus text into messages of one synthetic bot author.
///
/// Empty lines and `SPEECH <n>` headers are dropped. The author is a bot
/// so the lines are counted under its own group only, never in `"all"`.
pub fn corpus_messages(text: &str, author: &str) -> Vec<Message> {
    let author = Author { username: author.to_string(), bot: true };
    text.split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.is_empty() && !HEADER_LINE.is_match(line))
        .map(|line| Message { id: 0, content: line.to_string(), author: author.clone() })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn headers_and_blank_lines_are_skipped() {
        let text = "SPEECH 1\nThank you very much.\n\nSPEECH 12\r\nWe will win.\r\nSPEECHES are long\n";
        let msgs = corpus_messages(text, "trump");
        let lines: Vec<&str> = msgs.iter().map(|m| m.content.as_str()).collect();
        assert_eq!(lines, vec!["Thank you very much.", "We will win.", "SPEECHES are long"]);
        assert!(msgs.iter().all(|m| m.author.username == "trump" && m.author.bot));
    }

    #[test]
    fn empty_corpus_has_no_messages() {
        assert!(corpus_messages("", "x").is_empty());
        assert!(corpus_messages("\n\n", "x").is_empty());
    }
}
