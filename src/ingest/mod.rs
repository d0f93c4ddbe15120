//! Bulk ingestion of chat history at startup.
//!
//! One thread per text channel pages backwards through its history, one
//! more fetches the external corpus. Each sends its whole batch over a
//! shared channel; the calling thread is the only consumer and the only
//! writer to the [`WordStore`]. The channel closes once every producer has
//! dropped its sender, which is the join of the fan-out.

pub mod source;
pub mod corpus;
pub mod export;
pub mod retry;

use std::sync::mpsc;
use std::thread;

use crate::config::Config;
use crate::counter::WordStore;
use crate::error::SourceError;
use crate::ingest::corpus::corpus_messages;
use crate::ingest::retry::Backoff;
use crate::ingest::source::{Channel, Guild, Message, MessageSource, TextSource};

/// What one ingestion run did.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Text channels whose history was fetched (fully or partly)
    pub channels_fetched: usize,
    /// Non-text channels, not fetched
    pub channels_skipped: usize,
    /// Channels given up after the retry budget ran out
    pub channels_abandoned: Vec<String>,
    /// Chat messages received, commands included
    pub messages_seen: usize,
    /// Messages not counted because they were commands
    pub commands_skipped: usize,
    /// Corpus lines counted
    pub corpus_lines: usize,
}

impl IngestReport {
    pub fn merge(&mut self, other: IngestReport) {
        self.channels_fetched += other.channels_fetched;
        self.channels_skipped += other.channels_skipped;
        self.channels_abandoned.extend(other.channels_abandoned);
        self.messages_seen += other.messages_seen;
        self.commands_skipped += other.commands_skipped;
        self.corpus_lines += other.corpus_lines;
    }
}

/// History of one channel as far as it could be fetched.
#[derive(Debug, Clone, Default)]
pub struct ChannelHistory {
    pub messages: Vec<Message>,
    /// Paging stopped because the retry budget ran out.
    pub abandoned: bool,
}

enum Batch {
    Channel { name: String, history: ChannelHistory },
    Corpus(Vec<Message>),
}

/// Page backwards through a channel.
///
/// Starts below `last_message_id` and follows the oldest id of each page
/// until a page comes back empty. Failed fetches are retried with backoff;
/// once `config.retry_budget` retries in a row have failed, the messages
/// gathered so far are returned and the channel is marked abandoned.
pub fn fetch_channel_history<S>(source: &S, channel: &Channel, config: &Config) -> ChannelHistory
where
    S: MessageSource + ?Sized,
{
    let mut backoff = Backoff::new(config.retry_delay, config.retry_max_delay, config.retry_budget);
    let mut history = ChannelHistory::default();
    let mut before = channel.last_message_id;

    loop {
        match source.messages(channel.id, config.page_size, before) {
            Ok(page) => {
                let Some(oldest) = page.last() else { break };
                before = Some(oldest.id);
                history.messages.extend(page);
                backoff.reset();
                log::debug!(
                    "fetched {} messages so far on channel {}",
                    history.messages.len(),
                    channel.name
                );
            }
            Err(e) => {
                log::warn!(
                    "fetching channel {} failed (attempt {}): {}",
                    channel.name,
                    backoff.attempts() + 1,
                    e
                );
                if let Err(exhausted) = backoff.wait() {
                    log::error!(
                        "abandoning channel {}: {}; keeping {} messages",
                        channel.name,
                        exhausted,
                        history.messages.len()
                    );
                    history.abandoned = true;
                    break;
                }
            }
        }
    }
    history
}

/// Fetch the corpus and split it into messages of `author`.
/// A failed fetch is logged and yields nothing.
pub fn fetch_corpus<T>(corpus: &T, author: &str) -> Vec<Message>
where
    T: TextSource + ?Sized,
{
    log::info!("fetching corpus for {author}");
    match corpus.fetch_text() {
        Ok(text) => {
            let messages = corpus_messages(&text, author);
            log::info!("corpus for {author} has {} lines", messages.len());
            messages
        }
        Err(e) => {
            log::error!("corpus for {author} unavailable: {e}");
            Vec::new()
        }
    }
}

/// Count every message of a batch, skipping commands.
fn consume(store: &mut WordStore, messages: &[Message], report: &mut IngestReport) {
    for message in messages {
        if !store.build_message(message) {
            report.commands_skipped += 1;
        }
    }
}

/// Ingest the history of every text channel of `guild`, plus `corpus`.
///
/// # Errors
/// Listing the guild's channels failed; nothing was ingested.
pub fn ingest_guild<S, T>(
    store: &mut WordStore,
    source: &S,
    guild: &Guild,
    corpus: Option<&T>,
    config: &Config,
) -> Result<IngestReport, SourceError>
where
    S: MessageSource + ?Sized,
    T: TextSource + ?Sized,
{
    log::info!("parsing guild {}: {}", guild.name, guild.id);
    let channels = source.channels(guild.id)?;
    let mut report = IngestReport::default();

    thread::scope(|scope| {
        let (tx, rx) = mpsc::channel::<Batch>();

        for channel in &channels {
            if !channel.is_text() {
                report.channels_skipped += 1;
                continue;
            }
            log::info!("name: {}, id: {}", channel.name, channel.id);
            let tx = tx.clone();
            scope.spawn(move || {
                let history = fetch_channel_history(source, channel, config);
                let _ = tx.send(Batch::Channel { name: channel.name.clone(), history });
            });
        }

        if let Some(corpus) = corpus {
            let tx = tx.clone();
            let author = config.corpus_author.as_str();
            scope.spawn(move || {
                let _ = tx.send(Batch::Corpus(fetch_corpus(corpus, author)));
            });
        }

        // producers hold the remaining senders
        drop(tx);

        for batch in rx {
            match batch {
                Batch::Channel { name, history } => {
                    report.channels_fetched += 1;
                    report.messages_seen += history.messages.len();
                    if history.abandoned {
                        report.channels_abandoned.push(name);
                    }
                    consume(store, &history.messages, &mut report);
                }
                Batch::Corpus(messages) => {
                    let before = report.commands_skipped;
                    consume(store, &messages, &mut report);
                    report.corpus_lines += messages.len() - (report.commands_skipped - before);
                }
            }
        }
    });

    log::info!(
        "data-parsing done for guild {}: {} channels, {} messages, {} corpus lines",
        guild.name,
        report.channels_fetched,
        report.messages_seen,
        report.corpus_lines
    );
    Ok(report)
}

/// Ingest every guild the source knows. The corpus is fetched once, with
/// the first guild, or on its own when there are no guilds.
///
/// # Errors
/// Listing guilds, or the channels of any guild, failed.
pub fn ingest_all<S, T>(
    store: &mut WordStore,
    source: &S,
    corpus: Option<&T>,
    config: &Config,
) -> Result<IngestReport, SourceError>
where
    S: MessageSource + ?Sized,
    T: TextSource + ?Sized,
{
    let guilds = source.guilds()?;
    let mut corpus = corpus;
    let mut report = IngestReport::default();

    for guild in &guilds {
        report.merge(ingest_guild(store, source, guild, corpus.take(), config)?);
    }

    if let Some(corpus) = corpus {
        let messages = fetch_corpus(corpus, &config.corpus_author);
        let before = report.commands_skipped;
        consume(store, &messages, &mut report);
        report.corpus_lines += messages.len() - (report.commands_skipped - before);
    }

    if !report.channels_abandoned.is_empty() {
        log::warn!("incomplete history for channels: {}", report.channels_abandoned.join(", "));
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ingest::source::{Author, ChannelKind};
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// One channel of `total` messages, ids 1..=total, failing the first
    /// `failures` fetches.
    struct Flaky {
        total: u64,
        failures: usize,
        calls: AtomicUsize,
    }

    impl MessageSource for Flaky {
        fn guilds(&self) -> Result<Vec<Guild>, SourceError> {
            Ok(vec![Guild { id: 1, name: "g".into() }])
        }

        fn channels(&self, _: u64) -> Result<Vec<Channel>, SourceError> {
            Ok(vec![channel(1, ChannelKind::Text, None)])
        }

        fn messages(&self, _: u64, limit: usize, before: Option<u64>) -> Result<Vec<Message>, SourceError> {
            let call = self.calls.fetch_add(1, Ordering::SeqCst);
            if call < self.failures {
                return Err(SourceError::Other("timeout".into()));
            }
            let top = before.map(|b| b - 1).unwrap_or(self.total).min(self.total);
            Ok((1..=top)
                .rev()
                .take(limit)
                .map(|id| Message {
                    id,
                    content: format!("word{id}"),
                    author: Author { username: "u".into(), bot: false },
                })
                .collect())
        }
    }

    fn channel(id: u64, kind: ChannelKind, last: Option<u64>) -> Channel {
        Channel { id, name: format!("c{id}"), kind, last_message_id: last }
    }

    fn fast_config() -> Config {
        Config {
            page_size: 3,
            retry_delay: Duration::ZERO,
            retry_max_delay: Duration::ZERO,
            ..Config::default()
        }
    }

    #[test]
    fn pages_until_empty() {
        let source = Flaky { total: 10, failures: 0, calls: AtomicUsize::new(0) };
        let history = fetch_channel_history(&source, &channel(1, ChannelKind::Text, None), &fast_config());
        let ids: Vec<u64> = history.messages.iter().map(|m| m.id).collect();
        assert_eq!(ids, (1..=10).rev().collect::<Vec<_>>());
        assert!(!history.abandoned);
        // 4 non-empty pages and the empty one
        assert_eq!(source.calls.load(Ordering::SeqCst), 5);
    }

    #[test]
    fn last_message_id_is_exclusive() {
        let source = Flaky { total: 10, failures: 0, calls: AtomicUsize::new(0) };
        let history =
            fetch_channel_history(&source, &channel(1, ChannelKind::Text, Some(10)), &fast_config());
        assert_eq!(history.messages.len(), 9);
        assert_eq!(history.messages.first().map(|m| m.id), Some(9));
    }

    #[test]
    fn transient_failures_are_retried() {
        let source = Flaky { total: 4, failures: 3, calls: AtomicUsize::new(0) };
        let history = fetch_channel_history(&source, &channel(1, ChannelKind::Text, None), &fast_config());
        assert_eq!(history.messages.len(), 4);
        assert!(!history.abandoned);
    }

    #[test]
    fn channel_is_abandoned_after_budget() {
        let source = Flaky { total: 4, failures: usize::MAX, calls: AtomicUsize::new(0) };
        let config = fast_config();
        let history = fetch_channel_history(&source, &channel(1, ChannelKind::Text, None), &config);
        assert!(history.abandoned);
        assert!(history.messages.is_empty());
        // first try plus every retry
        assert_eq!(source.calls.load(Ordering::SeqCst), config.retry_budget as usize + 1);
    }

    #[test]
    fn report_merge_adds_up() {
        let mut a = IngestReport { channels_fetched: 1, messages_seen: 5, ..Default::default() };
        a.merge(IngestReport {
            channels_fetched: 2,
            channels_abandoned: vec!["x".into()],
            corpus_lines: 3,
            ..Default::default()
        });
        assert_eq!(a.channels_fetched, 3);
        assert_eq!(a.messages_seen, 5);
        assert_eq!(a.channels_abandoned, vec!["x".to_string()]);
        assert_eq!(a.corpus_lines, 3);
    }
}
