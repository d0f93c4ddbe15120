/// This crate keeps word frequency tables for a chat community,
/// one per author plus an aggregate, and answers ranking queries on them.
pub mod counter;
pub mod ingest;
pub mod command;
pub mod config;
pub mod error;

/// Word Store
/// The top-level struct of this crate: word counts per group name.
///
/// A group is created the first time a word is counted for it and is never
/// removed. Author groups are either included in the aggregate group
/// `"all"` or not (bot authors are not); that choice is fixed when the group
/// is created. Every word counted for an included group is also counted for
/// `"all"`.
///
/// All mutation goes through `&mut self`, so a single owner is the single
/// writer. Bulk ingestion keeps the store on its consumer thread.
///
/// Queries:
/// - `top_words`: most used words of a group, falling back to ranking
///   groups by a word when the target is not a group
/// - `rank_groups_by_word`: who used a word the most
/// - `single_word_count`: how often a group used one word
/// - `rank_emojis`: guild emoji usage, top or bottom
pub use counter::WordStore;

/// Group kinds and group tables
pub use counter::{Group, GroupKind, AGGREGATE_GROUP};

/// Word Frequency
/// Occurrence counts of canonical words in one group, in first-insertion order.
pub use counter::frequency::WordFrequency;

/// Ranking
/// Ordered (key, count) list produced by queries. Sorted by count with a
/// lexical tie-break, rendered as `"{rank}. {key}: {count}"` lines.
pub use counter::rank::Ranking;

/// Text normalisation shared by counting and queries.
/// - `sanitize_message`: lowercase, strip URLs
/// - `sanitize_word`: lowercase, punctuation to spaces, trim
/// - `tokenize`: split on single spaces
pub use counter::sanitize::{sanitize_message, sanitize_word, tokenize};

/// Rank Order
/// `Top` (most used first) or `Bottom` (least used first) for emoji rankings.
pub use counter::emoji::RankOrder;

/// Ingestion
/// Fan-out history fetch over every text channel with a single consuming writer.
pub use ingest::{ingest_all, ingest_guild, IngestReport};

/// Commands
/// - `Command`: a parsed `!count` / `!emoji` line
/// - `Responder`: answers commands against one store and one guild
pub use command::{Command, Responder};

/// Config
/// Display limit, paging, retry budget and corpus settings read from
/// `WORD_TALLY_*` environment variables.
pub use config::Config;

/// Errors
/// - `CountError`: query failures, shown to the user unless caused by a source
/// - `SourceError`: chat history, emoji lookup and corpus failures
pub use error::{CountError, SourceError};
