//! `!count` and `!emoji` as typed in chat.

use crate::config::Config;
use crate::counter::{emoji::RankOrder, WordStore, AGGREGATE_GROUP, COMMAND_PREFIX};
use crate::error::CountError;
use crate::ingest::source::{EmojiLookup, Snowflake};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Count(Vec<String>),
    Emoji(Vec<String>),
    Other(String),
}

impl Command {
    /// `None` when `content` is not a command at all.
    pub fn parse(content: &str) -> Option<Command> {
        let rest = content.strip_prefix(COMMAND_PREFIX)?;
        let mut parts = rest.split_whitespace();
        let name = parts.next()?.to_lowercase();
        let args: Vec<String> = parts.map(str::to_string).collect();
        Some(match name.as_str() {
            "count" => Command::Count(args),
            "emoji" => Command::Emoji(args),
            _ => Command::Other(name),
        })
    }
}

/// `!count` by arity:
/// - no args: top words of everyone
/// - `target`: top words of that group, or who said `target` the most
/// - `target word`: how often the group said the word
pub fn count(store: &WordStore, args: &[String], limit: usize) -> Result<String, CountError> {
    match args {
        [] => Ok(store.top_words(AGGREGATE_GROUP, limit)?.to_string()),
        [target] => Ok(store.top_words(target, limit)?.to_string()),
        [target, word] => store.single_word_count(target, word),
        _ => Err(CountError::Arity(args.len())),
    }
}

/// `!emoji [top|bottom] [n]`
pub fn emoji<L>(
    store: &WordStore,
    lookup: &L,
    guild_id: Snowflake,
    args: &[String],
    limit: usize,
) -> Result<String, CountError>
where
    L: EmojiLookup + ?Sized,
{
    let mut order = RankOrder::Top;
    let mut n = limit;
    for arg in args {
        match arg.to_lowercase().as_str() {
            "top" => order = RankOrder::Top,
            "bottom" => order = RankOrder::Bottom,
            other => match other.parse::<usize>() {
                Ok(parsed) if parsed > 0 => n = parsed,
                _ => return Err(CountError::BadArgument(arg.clone())),
            },
        }
    }

    let ranking = store.rank_emojis(lookup, guild_id, order, n)?;
    if ranking.is_empty() {
        return Ok("no emojis used yet".to_string());
    }
    Ok(ranking.to_string())
}

/// Answers commands against one store and one guild.
pub struct Responder<'a, L: ?Sized> {
    store: &'a WordStore,
    emojis: &'a L,
    guild_id: Snowflake,
    config: &'a Config,
}

impl<'a, L> Responder<'a, L>
where
    L: EmojiLookup + ?Sized,
{
    pub fn new(store: &'a WordStore, emojis: &'a L, guild_id: Snowflake, config: &'a Config) -> Self {
        Self { store, emojis, guild_id, config }
    }

    pub fn respond(&self, command: &Command) -> Result<String, CountError> {
        let result = match command {
            Command::Count(args) => count(self.store, args, self.config.display_limit),
            Command::Emoji(args) => {
                emoji(self.store, self.emojis, self.guild_id, args, self.config.display_limit)
            }
            Command::Other(name) => Err(CountError::UnknownCommand(name.clone())),
        };
        match &result {
            Err(e) if e.is_input_error() => log::debug!("{command:?} rejected: {e}"),
            Err(e) => log::error!("{command:?} failed: {e}"),
            Ok(_) => {}
        }
        result
    }
}
