//! Interfaces of the chat platform and the corpus host.
//!
//! The counter only needs a handful of read operations from the outside
//! world; these traits are that surface. Implementations must be `Sync`
//! because history is fetched from one thread per channel.

use serde::Deserialize;

use crate::counter::COMMAND_PREFIX;
use crate::error::SourceError;

/// Platform ids are 64-bit snowflakes; newer items have larger ids.
pub type Snowflake = u64;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Author {
    pub username: String,
    #[serde(default)]
    pub bot: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Message {
    pub id: Snowflake,
    pub content: String,
    pub author: Author,
}

impl Message {
    /// Content starting with `!` is a command and is never counted.
    #[inline]
    pub fn is_command(&self) -> bool {
        self.content.starts_with(COMMAND_PREFIX)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChannelKind {
    Text,
    Voice,
    Category,
    News,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Channel {
    pub id: Snowflake,
    pub name: String,
    pub kind: ChannelKind,
    /// Exclusive upper bound for the first history page.
    pub last_message_id: Option<Snowflake>,
}

impl Channel {
    #[inline]
    pub fn is_text(&self) -> bool {
        self.kind == ChannelKind::Text
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Guild {
    pub id: Snowflake,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct GuildEmoji {
    pub id: Snowflake,
    pub name: String,
    #[serde(default)]
    pub animated: bool,
}

/// Read access to chat history.
pub trait MessageSource: Sync {
    /// Guilds (community contexts) visible to the bot.
    fn guilds(&self) -> Result<Vec<Guild>, SourceError>;

    /// Every channel of a guild, of any kind.
    fn channels(&self, guild_id: Snowflake) -> Result<Vec<Channel>, SourceError>;

    /// Up to `limit` messages of a channel older than `before`, newest first.
    /// With `before == None` paging starts at the newest message.
    fn messages(
        &self,
        channel_id: Snowflake,
        limit: usize,
        before: Option<Snowflake>,
    ) -> Result<Vec<Message>, SourceError>;
}

/// Custom emojis registered in a guild.
pub trait EmojiLookup {
    fn guild_emojis(&self, guild_id: Snowflake) -> Result<Vec<GuildEmoji>, SourceError>;
}

/// A remote plain-text resource.
pub trait TextSource: Sync {
    fn fetch_text(&self) -> Result<String, SourceError>;
}
