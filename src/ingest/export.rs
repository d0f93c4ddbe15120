//! Chat history read from a JSON export instead of a live connection.
//!
//! ```json
//! { "guilds": [ {
//!     "id": 1, "name": "home",
//!     "emojis": [ { "id": 10, "name": "pog", "animated": false } ],
//!     "channels": [ {
//!         "id": 100, "name": "general", "kind": "text",
//!         "last_message_id": 3,
//!         "messages": [ { "id": 2, "content": "hi", "author": { "username": "alice", "bot": false } } ]
//!     } ]
//! } ] }
//! ```
//! `kind` defaults to `text`; without `last_message_id` paging starts at
//! the newest message.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::error::SourceError;
use crate::ingest::source::{
    Channel, ChannelKind, EmojiLookup, Guild, GuildEmoji, Message, MessageSource, Snowflake,
};

#[derive(Debug, Deserialize)]
struct ExportFile {
    guilds: Vec<ExportGuild>,
}

#[derive(Debug, Deserialize)]
struct ExportGuild {
    id: Snowflake,
    name: String,
    #[serde(default)]
    emojis: Vec<GuildEmoji>,
    #[serde(default)]
    channels: Vec<ExportChannel>,
}

#[derive(Debug, Deserialize)]
struct ExportChannel {
    id: Snowflake,
    name: String,
    #[serde(default = "text_kind")]
    kind: ChannelKind,
    #[serde(default)]
    last_message_id: Option<Snowflake>,
    #[serde(default)]
    messages: Vec<Message>,
}

fn text_kind() -> ChannelKind {
    ChannelKind::Text
}

impl ExportChannel {
    fn channel(&self) -> Channel {
        Channel {
            id: self.id,
            name: self.name.clone(),
            kind: self.kind,
            last_message_id: self.last_message_id,
        }
    }
}

/// In-memory history loaded from an export file.
#[derive(Debug)]
pub struct ExportSource {
    guilds: Vec<ExportGuild>,
}

impl ExportSource {
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SourceError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    pub fn from_json(text: &str) -> Result<Self, SourceError> {
        let mut file: ExportFile = serde_json::from_str(text)?;
        for channel in file.guilds.iter_mut().flat_map(|g| g.channels.iter_mut()) {
            // newest first, the order pages are served in
            channel.messages.sort_by(|a, b| b.id.cmp(&a.id));
        }
        Ok(Self { guilds: file.guilds })
    }

    fn guild(&self, guild_id: Snowflake) -> Result<&ExportGuild, SourceError> {
        self.guilds
            .iter()
            .find(|g| g.id == guild_id)
            .ok_or(SourceError::UnknownGuild(guild_id))
    }

    fn channel(&self, channel_id: Snowflake) -> Result<&ExportChannel, SourceError> {
        self.guilds
            .iter()
            .flat_map(|g| g.channels.iter())
            .find(|c| c.id == channel_id)
            .ok_or(SourceError::UnknownChannel(channel_id))
    }
}

impl MessageSource for ExportSource {
    fn guilds(&self) -> Result<Vec<Guild>, SourceError> {
        Ok(self
            .guilds
            .iter()
            .map(|g| Guild { id: g.id, name: g.name.clone() })
            .collect())
    }

    fn channels(&self, guild_id: Snowflake) -> Result<Vec<Channel>, SourceError> {
        Ok(self.guild(guild_id)?.channels.iter().map(ExportChannel::channel).collect())
    }

    fn messages(
        &self,
        channel_id: Snowflake,
        limit: usize,
        before: Option<Snowflake>,
    ) -> Result<Vec<Message>, SourceError> {
        let channel = self.channel(channel_id)?;
        Ok(channel
            .messages
            .iter()
            .filter(|m| before.map_or(true, |b| m.id < b))
            .take(limit)
            .cloned()
            .collect())
    }
}

impl EmojiLookup for ExportSource {
    fn guild_emojis(&self, guild_id: Snowflake) -> Result<Vec<GuildEmoji>, SourceError> {
        Ok(self.guild(guild_id)?.emojis.clone())
    }
}
