pub mod sanitize;
pub mod frequency;
pub mod rank;
pub mod emoji;

use indexmap::IndexMap;
use serde::Serialize;

use crate::counter::{frequency::WordFrequency, sanitize::{sanitize_message, sanitize_word, tokenize}};
use crate::ingest::source::Message;

/// Internal key of the aggregate group.
pub const AGGREGATE_GROUP: &str = "all";

/// How the aggregate group is shown to users.
pub const AGGREGATE_DISPLAY_NAME: &str = "everyone";

/// Messages starting with this are commands, not content.
pub const COMMAND_PREFIX: char = '!';

/// Kind of a group, fixed when the group is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum GroupKind {
    /// One per author. `include_in_all` is false for bot authors.
    User { include_in_all: bool },
    /// The `"all"` group summing every opted-in user group.
    Aggregate,
}

impl GroupKind {
    #[inline]
    pub fn includes_in_all(&self) -> bool {
        matches!(self, GroupKind::User { include_in_all: true })
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Group {
    kind: GroupKind,
    words: WordFrequency,
}

impl Group {
    fn new(kind: GroupKind) -> Self {
        Self { kind, words: WordFrequency::new() }
    }

    #[inline]
    pub fn kind(&self) -> GroupKind {
        self.kind
    }

    #[inline]
    pub fn words(&self) -> &WordFrequency {
        &self.words
    }
}

/// Word counts per group name.
///
/// The store owns every table. Mutation needs `&mut self`, so whoever holds
/// the store is the only writer; the ingestion pipeline keeps it on the
/// consumer side of its result channel and producers never see it.
///
/// Groups are created on first insertion and never removed. A write made
/// with `include_in_all` also counts the word in the aggregate group, so the
/// final counts do not depend on the order messages arrive in.
#[derive(Debug, Clone, Default, Serialize)]
pub struct WordStore {
    groups: IndexMap<Box<str>, Group>,
}

impl WordStore {
    pub fn new() -> Self {
        Self { groups: IndexMap::new() }
    }

    /// Sanitize and tokenize `text`, then count every non-empty word for
    /// `group_name`, and for `"all"` when `include_in_all` is set.
    ///
    /// The group is created with `include_in_all` on first use and keeps
    /// that kind. Whether the words also go to `"all"` is decided by this
    /// call's `include_in_all` alone. Empty or all-punctuation input is a
    /// no-op.
    ///
    /// # Arguments
    /// * `text` - raw message text
    /// * `group_name` - author name; `"all"` addresses the aggregate directly
    /// * `include_in_all` - mirror the words into `"all"`; also the kind of a
    ///   newly created group
    pub fn build(&mut self, text: &str, group_name: &str, include_in_all: bool) {
        let text = sanitize_message(text);
        if text.is_empty() {
            return;
        }
        for token in tokenize(&text) {
            let word = sanitize_word(token);
            if word.is_empty() {
                continue;
            }
            self.put_word(&word, group_name, include_in_all);
        }
    }

    /// Live handler entry: count a chat message under its author.
    /// Commands (content starting with `!`) are skipped; bot authors are
    /// kept out of `"all"`.
    pub fn build_message(&mut self, message: &Message) -> bool {
        if message.is_command() {
            return false;
        }
        self.build(&message.content, &message.author.username, !message.author.bot);
        true
    }

    fn put_word(&mut self, word: &str, group_name: &str, include_in_all: bool) {
        self.group_entry(group_name, include_in_all).words.add_word(word);
        if include_in_all && group_name != AGGREGATE_GROUP {
            self.group_entry(AGGREGATE_GROUP, false).words.add_word(word);
        }
    }

    fn group_entry(&mut self, name: &str, include_in_all: bool) -> &mut Group {
        if !self.groups.contains_key(name) {
            let kind = if name == AGGREGATE_GROUP {
                GroupKind::Aggregate
            } else {
                GroupKind::User { include_in_all }
            };
            log::debug!("creating group {name:?} ({kind:?})");
            self.groups.insert(name.into(), Group::new(kind));
        }
        // inserted above when missing
        &mut self.groups[name]
    }

    #[inline]
    pub fn group_exists(&self, name: &str) -> bool {
        self.groups.contains_key(name)
    }

    #[inline]
    pub fn group(&self, name: &str) -> Option<&Group> {
        self.groups.get(name)
    }

    /// Raw lookup; `word` is expected in canonical form.
    #[inline]
    pub fn word_count(&self, group_name: &str, word: &str) -> Option<u64> {
        self.groups.get(group_name)?.words.word_count(word)
    }

    /// (name, group) pairs in creation order.
    pub fn groups(&self) -> impl Iterator<Item = (&str, &Group)> {
        self.groups.iter().map(|(name, group)| (name.as_ref(), group))
    }

    /// User groups that feed `"all"`.
    pub fn included_groups(&self) -> impl Iterator<Item = (&str, &Group)> {
        self.groups().filter(|(_, group)| group.kind.includes_in_all())
    }

    #[inline]
    pub fn group_num(&self) -> usize {
        self.groups.len()
    }
}

/// User-facing name of a group.
#[inline]
pub fn display_name(group_name: &str) -> &str {
    if group_name == AGGREGATE_GROUP { AGGREGATE_DISPLAY_NAME } else { group_name }
}
