use std::collections::HashMap;

use once_cell::sync::Lazy;
use rayon::prelude::*;
use regex::Regex;

use crate::counter::{rank::Ranking, Group, WordStore};
use crate::error::CountError;
use crate::ingest::source::{EmojiLookup, GuildEmoji};

/// `<:name:id>` or `<a:name:id>` as stored after word sanitizing.
static EMOJI_REF: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^<a?:(\w+):(\d+)>$").unwrap()
});

/// Direction of a ranking
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RankOrder {
    /// most used first
    Top,
    /// least used first
    Bottom,
}

/// Split an emoji reference token into (name, id).
pub fn parse_emoji_ref(token: &str) -> Option<(&str, u64)> {
    let caps = EMOJI_REF.captures(token)?;
    let name = caps.get(1)?.as_str();
    let id = caps.get(2)?.as_str().parse().ok()?;
    Some((name, id))
}

/// Guild emojis keyed by id, names lowercased like stored words.
struct EmojiTable(HashMap<u64, GuildEmoji>);

impl EmojiTable {
    fn new(emojis: Vec<GuildEmoji>) -> Self {
        EmojiTable(
            emojis
                .into_iter()
                .map(|e| (e.id, GuildEmoji { name: e.name.to_lowercase(), ..e }))
                .collect(),
        )
    }

    /// Id of the guild emoji `token` refers to, if the name matches that id.
    /// Static and animated forms resolve to the same id.
    fn resolve(&self, token: &str) -> Option<u64> {
        let (name, id) = parse_emoji_ref(token)?;
        self.0.get(&id).filter(|known| known.name == name).map(|_| id)
    }

    /// The form an emoji is shown in, `<a:name:id>` for animated ones.
    fn render(&self, id: u64) -> String {
        match self.0.get(&id) {
            Some(e) if e.animated => format!("<a:{}:{}>", e.name, id),
            Some(e) => format!("<:{}:{}>", e.name, id),
            None => id.to_string(),
        }
    }

    fn group_totals(&self, group: &Group) -> HashMap<u64, u64> {
        let mut totals = HashMap::new();
        for (word, count) in group.words().iter() {
            if let Some(id) = self.resolve(word) {
                *totals.entry(id).or_insert(0) += count;
            }
        }
        totals
    }
}

impl WordStore {
    /// Rank the guild's own emojis by how often opted-in users sent them.
    ///
    /// Tokens shaped like emoji references are kept only when `lookup`
    /// knows an emoji with that id and name. Counts are summed per emoji id
    /// over every user group included in `"all"`.
    ///
    /// # Errors
    /// Whatever `lookup` fails with, unchanged.
    pub fn rank_emojis<L>(
        &self,
        lookup: &L,
        guild_id: u64,
        order: RankOrder,
        n: usize,
    ) -> Result<Ranking<String>, CountError>
    where
        L: EmojiLookup + ?Sized,
    {
        let table = EmojiTable::new(lookup.guild_emojis(guild_id)?);

        let groups: Vec<&Group> = self.included_groups().map(|(_, group)| group).collect();
        let totals: HashMap<u64, u64> = groups
            .par_iter()
            .map(|group| table.group_totals(group))
            .reduce(HashMap::new, |mut acc, part| {
                for (id, count) in part {
                    *acc.entry(id).or_insert(0) += count;
                }
                acc
            });

        let mut ranking: Ranking<String> =
            Ranking::new(totals.into_iter().map(|(id, count)| (table.render(id), count)).collect());
        match order {
            RankOrder::Top => ranking.sort_by_count(),
            RankOrder::Bottom => ranking.sort_by_count_rev(),
        };
        ranking.truncate(n);
        Ok(ranking)
    }
}
