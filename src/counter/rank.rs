use std::fmt::{self, Debug, Display};

use num::{Num, Unsigned};

use crate::counter::{display_name, sanitize::sanitize_word, WordStore};
use crate::error::CountError;

/// Ranked (key, count) entries, keys being words or group names.
///
/// Sorting is by count with the key as a lexical tie-breaker, so equal
/// counts always come out in the same order.
pub struct Ranking<K, N = u64>
where
    N: Num + Unsigned + Copy + Ord,
{
    /// (key, count)
    pub list: Vec<(K, N)>,
}

impl<K, N> Ranking<K, N>
where
    K: Ord,
    N: Num + Unsigned + Copy + Ord,
{
    pub fn new(list: Vec<(K, N)>) -> Self {
        Ranking { list }
    }

    /// Sort by descending count
    pub fn sort_by_count(&mut self) -> &mut Self {
        self.list.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        self
    }

    /// Sort by ascending count
    pub fn sort_by_count_rev(&mut self) -> &mut Self {
        self.list.sort_by(|a, b| a.1.cmp(&b.1).then_with(|| a.0.cmp(&b.0)));
        self
    }

    /// Keep the first `n` entries
    pub fn truncate(&mut self, n: usize) -> &mut Self {
        self.list.truncate(n);
        self
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.list.len()
    }

    /// Rendered lines, `"{rank}. {key}: {count}"` with 1-based rank.
    pub fn lines(&self) -> Vec<String>
    where
        K: Display,
        N: Display,
    {
        self.list
            .iter()
            .enumerate()
            .map(|(i, (key, count))| format!("{}. {}: {}", i + 1, key, count))
            .collect()
    }
}

impl<K, N> Display for Ranking<K, N>
where
    K: Ord + Display,
    N: Num + Unsigned + Copy + Ord + Display,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.lines().join("\n"))
    }
}

impl<K, N> Debug for Ranking<K, N>
where
    K: Debug,
    N: Num + Unsigned + Copy + Ord + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            writeln!(f, "Ranking [")?;
            for (key, count) in &self.list {
                writeln!(f, "    {:?}: {:?}", key, count)?;
            }
            write!(f, "]")
        } else {
            f.debug_list().entries(&self.list).finish()
        }
    }
}

impl WordStore {
    /// Top words of `target`, at most `n` entries.
    ///
    /// When no group is called `target`, the target is taken as a word and
    /// the result ranks groups by how often they used it instead
    /// (see [`WordStore::rank_groups_by_word`]).
    ///
    /// # Errors
    /// * `EmptyGroup` - the group exists but has no words
    /// * `NobodySaid` / `EmptyWord` - from the cross-group fallback
    pub fn top_words(&self, target: &str, n: usize) -> Result<Ranking<String>, CountError> {
        let Some(group) = self.group(target) else {
            log::debug!("no group {target:?}, ranking groups by word instead");
            return self.rank_groups_by_word(target, n);
        };

        let mut ranking: Ranking<String> = Ranking::new(
            group.words().iter().map(|(word, count)| (word.to_string(), count)).collect(),
        );
        ranking.sort_by_count().truncate(n);

        if ranking.is_empty() {
            return Err(CountError::EmptyGroup(target.to_string()));
        }
        Ok(ranking)
    }

    /// Groups that used `word` the most, at most `n` entries.
    /// Only user groups included in `"all"` take part.
    ///
    /// # Errors
    /// * `EmptyWord` - `word` is only punctuation
    /// * `NobodySaid` - no included group has used it
    pub fn rank_groups_by_word(&self, word: &str, n: usize) -> Result<Ranking<String>, CountError> {
        let word = sanitize_word(word);
        if word.is_empty() {
            return Err(CountError::EmptyWord);
        }

        let mut ranking: Ranking<String> = Ranking::new(
            self.included_groups()
                .filter_map(|(name, group)| {
                    group.words().word_count(&word).map(|count| (name.to_string(), count))
                })
                .collect(),
        );
        ranking.sort_by_count().truncate(n);

        if ranking.is_empty() {
            return Err(CountError::NobodySaid(word));
        }
        Ok(ranking)
    }

    /// How often `group_name` said `word`, as a sentence.
    ///
    /// # Returns
    /// * `"{group} has said {word} {count} times"`, or a "never said"
    ///   sentence when the word is absent. `"all"` is shown as `"everyone"`.
    ///
    /// # Errors
    /// * `UnknownGroup` - no such group
    /// * `EmptyWord` - `word` is only punctuation
    pub fn single_word_count(&self, group_name: &str, word: &str) -> Result<String, CountError> {
        let Some(group) = self.group(group_name) else {
            return Err(CountError::UnknownGroup(group_name.to_string()));
        };

        let word = sanitize_word(word);
        log::debug!("single word count for {group_name:?}, sanitized word {word:?}");
        if word.is_empty() {
            return Err(CountError::EmptyWord);
        }

        let shown = display_name(group_name);
        Ok(match group.words().word_count(&word) {
            Some(count) => format!("{shown} has said {word} {count} times"),
            None => format!("{shown} has never said {word}"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::counter::AGGREGATE_GROUP;

    fn sample() -> WordStore {
        let mut store = WordStore::new();
        store.build("Hello, world!", "alice", true);
        store.build("hello world", "bob", true);
        store.build("http://example.com/x cat", "carol", true);
        store
    }

    #[test]
    fn sort_breaks_ties_lexically() {
        let mut r = Ranking::new(vec![("b", 2u64), ("a", 2), ("c", 5), ("d", 1)]);
        r.sort_by_count();
        assert_eq!(r.list, vec![("c", 5), ("a", 2), ("b", 2), ("d", 1)]);
        r.sort_by_count_rev();
        assert_eq!(r.list, vec![("d", 1), ("a", 2), ("b", 2), ("c", 5)]);
    }

    #[test]
    fn ranking_renders_numbered_lines() {
        let r = Ranking::new(vec![("x".to_string(), 3u64), ("y".to_string(), 1)]);
        assert_eq!(r.to_string(), "1. x: 3\n2. y: 1");
        assert_eq!(Ranking::<String>::new(Vec::new()).to_string(), "");
    }

    #[test]
    fn top_words_for_aggregate() {
        let store = sample();
        let r = store.top_words(AGGREGATE_GROUP, 5).unwrap();
        assert_eq!(r.lines(), vec!["1. hello: 2", "2. world: 2", "3. cat: 1"]);
        let r = store.top_words(AGGREGATE_GROUP, 2).unwrap();
        assert_eq!(r.len(), 2);
    }

    #[test]
    fn top_words_strips_urls() {
        let store = sample();
        assert_eq!(store.top_words("carol", 5).unwrap().lines(), vec!["1. cat: 1"]);
    }

    #[test]
    fn unknown_target_falls_back_to_word_ranking() {
        let mut store = sample();
        store.build("cat cat", "dan", true);
        store.build("cat", "robot", false);
        let r = store.top_words("cat", 5).unwrap();
        assert_eq!(r.lines(), vec!["1. dan: 2", "2. carol: 1"]);
    }

    #[test]
    fn fallback_caps_at_display_limit() {
        let mut store = WordStore::new();
        for i in 0..8 {
            store.build("ping", &format!("user{i}"), true);
        }
        assert_eq!(store.rank_groups_by_word("ping", 5).unwrap().len(), 5);
    }

    #[test]
    fn fallback_errors() {
        let store = sample();
        assert!(matches!(store.top_words("zebra", 5), Err(CountError::NobodySaid(w)) if w == "zebra"));
        assert!(matches!(store.top_words("???", 5), Err(CountError::EmptyWord)));
    }

    #[test]
    fn single_word_count_sentences() {
        let store = sample();
        assert_eq!(
            store.single_word_count(AGGREGATE_GROUP, "World!").unwrap(),
            "everyone has said world 2 times"
        );
        assert_eq!(store.single_word_count("alice", "hello").unwrap(), "alice has said hello 1 times");
        assert_eq!(store.single_word_count("alice", "cat").unwrap(), "alice has never said cat");
    }

    #[test]
    fn single_word_count_errors() {
        let store = sample();
        assert!(matches!(store.single_word_count("nobody", "x"), Err(CountError::UnknownGroup(_))));
        assert!(matches!(store.single_word_count("alice", "(?)"), Err(CountError::EmptyWord)));
    }
}
