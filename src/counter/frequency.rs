use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// WordFrequency 構造体
/// Occurrence counts of canonical words inside one group.
///
/// Counts only ever grow; the table is never reset once created.
/// Iteration follows first-insertion order.
///
/// # Examples
/// ```
/// use word_tally::WordFrequency;
/// let mut freq = WordFrequency::new();
/// freq.add_word("hello");
/// freq.add_word("world");
/// freq.add_word("hello");
///
/// assert_eq!(freq.word_count("hello"), Some(2));
/// assert_eq!(freq.word_count("world"), Some(1));
/// assert_eq!(freq.word_count("nope"), None);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct WordFrequency {
    #[serde(with = "indexmap::map::serde_seq")]
    word_count: IndexMap<Box<str>, u64>,
}

/// 追加
impl WordFrequency {
    pub fn new() -> Self {
        WordFrequency {
            word_count: IndexMap::new(),
        }
    }

    /// Count one occurrence of `word`.
    ///
    /// # Arguments
    /// * `word` - canonical word, must not be empty
    #[inline]
    pub fn add_word(&mut self, word: &str) -> &mut Self {
        debug_assert!(!word.is_empty());
        if let Some(count) = self.word_count.get_mut(word) {
            *count += 1;
        } else {
            self.word_count.insert(word.into(), 1);
        }
        self
    }
}

/// 参照
impl WordFrequency {
    /// Occurrences of `word`, `None` if it was never counted.
    #[inline]
    pub fn word_count(&self, word: &str) -> Option<u64> {
        self.word_count.get(word).copied()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.word_count.is_empty()
    }

    /// (word, count) pairs in first-insertion order.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.word_count.iter().map(|(w, &c)| (w.as_ref(), c))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_accumulate_per_word() {
        let mut freq = WordFrequency::new();
        for word in ["a", "b", "a", "c", "a"] {
            freq.add_word(word);
        }
        assert_eq!(freq.word_count("a"), Some(3));
        assert_eq!(freq.word_count("b"), Some(1));
        assert_eq!(freq.word_count("zzz"), None);
    }

    #[test]
    fn iteration_follows_first_insertion() {
        let mut freq = WordFrequency::new();
        freq.add_word("z").add_word("y").add_word("z").add_word("x");
        let order: Vec<(&str, u64)> = freq.iter().collect();
        assert_eq!(order, vec![("z", 2), ("y", 1), ("x", 1)]);
    }

    #[test]
    fn empty_table() {
        let freq = WordFrequency::new();
        assert!(freq.is_empty());
        assert_eq!(freq.iter().count(), 0);
    }
}
