//! Vote Tally
//!
//! Per-session mapping from dish name to vote count. Keys are fixed at
//! initialization and keep their insertion order, which is also the
//! tie-break order when the tally is sorted for display.

use serde::Serialize;
use std::collections::HashMap;
use thiserror::Error;

/// Acknowledgment shown after a successful vote
pub const VOTE_ACK_MESSAGE: &str = "투표가 완료되었습니다! 소중한 한 표 감사합니다.";

/// Errors raised by tally operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TallyError {
    /// The dish is not one of the initialized choices
    #[error("Unknown dish: {0}")]
    UnknownDish(String),
}

/// One dish and its vote count
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TallyEntry {
    pub dish: String,
    pub count: u64,
}

/// Result of a recorded vote
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct VoteReceipt {
    pub dish: String,
    /// Count after this vote
    pub count: u64,
    pub message: &'static str,
}

/// Vote counts for one session
#[derive(Debug, Clone, Default)]
pub struct VoteTally {
    entries: Vec<TallyEntry>,
    index: HashMap<String, usize>,
    initialized: bool,
}

impl VoteTally {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed every key with a zero count.
    ///
    /// Runs once; calling it again on an initialized tally changes nothing
    /// and returns `false`. Repeated keys keep their first position.
    pub fn initialize<I, S>(&mut self, keys: I) -> bool
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        if self.initialized {
            return false;
        }

        for key in keys {
            let key = key.into();
            if self.index.contains_key(&key) {
                continue;
            }
            self.index.insert(key.clone(), self.entries.len());
            self.entries.push(TallyEntry {
                dish: key,
                count: 0,
            });
        }

        self.initialized = true;
        tracing::debug!(choices = self.entries.len(), "Vote tally initialized");
        true
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Add one vote for `dish`
    pub fn record_vote(&mut self, dish: &str) -> Result<VoteReceipt, TallyError> {
        let idx = *self
            .index
            .get(dish)
            .ok_or_else(|| TallyError::UnknownDish(dish.to_string()))?;

        let entry = &mut self.entries[idx];
        entry.count += 1;

        Ok(VoteReceipt {
            dish: entry.dish.clone(),
            count: entry.count,
            message: VOTE_ACK_MESSAGE,
        })
    }

    pub fn count(&self, dish: &str) -> Option<u64> {
        self.index.get(dish).map(|&idx| self.entries[idx].count)
    }

    pub fn contains(&self, dish: &str) -> bool {
        self.index.contains_key(dish)
    }

    /// Choices in insertion order
    pub fn choices(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.dish.as_str())
    }

    /// Entries by count descending; equal counts keep insertion order
    pub fn sorted(&self) -> Vec<TallyEntry> {
        let mut sorted = self.entries.clone();
        sorted.sort_by(|a, b| b.count.cmp(&a.count));
        sorted
    }

    pub fn total_votes(&self) -> u64 {
        self.entries.iter().map(|e| e.count).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> VoteTally {
        let mut tally = VoteTally::new();
        tally.initialize(["Bibimbap", "Kimchi Soup", "Bulgogi"]);
        tally
    }

    #[test]
    fn test_initialize_zeroes_exact_keys() {
        let tally = seeded();

        assert!(tally.is_initialized());
        assert_eq!(tally.len(), 3);
        for dish in ["Bibimbap", "Kimchi Soup", "Bulgogi"] {
            assert_eq!(tally.count(dish), Some(0));
        }
        assert_eq!(tally.count("Ramen"), None);
    }

    #[test]
    fn test_reinitialize_is_noop_not_reset() {
        let mut tally = seeded();
        tally.record_vote("Bibimbap").unwrap();

        assert!(!tally.initialize(["Ramen"]));
        assert_eq!(tally.count("Bibimbap"), Some(1));
        assert!(!tally.contains("Ramen"));
        assert_eq!(tally.len(), 3);
    }

    #[test]
    fn test_duplicate_keys_collapse() {
        let mut tally = VoteTally::new();
        tally.initialize(["A", "B", "A"]);
        assert_eq!(tally.choices().collect::<Vec<_>>(), vec!["A", "B"]);
    }

    #[test]
    fn test_record_vote_n_times() {
        let mut tally = seeded();
        for n in 1..=5 {
            let receipt = tally.record_vote("Kimchi Soup").unwrap();
            assert_eq!(receipt.count, n);
            assert_eq!(receipt.message, VOTE_ACK_MESSAGE);
        }

        assert_eq!(tally.count("Kimchi Soup"), Some(5));
        assert_eq!(tally.count("Bibimbap"), Some(0));
        assert_eq!(tally.count("Bulgogi"), Some(0));
        assert_eq!(tally.total_votes(), 5);
    }

    #[test]
    fn test_vote_unknown_dish() {
        let mut tally = seeded();
        assert_eq!(
            tally.record_vote("Ramen"),
            Err(TallyError::UnknownDish("Ramen".to_string()))
        );
        assert_eq!(tally.total_votes(), 0);
    }

    #[test]
    fn test_vote_before_initialize() {
        let mut tally = VoteTally::new();
        assert!(tally.record_vote("Bibimbap").is_err());
    }

    #[test]
    fn test_sorted_example() {
        let mut tally = VoteTally::new();
        tally.initialize(["Bibimbap", "Kimchi Soup"]);
        tally.record_vote("Bibimbap").unwrap();
        tally.record_vote("Bibimbap").unwrap();
        tally.record_vote("Kimchi Soup").unwrap();

        let sorted: Vec<_> = tally
            .sorted()
            .into_iter()
            .map(|e| (e.dish, e.count))
            .collect();
        assert_eq!(
            sorted,
            vec![("Bibimbap".to_string(), 2), ("Kimchi Soup".to_string(), 1)]
        );
    }

    #[test]
    fn test_sorted_ties_keep_insertion_order() {
        let mut tally = VoteTally::new();
        tally.initialize(["A", "B", "C", "D"]);
        tally.record_vote("C").unwrap();
        tally.record_vote("D").unwrap();

        let order: Vec<_> = tally.sorted().into_iter().map(|e| e.dish).collect();
        assert_eq!(order, vec!["C", "D", "A", "B"]);
    }

    #[test]
    fn test_sorted_is_non_increasing() {
        let mut tally = VoteTally::new();
        tally.initialize(["a", "b", "c", "d", "e"]);
        for (i, dish) in ["c", "a", "c", "e", "c", "a", "b"].iter().enumerate() {
            tally.record_vote(dish).unwrap();
            let sorted = tally.sorted();
            assert!(
                sorted.windows(2).all(|w| w[0].count >= w[1].count),
                "order broke after vote {}",
                i
            );
        }
    }
}
