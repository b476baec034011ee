//! Per-seed frontier of scored candidate URLs
//!
//! A max-priority queue: the candidate with the highest novelty weight is
//! processed next. A fresh frontier is built for every seed.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

/// A candidate URL queued with its novelty weight
#[derive(Debug, Clone)]
pub struct FrontierEntry {
    /// Novelty weight (higher is processed first)
    pub weight: f64,

    /// The URL to process
    pub url: String,
}

impl FrontierEntry {
    pub fn new(url: impl Into<String>, weight: f64) -> Self {
        Self {
            weight,
            url: url.into(),
        }
    }
}

// Higher weights pop first from the BinaryHeap; equal weights fall back to URL
// order so the queue stays deterministic
impl Ord for FrontierEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.weight
            .total_cmp(&other.weight)
            .then_with(|| other.url.cmp(&self.url))
    }
}

impl PartialOrd for FrontierEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for FrontierEntry {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for FrontierEntry {}

/// Max-weight priority queue of candidates
#[derive(Debug, Default)]
pub struct Frontier {
    heap: BinaryHeap<FrontierEntry>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, url: impl Into<String>, weight: f64) {
        self.heap.push(FrontierEntry::new(url, weight));
    }

    /// Removes and returns the highest-weight entry
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        self.heap.pop()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    pub fn len(&self) -> usize {
        self.heap.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pops_highest_weight_first() {
        let mut frontier = Frontier::new();
        frontier.push("https://a.com/", 3.0);
        frontier.push("https://b.com/", 7.5);
        frontier.push("https://c.com/", 5.0);

        assert_eq!(frontier.len(), 3);
        assert_eq!(frontier.pop().unwrap().url, "https://b.com/");
        assert_eq!(frontier.pop().unwrap().url, "https://c.com/");
        assert_eq!(frontier.pop().unwrap().url, "https://a.com/");
        assert!(frontier.pop().is_none());
        assert!(frontier.is_empty());
    }

    #[test]
    fn test_weight_then_url_ordering() {
        let mut frontier = Frontier::new();
        frontier.push("https://z.com/", 1.0);
        frontier.push("https://a.com/", 1.0);

        assert_eq!(frontier.pop().unwrap().url, "https://a.com/");
        assert_eq!(frontier.pop().unwrap().url, "https://z.com/");
    }

    #[test]
    fn test_zero_and_log_weights_order() {
        let mut frontier = Frontier::new();
        frontier.push("https://small.com/", (10.0f64).ln());
        frontier.push("https://novel.com/", 1700.0);
        frontier.push("https://empty.com/", 0.0);

        let order: Vec<String> = std::iter::from_fn(|| frontier.pop())
            .map(|e| e.url)
            .collect();
        assert_eq!(
            order,
            vec![
                "https://novel.com/",
                "https://small.com/",
                "https://empty.com/"
            ]
        );
    }

    #[test]
    fn test_entry_ordering() {
        let high = FrontierEntry::new("https://a.com/", 2.0);
        let low = FrontierEntry::new("https://a.com/", 1.0);
        assert!(high > low);
        assert_eq!(high, FrontierEntry::new("https://a.com/", 2.0));
    }
}
