use std::collections::{HashSet, VecDeque};

/// A URL waiting to be processed, with its link depth from the root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrontierEntry {
    pub url: String,
    pub depth: usize,
}

impl FrontierEntry {
    pub fn new(url: impl Into<String>, depth: usize) -> Self {
        Self {
            url: url.into(),
            depth,
        }
    }
}

/// Owns the crawl's pending queue and visited set.
///
/// URLs enter once and are popped once; the visited set only grows. The
/// pending set mirrors the queue so a URL is never enqueued twice.
#[derive(Debug, Default)]
pub struct Frontier {
    queue: VecDeque<FrontierEntry>,
    pending: HashSet<String>,
    visited: HashSet<String>,
}

impl Frontier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enqueue a URL unless it is already pending or visited. Returns whether
    /// the entry was accepted.
    pub fn push(&mut self, entry: FrontierEntry) -> bool {
        if self.is_known(&entry.url) {
            return false;
        }
        self.pending.insert(entry.url.clone());
        self.queue.push_back(entry);
        true
    }

    /// Pop the oldest pending entry.
    pub fn pop(&mut self) -> Option<FrontierEntry> {
        let entry = self.queue.pop_front()?;
        self.pending.remove(&entry.url);
        Some(entry)
    }

    pub fn is_visited(&self, url: &str) -> bool {
        self.visited.contains(url)
    }

    /// Whether the URL has been seen at all: visited or still queued.
    pub fn is_known(&self, url: &str) -> bool {
        self.visited.contains(url) || self.pending.contains(url)
    }

    pub fn mark_visited(&mut self, url: &str) {
        self.visited.insert(url.to_string());
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fifo_order() {
        let mut frontier = Frontier::new();
        frontier.push(FrontierEntry::new("http://example.com/a", 0));
        frontier.push(FrontierEntry::new("http://example.com/b", 1));

        assert_eq!(frontier.pop().unwrap().url, "http://example.com/a");
        assert_eq!(frontier.pop().unwrap().url, "http://example.com/b");
        assert!(frontier.pop().is_none());
    }

    #[test]
    fn test_no_duplicate_queueing() {
        let mut frontier = Frontier::new();
        assert!(frontier.push(FrontierEntry::new("http://example.com/a", 0)));
        assert!(!frontier.push(FrontierEntry::new("http://example.com/a", 2)));

        frontier.pop();
        // Still not re-queueable once visited
        frontier.mark_visited("http://example.com/a");
        assert!(!frontier.push(FrontierEntry::new("http://example.com/a", 0)));
    }

    #[test]
    fn test_popped_but_unvisited_can_requeue() {
        let mut frontier = Frontier::new();
        frontier.push(FrontierEntry::new("http://example.com/a", 0));
        frontier.pop();
        assert!(!frontier.is_known("http://example.com/a"));
        assert!(frontier.push(FrontierEntry::new("http://example.com/a", 0)));
    }

    #[test]
    fn test_visited_set_grows_monotonically() {
        let mut frontier = Frontier::new();
        frontier.mark_visited("http://example.com/a");
        frontier.mark_visited("http://example.com/a");
        frontier.mark_visited("http://example.com/b");
        assert_eq!(frontier.visited_count(), 2);
        assert!(frontier.is_visited("http://example.com/a"));
    }
}
