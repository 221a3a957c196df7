// src/crawl/frontier.rs
// =============================================================================
// The crawl frontier: which pages are still to visit and which we have seen.
//
// How it works:
// 1. Seeds go into the queue at depth 0
// 2. next() pops the oldest item that has not been visited, and marks it
// 3. discover() queues the links of a visited page at depth + 1, but only if
//    that depth is still allowed and the page is neither visited nor queued
//
// Because the queue is FIFO and links are added in page order, pages are
// visited breadth-first and ties follow the order links appear on the page.
//
// Everything is keyed by Target::key(), so "Rust", "Rust_" and
// "https://en.wikipedia.org/wiki/Rust" are one page.
// =============================================================================

use std::collections::{HashSet, VecDeque};

use crate::fetch::Target;

// Represents a page in the crawl queue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlItem {
    pub target: Target,
    pub depth: usize, // How many link hops from the seed
}

#[derive(Debug)]
pub struct Frontier {
    queue: VecDeque<CrawlItem>,
    visited: HashSet<String>,
    queued: HashSet<String>,
    max_depth: usize,
}

impl Frontier {
    pub fn new(max_depth: usize) -> Self {
        Frontier {
            queue: VecDeque::new(),
            visited: HashSet::new(),
            queued: HashSet::new(),
            max_depth,
        }
    }

    /// Queues a seed at depth 0. Returns false if it was already known.
    pub fn seed(&mut self, target: Target) -> bool {
        self.push(target, 0)
    }

    /// Pops the next unvisited item and marks it visited
    pub fn next(&mut self) -> Option<CrawlItem> {
        while let Some(item) = self.queue.pop_front() {
            let key = item.target.key();
            self.queued.remove(&key);

            if self.visited.insert(key) {
                return Some(item);
            }
        }
        None
    }

    // Queues up to `limit` new titles found on `parent`
    //
    // Returns how many were actually added. Nothing is added when the
    // children would be deeper than max_depth.
    pub fn discover<I>(&mut self, parent: &CrawlItem, titles: I, limit: usize) -> usize
    where
        I: IntoIterator<Item = String>,
    {
        let depth = parent.depth + 1;
        if depth > self.max_depth {
            return 0;
        }

        let mut added = 0;
        for title in titles {
            if added >= limit {
                break;
            }
            if self.push(Target::Title(title), depth) {
                added += 1;
            }
        }
        added
    }

    /// Records a key as visited (e.g. the article a redirect landed on).
    /// Returns false if it was visited already.
    pub fn mark_visited(&mut self, key: String) -> bool {
        self.visited.insert(key)
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    fn push(&mut self, target: Target, depth: usize) -> bool {
        if depth > self.max_depth {
            return false;
        }

        let key = target.key();
        if key.is_empty() || self.visited.contains(&key) || !self.queued.insert(key) {
            return false;
        }

        self.queue.push_back(CrawlItem { target, depth });
        true
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why two sets (visited and queued)?
//    - visited = pages we already took out of the queue
//    - queued  = pages waiting in the queue right now
//    - Checking both keeps a page from being queued twice before its turn
//
// 2. Why does next() loop?
//    - A page can be marked visited after it was queued (for example when a
//      redirect lands on it), so stale items are dropped on the way out
//
// 3. Why `I: IntoIterator<Item = String>`?
//    - Callers can pass a Vec, an iterator chain, or anything else that yields
//      owned titles, without collecting first
// -----------------------------------------------------------------------------
