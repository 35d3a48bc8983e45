//! Iterator wrapper that can peek any number of items ahead.

use std::collections::VecDeque;

/// Wraps an iterator so that items can be inspected before being consumed.
///
/// Items pulled ahead by [`Lookahead::lookahead`] are buffered in arrival
/// order and handed out by `next()` before anything new is pulled.
pub struct Lookahead<I: Iterator> {
    iter: I,
    buffer: VecDeque<I::Item>,
}

impl<I: Iterator> Lookahead<I> {
    pub fn new(iter: I) -> Self {
        Self {
            iter,
            buffer: VecDeque::new(),
        }
    }

    /// The item `n` positions ahead without consuming it; `0` is the item
    /// the next call to `next()` returns. `None` if the source ends first.
    pub fn lookahead(&mut self, n: usize) -> Option<&I::Item> {
        while self.buffer.len() <= n {
            let item = self.iter.next()?;
            self.buffer.push_back(item);
        }
        self.buffer.get(n)
    }

    /// Consume the next item if `pred` accepts it.
    pub fn next_if(&mut self, pred: impl FnOnce(&I::Item) -> bool) -> Option<I::Item> {
        if matches!(self.lookahead(0), Some(item) if pred(item)) {
            self.next()
        } else {
            None
        }
    }
}

impl<I: Iterator> Iterator for Lookahead<I> {
    type Item = I::Item;

    fn next(&mut self) -> Option<I::Item> {
        match self.buffer.pop_front() {
            Some(item) => Some(item),
            None => self.iter.next(),
        }
    }
}
