use std::collections::HashMap;
use std::ops::Range;

/// Draws symbol positions from a range without replacement.
///
/// A lazy [Fisher-Yates shuffle](https://en.wikipedia.org/wiki/Fisher%E2%80%93Yates_shuffle):
/// each step consumes exactly one draw from the rng, so the number of draws made for `m` picks is
/// always `m` regardless of the range size.
pub(crate) struct RandomPicker<R> {
    start: usize,
    /// Number of offsets that can still be picked.
    remaining: usize,
    /// Offsets that were displaced by a previous pick. Missing entries hold their own offset.
    displaced: HashMap<usize, usize>,
    rng: R,
}

impl<R> RandomPicker<R>
where
    R: rand::Rng,
{
    pub(crate) fn new(range: Range<usize>, rng: R) -> Self {
        Self {
            start: range.start,
            remaining: range.len(),
            displaced: HashMap::new(),
            rng,
        }
    }

    fn offset_at(&self, slot: usize) -> usize {
        self.displaced.get(&slot).copied().unwrap_or(slot)
    }
}

impl<R> Iterator for RandomPicker<R>
where
    R: rand::Rng,
{
    type Item = usize;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let slot = self.rng.random_range(0..self.remaining);
        let picked = self.offset_at(slot);

        let last = self.remaining - 1;
        self.displaced.insert(slot, self.offset_at(last));
        self.remaining = last;

        Some(self.start + picked)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}
