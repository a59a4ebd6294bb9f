//! Lexicographic enumeration of k-subsets of `0..n`.
//!
//! The fuzzy search uses each subset as the set of query words to ignore.
//! Subsets come out in combinadic order, so for the same number of omitted
//! words the earlier query words are dropped first:
//!
//! ```text
//!   n = 4, k = 2:  [0,1] [0,2] [0,3] [1,2] [1,3] [2,3]
//! ```

/// Iterator over every way to choose `k` indices out of `0..n`.
///
/// Starts at `[0, 1, .., k-1]`. Each step advances the rightmost index that
/// can still move and resets the indices to its right to consecutive
/// values; iteration ends when the leftmost index cannot advance. `k == 0`
/// yields a single empty combination and `k > n` yields nothing.
#[derive(Debug, Clone)]
pub struct Combinations {
    n: usize,
    indices: Vec<usize>,
    started: bool,
    done: bool,
}

impl Combinations {
    pub fn new(n: usize, k: usize) -> Self {
        Self {
            n,
            indices: (0..k).collect(),
            started: false,
            done: k > n,
        }
    }

    /// Move to the next combination in place. Returns `false` when exhausted.
    fn advance(&mut self) -> bool {
        let k = self.indices.len();
        // Index `i` can still move while it is below its last possible slot.
        let Some(pivot) = (0..k).rev().find(|&i| self.indices[i] < self.n - k + i) else {
            return false;
        };
        self.indices[pivot] += 1;
        for i in pivot + 1..k {
            self.indices[i] = self.indices[i - 1] + 1;
        }
        true
    }
}

impl Iterator for Combinations {
    type Item = Vec<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        if self.started && !self.advance() {
            self.done = true;
            return None;
        }
        self.started = true;
        Some(self.indices.clone())
    }
}

/// Number of k-subsets of an n-element set.
pub fn binomial(n: usize, k: usize) -> usize {
    if k > n {
        return 0;
    }
    let k = k.min(n - k);
    (0..k).fold(1, |acc, i| acc * (n - i) / (i + 1))
}
