//! Fuzziness parameters and tier scoring.
//!
//! A tier is an `(omits, delta)` pair: ignore exactly `omits` query words
//! and look in sentences exactly `delta` words longer than the query.
//! Tiers are visited omits-major, delta-minor; the score falls as the
//! search walks further into that grid:
//!
//! ```text
//!   max_omits = 2, max_delta = 2
//!
//!              delta 0   delta 1   delta 2
//!   omits 0       88        77        66
//!   omits 1       55        44        33
//!   omits 2       22        11         1   (0 clamped to 1)
//! ```

use serde::{Deserialize, Serialize};

/// Score of an exact (byte-identical) match.
pub const EXACT_SCORE: u32 = 100;

/// Score reserved for "nothing found".
pub const NO_MATCH_SCORE: u32 = 0;

/// Upper bound of `max_omits` and `max_delta`.
pub const MAX_FUZZINESS: u32 = 1000;

/// Bounds of the approximate search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FuzzyParams {
    /// Query words that may be ignored.
    pub max_omits: u32,
    /// Extra words a matching original may have beyond the query length.
    pub max_delta: u32,
}

impl Default for FuzzyParams {
    fn default() -> Self {
        Self {
            max_omits: 2,
            max_delta: 2,
        }
    }
}

impl FuzzyParams {
    /// Bounds above [`MAX_FUZZINESS`] are clamped to it.
    pub fn new(max_omits: u32, max_delta: u32) -> Self {
        Self {
            max_omits: max_omits.min(MAX_FUZZINESS),
            max_delta: max_delta.min(MAX_FUZZINESS),
        }
    }

    /// Whether both bounds are within [`MAX_FUZZINESS`].
    pub fn is_valid(&self) -> bool {
        self.max_omits <= MAX_FUZZINESS && self.max_delta <= MAX_FUZZINESS
    }

    /// The same parameters with both bounds clamped to [`MAX_FUZZINESS`].
    pub fn clamped(&self) -> Self {
        Self::new(self.max_omits, self.max_delta)
    }

    /// Exact lookups only.
    pub fn exact_only() -> Self {
        Self::new(0, 0)
    }

    /// Score of a hit found at tier `(omits, delta)`.
    ///
    /// Never returns 0 for a tier within bounds; 0 means "no match".
    pub fn score(&self, omits: u32, delta: u32) -> u32 {
        let (max_omits, max_delta) = (u64::from(self.max_omits), u64::from(self.max_delta));
        let omits = u64::from(omits).min(max_omits);
        let delta = u64::from(delta).min(max_delta);

        let omit_part = (max_omits - omits) * 100 / (max_omits + 1);
        let delta_part =
            (max_delta - delta) * 100 / (max_delta + 1).saturating_mul(max_delta + 1);
        // Both parts are at most 100.
        (omit_part + delta_part).max(1) as u32
    }

    /// Tiers in search order, best first.
    pub fn tiers(&self) -> impl Iterator<Item = (u32, u32)> {
        let max_delta = self.max_delta;
        (0..=self.max_omits).flat_map(move |omits| (0..=max_delta).map(move |delta| (omits, delta)))
    }
}
