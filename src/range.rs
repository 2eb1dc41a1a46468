//! Component A — the range predicate a single id's value is matched
//! against.

/// A half-open/closed/wildcard interval a supplied value is scored
/// against. Both bounds are inclusive when present.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Range {
    pub min: Option<i64>,
    pub max: Option<i64>,
}

impl Range {
    /// `min` and `max` must already satisfy `min <= max` when both present;
    /// the parser rejects malformed range tokens before constructing one.
    pub fn new(min: Option<i64>, max: Option<i64>) -> Range {
        if let (Some(lo), Some(hi)) = (min, max) {
            debug_assert!(lo <= hi, "range min must not exceed max");
        }
        Range { min, max }
    }

    pub const fn wildcard() -> Range {
        Range {
            min: None,
            max: None,
        }
    }

    /// Score a value against this range: 0 rejects, higher wins.
    pub fn score(&self, v: i64) -> u8 {
        match (self.min, self.max) {
            (None, None) => 1,
            (None, Some(max)) => {
                if v <= max {
                    2
                } else {
                    0
                }
            }
            (Some(min), None) => {
                if v >= min {
                    2
                } else {
                    0
                }
            }
            (Some(min), Some(max)) => {
                if v >= min && v <= max {
                    3
                } else {
                    0
                }
            }
        }
    }

    pub fn contains(&self, v: i64) -> bool {
        self.score(v) > 0
    }
}
