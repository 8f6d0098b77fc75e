//! Occurrence bounds tracking
//!
//! Elements carry a minimum and maximum occurrence count within their parent's
//! content model. Bounds only ever widen as more observations arrive: a missing
//! element drops the minimum to zero, a repeated element lifts the maximum.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Upper occurrence bound; `Unbounded` dominates any finite bound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum MaxOccurs {
    Bounded(u32),
    Unbounded,
}

impl MaxOccurs {
    pub fn max(self, other: Self) -> Self {
        match (self, other) {
            (MaxOccurs::Bounded(a), MaxOccurs::Bounded(b)) => MaxOccurs::Bounded(a.max(b)),
            _ => MaxOccurs::Unbounded,
        }
    }
}

impl fmt::Display for MaxOccurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MaxOccurs::Bounded(n) => write!(f, "{}", n),
            MaxOccurs::Unbounded => write!(f, "unbounded"),
        }
    }
}

/// Occurrence bounds of an element within its parent.
///
/// Invariant: `min <= max` whenever `max` is finite.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurs {
    pub min: u32,
    pub max: MaxOccurs,
}

impl Occurs {
    /// Exactly once; the bounds of a freshly observed singular element.
    pub const ONCE: Occurs = Occurs {
        min: 1,
        max: MaxOccurs::Bounded(1),
    };

    pub fn new(min: u32, max: MaxOccurs) -> Self {
        Self { min, max }
    }

    /// Seed bounds from one sibling group containing `count` occurrences.
    ///
    /// A repeat within a single group widens the maximum straight to
    /// unbounded: the model tracks min/max bounds, not exact repetition
    /// counts, so any observed repetition is generalized conservatively.
    pub fn from_group_count(count: u32) -> Self {
        if count <= 1 {
            Occurs::ONCE
        } else {
            Occurs {
                min: count,
                max: MaxOccurs::Unbounded,
            }
        }
    }

    /// Combine bounds from two independent observation groups.
    pub fn merge(self, other: Self) -> Self {
        Occurs {
            min: self.min.min(other.min),
            max: self.max.max(other.max),
        }
    }

    /// The element was missing from a sibling group where it could have
    /// appeared.
    pub fn observe_absent(&mut self) {
        self.min = 0;
    }

    pub fn is_required(&self) -> bool {
        self.min > 0
    }
}

impl fmt::Display for Occurs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}
