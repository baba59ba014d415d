//! Predicate scan engine
//!
//! Answers the three count queries with full parallel scans of the immutable
//! [`EventStore`](crate::store::EventStore). Every scan is a parallel
//! reduction: workers count matches over disjoint partitions and the partial
//! counts are summed. Counting is associative and commutative, so results
//! are identical for any worker count and scheduling order, and no shared
//! mutable accumulator (and therefore no lock) ever exists.
//!
//! The scan functions are stateless and borrow the store read-only; any
//! number of them may run concurrently against one store.

mod scan;

pub use scan::{count_date_range, count_injury_range, count_location_radius};

/// The query kinds the engine answers, used to address per-kind timing slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueryKind {
    DateRange,
    InjuryRange,
    LocationRadius,
}

impl QueryKind {
    pub(crate) const COUNT: usize = 3;

    /// Timing-slot index for this kind.
    pub(crate) fn slot(self) -> usize {
        match self {
            QueryKind::DateRange => 0,
            QueryKind::InjuryRange => 1,
            QueryKind::LocationRadius => 2,
        }
    }
}
