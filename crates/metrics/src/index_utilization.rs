//! Index utilization accumulator
//!
//! Concatenates index usage reports from many partitions. Each report
//! contributes one boxed producer per descriptor list; producers are held
//! side by side and nothing is copied until
//! [`IndexUtilizationAccumulator::result`] drains them in order. No
//! de-duplication is performed; order follows accumulation order.

use qtrace_core::{
    CompositeIndexUtilizationEntity, IndexUtilizationInfo, SingleIndexUtilizationEntity,
};
use std::fmt;

type Lazy<T> = Box<dyn Iterator<Item = T> + Send>;

/// Lazily concatenates [`IndexUtilizationInfo`] reports
#[derive(Default)]
pub struct IndexUtilizationAccumulator {
    utilized_single_indexes: Vec<Lazy<SingleIndexUtilizationEntity>>,
    potential_single_indexes: Vec<Lazy<SingleIndexUtilizationEntity>>,
    utilized_composite_indexes: Vec<Lazy<CompositeIndexUtilizationEntity>>,
    potential_composite_indexes: Vec<Lazy<CompositeIndexUtilizationEntity>>,
}

impl fmt::Debug for IndexUtilizationAccumulator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexUtilizationAccumulator")
            .field("reports", &self.len())
            .finish_non_exhaustive()
    }
}

impl IndexUtilizationAccumulator {
    /// Create an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one report
    pub fn accumulate(&mut self, info: IndexUtilizationInfo) {
        self.accumulate_lazy(
            info.utilized_single_indexes,
            info.potential_single_indexes,
            info.utilized_composite_indexes,
            info.potential_composite_indexes,
        );
    }

    /// Append four descriptor sequences without materializing them
    pub fn accumulate_lazy<US, PS, UC, PC>(
        &mut self,
        utilized_single: US,
        potential_single: PS,
        utilized_composite: UC,
        potential_composite: PC,
    ) where
        US: IntoIterator<Item = SingleIndexUtilizationEntity>,
        US::IntoIter: Send + 'static,
        PS: IntoIterator<Item = SingleIndexUtilizationEntity>,
        PS::IntoIter: Send + 'static,
        UC: IntoIterator<Item = CompositeIndexUtilizationEntity>,
        UC::IntoIter: Send + 'static,
        PC: IntoIterator<Item = CompositeIndexUtilizationEntity>,
        PC::IntoIter: Send + 'static,
    {
        self.utilized_single_indexes
            .push(Box::new(utilized_single.into_iter()));
        self.potential_single_indexes
            .push(Box::new(potential_single.into_iter()));
        self.utilized_composite_indexes
            .push(Box::new(utilized_composite.into_iter()));
        self.potential_composite_indexes
            .push(Box::new(potential_composite.into_iter()));
    }

    /// Number of reports appended
    pub fn len(&self) -> usize {
        self.utilized_single_indexes.len()
    }

    /// Check whether nothing has been appended
    pub fn is_empty(&self) -> bool {
        self.utilized_single_indexes.is_empty()
    }

    /// Materialize the concatenated report
    pub fn result(self) -> IndexUtilizationInfo {
        IndexUtilizationInfo {
            utilized_single_indexes: drain(self.utilized_single_indexes),
            potential_single_indexes: drain(self.potential_single_indexes),
            utilized_composite_indexes: drain(self.utilized_composite_indexes),
            potential_composite_indexes: drain(self.potential_composite_indexes),
        }
    }
}

// Producers are pulled one after another, never nested.
fn drain<T>(producers: Vec<Lazy<T>>) -> Vec<T> {
    producers.into_iter().flatten().collect()
}
