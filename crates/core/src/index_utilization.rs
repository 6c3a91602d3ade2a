//! Index utilization report types
//!
//! The backend reports which indexes a query used and which ones it could
//! have used. Reports from several partitions are concatenated, never merged.

use serde::{Deserialize, Serialize};

/// A single-path index the query used or could use
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SingleIndexUtilizationEntity {
    /// Filter expression the index serves
    pub filter_expression: String,
    /// Indexed document path
    pub index_document_expression: String,
    /// Whether the filter can be evaluated at full precision
    pub filter_expression_precision: bool,
    /// Whether the index plan has full fidelity
    pub index_plan_full_fidelity: bool,
    /// Estimated impact ("High", "Low", ...)
    pub index_impact_score: String,
}

/// A composite index the query used or could use
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CompositeIndexUtilizationEntity {
    /// Indexed document paths in index order
    pub index_document_expressions: Vec<String>,
    /// Whether the index plan has full fidelity
    pub index_plan_full_fidelity: bool,
    /// Estimated impact ("High", "Low", ...)
    pub index_impact_score: String,
}

/// Index utilization report
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct IndexUtilizationInfo {
    /// Single indexes that were used
    pub utilized_single_indexes: Vec<SingleIndexUtilizationEntity>,
    /// Single indexes that would have helped
    pub potential_single_indexes: Vec<SingleIndexUtilizationEntity>,
    /// Composite indexes that were used
    pub utilized_composite_indexes: Vec<CompositeIndexUtilizationEntity>,
    /// Composite indexes that would have helped
    pub potential_composite_indexes: Vec<CompositeIndexUtilizationEntity>,
}

impl IndexUtilizationInfo {
    /// Check whether all four descriptor lists are empty
    pub fn is_empty(&self) -> bool {
        self.utilized_single_indexes.is_empty()
            && self.potential_single_indexes.is_empty()
            && self.utilized_composite_indexes.is_empty()
            && self.potential_composite_indexes.is_empty()
    }
}
