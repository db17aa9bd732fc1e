//! Metrics a collection processor can compute per treebank.

use std::fmt;

/// Per-treebank metrics ("features" in processor parlance).
///
/// The set is deliberately small: these are the four quantities the
/// dependency-distance pipeline consumes downstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TreebankFeature {
    /// Number of nodes of each dependency tree.
    NumNodes,
    /// Sum over all nodes of the squared degree.
    SumSquaredDegrees,
    /// Sum of edge lengths under the attested linear arrangement.
    SumEdgeLengths,
    /// Minimum sum of edge lengths over all linear arrangements.
    MinSumEdgeLengths,
}

impl TreebankFeature {
    /// Every feature, in canonical order.
    pub const ALL: [TreebankFeature; 4] = [
        TreebankFeature::NumNodes,
        TreebankFeature::SumSquaredDegrees,
        TreebankFeature::SumEdgeLengths,
        TreebankFeature::MinSumEdgeLengths,
    ];

    /// Column name used when no override is configured.
    pub fn default_column_name(&self) -> &'static str {
        match self {
            TreebankFeature::NumNodes => "num_nodes",
            TreebankFeature::SumSquaredDegrees => "sum_squared_degrees",
            TreebankFeature::SumEdgeLengths => "sum_edge_lengths",
            TreebankFeature::MinSumEdgeLengths => "min_sum_edge_lengths",
        }
    }
}

impl fmt::Display for TreebankFeature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.default_column_name())
    }
}
