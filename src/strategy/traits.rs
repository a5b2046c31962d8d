// src/strategy/traits.rs

use std::fmt::Debug;

/// Historical fulfillment ratios available to a demand policy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FulfillmentWeights {
    /// Wp: remitted / presented for the item across the whole network.
    pub item: f64,
    /// Wf: the same ratio aggregated over the item's logical family.
    pub family: f64,
}

/// Turns one branch's historical signals into an estimated yearly demand.
///
/// Implementations must return a non-negative value and must not look at any
/// other branch, so the per-branch results can simply be summed.
pub trait DemandPolicy: Debug + Send + Sync {
    /// # Arguments
    /// * `presented` - Quantity requested by the branch during the period.
    /// * `remitted` - Quantity actually fulfilled during the period.
    /// * `weights` - Item and family fulfillment ratios.
    fn estimate(&self, presented: f64, remitted: f64, weights: &FulfillmentWeights) -> f64;
}
