// src/planning/demand.rs

use crate::model::{Branch, InventoryRecord};
use crate::strategy::{DemandPolicy, FulfillmentWeights};

/// Estimated yearly demand of one record.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct DemandEstimate {
    pub per_branch: [f64; 4],
    /// Always the sum of `per_branch`, never estimated from network totals.
    pub total: f64,
}

impl DemandEstimate {
    pub fn branch(&self, branch: Branch) -> f64 {
        self.per_branch[branch.index()]
    }
}

pub fn estimate_demand(
    record: &InventoryRecord,
    policy: &dyn DemandPolicy,
    weights: &FulfillmentWeights,
) -> DemandEstimate {
    let mut per_branch = [0.0; 4];
    for branch in Branch::ALL {
        let figures = record.branch(branch);
        per_branch[branch.index()] = policy.estimate(figures.presented, figures.remitted, weights);
    }

    DemandEstimate {
        per_branch,
        total: per_branch.iter().sum(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BranchFigures;
    use crate::strategy::{HistoricalPolicy, TheoreticalPolicy};

    fn figures(presented: f64, remitted: f64) -> BranchFigures {
        BranchFigures {
            presented,
            remitted,
            ..BranchFigures::default()
        }
    }

    fn sample() -> InventoryRecord {
        InventoryRecord::new("A1")
            .with_branch(Branch::Sf, figures(10.0, 0.0))
            .with_branch(Branch::Ba, figures(8.0, 10.0))
            .with_branch(Branch::Mdz, figures(12.0, 10.0))
            .with_branch(Branch::Slt, figures(0.3, 0.1))
            .with_totals_from_branches()
    }

    #[test]
    fn historical_per_branch_values() {
        let estimate = estimate_demand(&sample(), &HistoricalPolicy, &FulfillmentWeights::default());
        assert_eq!(estimate.branch(Branch::Sf), 5.0);
        assert_eq!(estimate.branch(Branch::Ba), 10.0);
        assert_eq!(estimate.branch(Branch::Mdz), 11.0);
    }

    #[test]
    fn total_is_exact_sum_under_both_methods() {
        let weights = FulfillmentWeights {
            item: 0.3,
            family: 0.7,
        };
        let record = sample();
        let policies: [&dyn DemandPolicy; 2] = [&HistoricalPolicy, &TheoreticalPolicy];
        for policy in policies {
            let estimate = estimate_demand(&record, policy, &weights);
            let sum: f64 = Branch::ALL.iter().map(|b| estimate.branch(*b)).sum();
            assert_eq!(estimate.total, sum);
        }
    }

    #[test]
    fn missing_branch_signals_mean_zero_demand() {
        let estimate = estimate_demand(
            &InventoryRecord::new("EMPTY"),
            &HistoricalPolicy,
            &FulfillmentWeights::default(),
        );
        assert_eq!(estimate.total, 0.0);
    }
}
