// src/planning/coverage.rs

use crate::model::{Branch, InventoryRecord};
use crate::planning::demand::DemandEstimate;

/// Stand-in for a zero demand in coverage denominators.
pub const EPSILON: f64 = 1e-5;

/// Stock divided by yearly demand, i.e. years of coverage.
///
/// Zero demand yields a very large finite ratio ("no foreseeable depletion").
pub fn coverage_ratio(stock: f64, demand: f64) -> f64 {
    stock / demand.max(EPSILON)
}

/// A branch's target capped by what the whole network can cover.
///
/// Keeps one branch from draining the others to chase a target the network
/// cannot support.
pub fn effective_target(configured_years: f64, global_coverage: f64) -> f64 {
    configured_years.min(global_coverage)
}

/// Positive when the branch holds more than its fair target, negative when short.
pub fn signed_difference(available_stock: f64, demand: f64, effective_target: f64) -> f64 {
    available_stock - demand * effective_target
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BranchCoverage {
    /// Stock counted for this branch's difference.
    pub available: f64,
    /// Initial coverage from physical plus in-transit stock.
    pub coverage: f64,
    pub effective_target: f64,
    pub difference: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CoverageSnapshot {
    pub global: f64,
    pub branches: [BranchCoverage; 4],
}

impl CoverageSnapshot {
    pub fn branch(&self, branch: Branch) -> &BranchCoverage {
        &self.branches[branch.index()]
    }
}

/// Coverage and signed differences for every branch of one record.
///
/// The source counts committed inbound transfers as available; destinations do
/// not, since their inbound is what the allocation is about to decide.
pub fn compute_coverage(
    record: &InventoryRecord,
    demand: &DemandEstimate,
    source: Branch,
    source_target_years: f64,
    destination_target_years: f64,
) -> CoverageSnapshot {
    let global = coverage_ratio(record.stock_total, demand.total);

    let mut branches = [BranchCoverage::default(); 4];
    for branch in Branch::ALL {
        let figures = record.branch(branch);
        let branch_demand = demand.branch(branch);

        let (available, configured) = if branch == source {
            (figures.on_hand() + figures.inbound, source_target_years)
        } else {
            (figures.on_hand(), destination_target_years)
        };
        let target = effective_target(configured, global);

        branches[branch.index()] = BranchCoverage {
            available,
            coverage: coverage_ratio(figures.on_hand(), branch_demand),
            effective_target: target,
            difference: signed_difference(available, branch_demand, target),
        };
    }

    CoverageSnapshot { global, branches }
}
