// src/planning/surplus.rs

use crate::model::{Branch, BranchFigures, InventoryRecord};
use crate::planning::coverage::coverage_ratio;
use crate::planning::demand::DemandEstimate;

/// The source's own "healthy" coverage when judging returns: 6 months.
pub const SOURCE_RETURN_TARGET_YEARS: f64 = 0.5;

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SourceNeed {
    /// Target stock minus what the source holds; positive means short.
    pub deficit: f64,
    pub needs_stock: bool,
}

pub fn source_need(figures: &BranchFigures, yearly_demand: f64) -> SourceNeed {
    let deficit = yearly_demand * SOURCE_RETURN_TARGET_YEARS - figures.on_hand();
    SourceNeed {
        deficit,
        needs_stock: deficit > 0.0,
    }
}

/// Whole units a destination could send back.
///
/// Only stock above `threshold` years of coverage counts, and never more than
/// what is physically on the shelf.
pub fn returnable_quantity(figures: &BranchFigures, yearly_demand: f64, threshold: f64) -> u64 {
    let on_hand = figures.on_hand();
    let coverage = coverage_ratio(on_hand, yearly_demand);
    if coverage <= threshold || figures.stock <= 0.0 {
        return 0;
    }

    let excess = (on_hand - yearly_demand * threshold).min(figures.stock).floor();
    if excess > 0.0 {
        excess as u64
    } else {
        0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BranchExcess {
    pub branch: Branch,
    pub coverage: f64,
    pub quantity: u64,
    pub weight: f64,
    pub volume: f64,
    /// Returning this stock would fill a real gap at the source.
    pub priority: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SurplusReport {
    pub source: Branch,
    pub source_need: SourceNeed,
    /// One entry per non-source branch, in network order.
    pub branches: Vec<BranchExcess>,
}

impl SurplusReport {
    pub fn excess_at(&self, branch: Branch) -> Option<&BranchExcess> {
        self.branches.iter().find(|b| b.branch == branch)
    }
}

/// Flags excess stock at every branch other than `source`.
///
/// Branches are judged independently; nothing is apportioned.
pub fn detect_surplus(
    record: &InventoryRecord,
    demand: &DemandEstimate,
    source: Branch,
    threshold: f64,
) -> SurplusReport {
    let need = source_need(record.branch(source), demand.branch(source));

    let branches = source
        .others()
        .map(|branch| {
            let figures = record.branch(branch);
            let branch_demand = demand.branch(branch);
            let quantity = returnable_quantity(figures, branch_demand, threshold);
            BranchExcess {
                branch,
                coverage: coverage_ratio(figures.on_hand(), branch_demand),
                quantity,
                weight: quantity as f64 * record.weight,
                volume: quantity as f64 * record.volume,
                priority: quantity > 0 && need.needs_stock,
            }
        })
        .collect();

    SurplusReport {
        source,
        source_need: need,
        branches,
    }
}
