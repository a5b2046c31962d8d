// src/planning/summary.rs

use crate::model::{Branch, Family};
use crate::planning::config::MONTHS_PER_YEAR;
use crate::planning::engine::{PlanOutcome, ReplenishmentLine, ReturnLine};
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-branch totals shown next to the detailed table.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BranchSummary {
    pub branch: String,
    /// Items with a non-zero quantity moving to or from the branch.
    pub items: usize,
    pub units: u64,
    pub weight: f64,
    pub volume: f64,
    /// Return mode: items whose return would cover a source deficit.
    pub priority_items: usize,
    /// Replenishment mode: items under one month of coverage before shipping.
    pub at_risk_items: usize,
    /// At-risk items the shipment brings back to at least one month.
    pub rescued_items: usize,
    /// Replenishment mode: items still under one month of coverage after shipping.
    pub critical_items: usize,
}

/// Totals for one family at one branch, only for families that move stock.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FamilySummary {
    pub branch: String,
    pub family: Family,
    pub items: usize,
    pub units: u64,
    pub weight: f64,
    pub volume: f64,
    pub priority_items: usize,
}

const ONE_MONTH_YEARS: f64 = 1.0 / MONTHS_PER_YEAR;

pub fn summarize(outcome: &PlanOutcome) -> Vec<BranchSummary> {
    match outcome {
        PlanOutcome::Replenishment(lines) => summarize_replenishment(lines),
        PlanOutcome::Return(lines) => summarize_returns(lines),
        PlanOutcome::Empty(_) => Vec::new(),
    }
}

fn summarize_replenishment(lines: &[ReplenishmentLine]) -> Vec<BranchSummary> {
    let Some(source) = lines.first().map(|l| l.allocation.source) else {
        return Vec::new();
    };

    source
        .others()
        .map(|branch| {
            let mut summary = BranchSummary {
                branch: branch.code().to_string(),
                ..BranchSummary::default()
            };
            for line in lines {
                let shipped = line.allocation.shipped_to(branch);
                if shipped > 0 {
                    summary.items += 1;
                    summary.units += shipped;
                    summary.weight += shipped as f64 * line.item.record.weight;
                    summary.volume += shipped as f64 * line.item.record.volume;
                }

                // zero-demand branches never deplete, so they are never at risk
                if line.item.demand.branch(branch) <= 0.0 {
                    continue;
                }
                let before = line.coverage.branch(branch).coverage;
                let after = line.final_coverage[branch.index()];
                if before < ONE_MONTH_YEARS {
                    summary.at_risk_items += 1;
                    if after >= ONE_MONTH_YEARS {
                        summary.rescued_items += 1;
                    }
                }
                if after < ONE_MONTH_YEARS {
                    summary.critical_items += 1;
                }
            }
            summary
        })
        .collect()
}

fn summarize_returns(lines: &[ReturnLine]) -> Vec<BranchSummary> {
    let Some(source) = lines.first().map(|l| l.surplus.source) else {
        return Vec::new();
    };

    source
        .others()
        .map(|branch: Branch| {
            let mut summary = BranchSummary {
                branch: branch.code().to_string(),
                ..BranchSummary::default()
            };
            for excess in lines.iter().filter_map(|l| l.surplus.excess_at(branch)) {
                if excess.quantity == 0 {
                    continue;
                }
                summary.items += 1;
                summary.units += excess.quantity;
                summary.weight += excess.weight;
                summary.volume += excess.volume;
                if excess.priority {
                    summary.priority_items += 1;
                }
            }
            summary
        })
        .collect()
}

/// Per (branch, family) totals of what moves, in branch then family order.
pub fn summarize_by_family(outcome: &PlanOutcome) -> Vec<FamilySummary> {
    // (units, weight, volume, priority) per moving item
    let mut moves: Vec<(Branch, Family, u64, f64, f64, bool)> = Vec::new();
    match outcome {
        PlanOutcome::Replenishment(lines) => {
            for line in lines {
                let record = &line.item.record;
                for request in &line.allocation.requests {
                    let units = line.allocation.shipped_to(request.branch);
                    moves.push((
                        request.branch,
                        line.item.family,
                        units,
                        units as f64 * record.weight,
                        units as f64 * record.volume,
                        false,
                    ));
                }
            }
        }
        PlanOutcome::Return(lines) => {
            for line in lines {
                for excess in &line.surplus.branches {
                    moves.push((
                        excess.branch,
                        line.item.family,
                        excess.quantity,
                        excess.weight,
                        excess.volume,
                        excess.priority,
                    ));
                }
            }
        }
        PlanOutcome::Empty(_) => {}
    }

    let mut table: BTreeMap<(Branch, Family), FamilySummary> = BTreeMap::new();
    for (branch, family, units, weight, volume, priority) in moves {
        if units == 0 {
            continue;
        }
        let entry = table.entry((branch, family)).or_insert_with(|| FamilySummary {
            branch: branch.code().to_string(),
            family,
            items: 0,
            units: 0,
            weight: 0.0,
            volume: 0.0,
            priority_items: 0,
        });
        entry.items += 1;
        entry.units += units;
        entry.weight += weight;
        entry.volume += volume;
        if priority {
            entry.priority_items += 1;
        }
    }
    table.into_values().collect()
}
