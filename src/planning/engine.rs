// src/planning/engine.rs

use crate::error::PlanResult;
use crate::io::filters::apply_filters;
use crate::model::{classify, Branch, Family, InventoryRecord};
use crate::planning::allocation::{allocate, Allocation};
use crate::planning::config::{AnalysisMode, PlanConfig};
use crate::planning::coverage::{compute_coverage, coverage_ratio, CoverageSnapshot};
use crate::planning::demand::{estimate_demand, DemandEstimate};
use crate::planning::surplus::{detect_surplus, SurplusReport};
use crate::planning::weights::FamilyWeights;
use crate::strategy::FulfillmentWeights;
use tracing::{info, instrument};

/// A record with the mode-independent derived fields attached.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedItem {
    pub record: InventoryRecord,
    pub family: Family,
    pub weights: FulfillmentWeights,
    pub demand: DemandEstimate,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReplenishmentLine {
    pub item: PlannedItem,
    pub coverage: CoverageSnapshot,
    pub allocation: Allocation,
    /// Coverage per branch once the shipments land.
    pub final_coverage: [f64; 4],
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReturnLine {
    pub item: PlannedItem,
    pub surplus: SurplusReport,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PlanOutcome {
    Replenishment(Vec<ReplenishmentLine>),
    Return(Vec<ReturnLine>),
    /// Nothing left to plan; carries the reason for the caller.
    Empty(String),
}

impl PlanOutcome {
    pub fn len(&self) -> usize {
        match self {
            PlanOutcome::Replenishment(lines) => lines.len(),
            PlanOutcome::Return(lines) => lines.len(),
            PlanOutcome::Empty(_) => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Batch planner over an in-memory table.
///
/// Runs are pure: the same records and configuration always give the same
/// outcome.
pub struct Planner {
    config: PlanConfig,
}

impl Planner {
    pub fn new(config: PlanConfig) -> PlanResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &PlanConfig {
        &self.config
    }

    #[instrument(skip(self, records), fields(mode = %self.config.mode, rows = records.len()))]
    pub fn run(&self, records: Vec<InventoryRecord>) -> PlanOutcome {
        // =================================================================
        // PHASE 1: FILTER & CLASSIFY
        // =================================================================
        let records = apply_filters(records, &self.config.filters);
        if records.is_empty() {
            return PlanOutcome::Empty("no records left after filtering".to_string());
        }

        let families: Vec<Family> = records
            .iter()
            .map(|r| classify(&r.subfamily, &r.subfamily2))
            .collect();

        // =================================================================
        // PHASE 2: AGGREGATE
        // Family weights see every filtered record, before family selection.
        // =================================================================
        let family_weights = FamilyWeights::aggregate(&records, &families);

        let selected: Vec<(InventoryRecord, Family)> = records
            .into_iter()
            .zip(families)
            .filter(|(_, family)| self.config.families.contains(family))
            .collect();
        if selected.is_empty() {
            return PlanOutcome::Empty("no records for the selected families".to_string());
        }

        // =================================================================
        // PHASE 3: PER-ROW
        // =================================================================
        let policy = self.config.method.policy();
        let items = selected.into_iter().map(|(record, family)| {
            let weights = family_weights.weights_for(&record, family);
            let demand = estimate_demand(&record, policy.as_ref(), &weights);
            PlannedItem {
                record,
                family,
                weights,
                demand,
            }
        });

        match self.config.mode {
            AnalysisMode::Replenishment => {
                let lines: Vec<ReplenishmentLine> =
                    items.map(|item| self.replenish(item)).collect();
                let shipped: u64 = lines.iter().map(|l| l.allocation.total_shipped()).sum();
                info!(
                    items = lines.len(),
                    shipped,
                    source = %self.config.source,
                    "replenishment plan ready"
                );
                PlanOutcome::Replenishment(lines)
            }
            AnalysisMode::Return => {
                let lines: Vec<ReturnLine> = items
                    .map(|item| {
                        let surplus = detect_surplus(
                            &item.record,
                            &item.demand,
                            self.config.source,
                            self.config.return_threshold,
                        );
                        ReturnLine { item, surplus }
                    })
                    .collect();
                let flagged = lines
                    .iter()
                    .filter(|l| l.surplus.branches.iter().any(|b| b.quantity > 0))
                    .count();
                info!(items = lines.len(), flagged, "return analysis ready");
                PlanOutcome::Return(lines)
            }
        }
    }

    fn replenish(&self, item: PlannedItem) -> ReplenishmentLine {
        let source = self.config.source;
        let coverage = compute_coverage(
            &item.record,
            &item.demand,
            source,
            self.config.source_target_years(),
            self.config.destination_target_years(),
        );
        let allocation = allocate(&item.record, item.family, &item.demand, &coverage, source);
        let final_coverage = final_coverage(&item.record, &item.demand, &allocation);

        ReplenishmentLine {
            item,
            coverage,
            allocation,
            final_coverage,
        }
    }
}

/// Post-shipment coverage: destinations add what they receive, the source
/// keeps its inbound and loses what it ships.
pub fn final_coverage(
    record: &InventoryRecord,
    demand: &DemandEstimate,
    allocation: &Allocation,
) -> [f64; 4] {
    let mut result = [0.0; 4];
    for branch in Branch::ALL {
        let figures = record.branch(branch);
        let stock = if branch == allocation.source {
            figures.on_hand() + figures.inbound - allocation.total_shipped() as f64
        } else {
            figures.on_hand() + allocation.shipped_to(branch) as f64
        };
        result[branch.index()] = coverage_ratio(stock, demand.branch(branch));
    }
    result
}
