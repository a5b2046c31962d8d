// src/model/record.rs

use crate::model::branch::{Branch, BranchFigures};

/// One SKU row as it comes out of the loader.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryRecord {
    // Identity
    pub code: String,
    pub description: String,

    // Classification input
    pub subfamily: String,
    pub subfamily2: String,
    pub stock_group: String,
    pub disabled: bool,

    // Logistics
    pub lot_size: u32, // units per box or kit, at least 1
    pub weight: f64,
    pub volume: f64,

    // Network totals
    pub presented_total: f64,
    pub remitted_total: f64,
    pub stock_total: f64,

    pub branches: [BranchFigures; 4],
}

impl InventoryRecord {
    pub fn new(code: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            lot_size: 1,
            ..Self::default()
        }
    }

    pub fn branch(&self, branch: Branch) -> &BranchFigures {
        &self.branches[branch.index()]
    }

    pub fn branch_mut(&mut self, branch: Branch) -> &mut BranchFigures {
        &mut self.branches[branch.index()]
    }

    /// Lot size with non-positive values treated as single units.
    pub fn lot(&self) -> u32 {
        self.lot_size.max(1)
    }

    /// Builder used by tests and the sample generator.
    pub fn with_branch(mut self, branch: Branch, figures: BranchFigures) -> Self {
        self.branches[branch.index()] = figures;
        self
    }

    /// Recomputes network totals from the per-branch figures.
    pub fn with_totals_from_branches(mut self) -> Self {
        self.presented_total = self.branches.iter().map(|b| b.presented).sum();
        self.remitted_total = self.branches.iter().map(|b| b.remitted).sum();
        self.stock_total = self.branches.iter().map(|b| b.stock).sum();
        self
    }
}
