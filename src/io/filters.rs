// src/io/filters.rs

use crate::model::InventoryRecord;
use tracing::info;

/// Stock groups for items kept on demand or immobilized; never planned.
pub const ON_DEMAND_GROUPS: [&str; 5] = [
    "DNS - A DEMANDA",
    "DNS - INMOVILIZADO",
    "TURBO - INMOVILIZADO",
    "FILTROS KTN - INMOVILIZADO",
    "TURBO - A DEMANDA",
];

/// Independent pre-filters, all enabled by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterOptions {
    pub skip_disabled: bool,
    pub skip_without_stock: bool,
    pub skip_without_demand: bool,
    pub skip_on_demand_groups: bool,
}

impl Default for FilterOptions {
    fn default() -> Self {
        Self {
            skip_disabled: true,
            skip_without_stock: true,
            skip_without_demand: true,
            skip_on_demand_groups: true,
        }
    }
}

impl FilterOptions {
    pub fn none() -> Self {
        Self {
            skip_disabled: false,
            skip_without_stock: false,
            skip_without_demand: false,
            skip_on_demand_groups: false,
        }
    }

    pub fn keeps(&self, record: &InventoryRecord) -> bool {
        if self.skip_disabled && record.disabled {
            return false;
        }
        if self.skip_on_demand_groups && is_on_demand_group(&record.stock_group) {
            return false;
        }
        if self.skip_without_stock && record.stock_total <= 0.0 {
            return false;
        }
        if self.skip_without_demand && record.presented_total <= 0.0 && record.remitted_total <= 0.0
        {
            return false;
        }
        true
    }
}

pub fn is_on_demand_group(group: &str) -> bool {
    let group = group.trim().to_uppercase();
    ON_DEMAND_GROUPS.contains(&group.as_str())
}

pub fn apply_filters(records: Vec<InventoryRecord>, options: &FilterOptions) -> Vec<InventoryRecord> {
    let before = records.len();
    let kept: Vec<InventoryRecord> = records.into_iter().filter(|r| options.keeps(r)).collect();
    info!(before, after = kept.len(), "pre-filters applied");
    kept
}
