// src/planning/weights.rs

use crate::model::{Family, InventoryRecord};
use crate::strategy::FulfillmentWeights;
use std::collections::BTreeMap;
use tracing::debug;

/// Zero presented quantities are replaced by 1 before dividing.
fn ratio(remitted: f64, presented: f64) -> f64 {
    let presented = if presented == 0.0 { 1.0 } else { presented };
    remitted / presented
}

/// Wp for a single record.
pub fn item_weight(record: &InventoryRecord) -> f64 {
    ratio(record.remitted_total, record.presented_total)
}

/// Immutable Wf lookup produced by the aggregation pass.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FamilyWeights {
    table: BTreeMap<Family, f64>,
}

impl FamilyWeights {
    /// Sums remitted and presented totals per family and divides.
    ///
    /// `families[i]` is the family of `records[i]`.
    pub fn aggregate(records: &[InventoryRecord], families: &[Family]) -> Self {
        let mut sums: BTreeMap<Family, (f64, f64)> = BTreeMap::new();
        for (record, family) in records.iter().zip(families) {
            let entry = sums.entry(*family).or_insert((0.0, 0.0));
            entry.0 += record.remitted_total;
            entry.1 += record.presented_total;
        }

        let table = sums
            .into_iter()
            .map(|(family, (remitted, presented))| (family, ratio(remitted, presented)))
            .collect::<BTreeMap<_, _>>();
        debug!(families = table.len(), "family weights aggregated");

        Self { table }
    }

    /// Wf, or 0 for a family with no members.
    pub fn family(&self, family: Family) -> f64 {
        self.table.get(&family).copied().unwrap_or(0.0)
    }

    pub fn weights_for(&self, record: &InventoryRecord, family: Family) -> FulfillmentWeights {
        FulfillmentWeights {
            item: item_weight(record),
            family: self.family(family),
        }
    }
}
