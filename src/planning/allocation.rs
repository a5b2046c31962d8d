// src/planning/allocation.rs

use crate::model::{Branch, Family, InventoryRecord};
use crate::planning::coverage::CoverageSnapshot;
use crate::planning::demand::DemandEstimate;
use crate::strategy::lots::{box_request, kit_request, safety_retention, shippable_surplus};
use tracing::debug;

/// What one destination would like to receive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DestinationRequest {
    pub branch: Branch,
    /// Signed difference from target; more negative means more urgent.
    pub difference: f64,
    pub desired: u64,
}

/// Outcome of the allocation for one record.
#[derive(Debug, Clone, PartialEq)]
pub struct Allocation {
    pub source: Branch,
    /// Units the source holds back as its one-month buffer.
    pub retained: u64,
    /// Units the source could ship.
    pub available: u64,
    pub requests: Vec<DestinationRequest>,
    /// Units shipped per branch; the source entry is always 0.
    pub shipped: [u64; 4],
}

impl Allocation {
    pub fn shipped_to(&self, branch: Branch) -> u64 {
        self.shipped[branch.index()]
    }

    pub fn total_shipped(&self) -> u64 {
        self.shipped.iter().sum()
    }

    pub fn total_desired(&self) -> u64 {
        self.requests.iter().map(|r| r.desired).sum()
    }
}

/// Units a destination asks for, after lot rounding.
///
/// Destinations at or above their target ask for nothing.
pub fn desired_quantity(family: Family, lot: u32, difference: f64, current_stock: f64) -> u64 {
    if difference >= 0.0 {
        return 0;
    }
    let shortfall = (-difference).ceil() as u64;

    if family.ships_in_boxes() {
        box_request(shortfall, lot)
    } else {
        kit_request(shortfall, current_stock, lot)
    }
}

/// Splits `available` units across `requests`.
///
/// With enough supply every request is met in full. Under scarcity each
/// destination first gets `floor(desired * available / total_desired)`, then the
/// leftover units are handed out one at a time, most negative difference first,
/// until they run out or nobody wants more.
///
/// Returns shipped units in the same order as `requests`.
pub fn apportion(available: u64, requests: &[DestinationRequest]) -> Vec<u64> {
    let total_desired: u64 = requests.iter().map(|r| r.desired).sum();
    if available == 0 || total_desired == 0 {
        return vec![0; requests.len()];
    }
    if available >= total_desired {
        return requests.iter().map(|r| r.desired).collect();
    }

    let mut shipped: Vec<u64> = requests
        .iter()
        .map(|r| (u128::from(r.desired) * u128::from(available) / u128::from(total_desired)) as u64)
        .collect();
    let mut remainder = available - shipped.iter().sum::<u64>();

    let mut priority: Vec<usize> = (0..requests.len()).collect();
    priority.sort_by(|&a, &b| requests[a].difference.total_cmp(&requests[b].difference));

    while remainder > 0 {
        let mut progressed = false;
        for &i in &priority {
            if remainder == 0 {
                break;
            }
            if shipped[i] < requests[i].desired {
                shipped[i] += 1;
                remainder -= 1;
                progressed = true;
            }
        }
        if !progressed {
            break;
        }
    }

    shipped
}

/// Runs the per-record allocation from `source` to every other branch.
pub fn allocate(
    record: &InventoryRecord,
    family: Family,
    demand: &DemandEstimate,
    coverage: &CoverageSnapshot,
    source: Branch,
) -> Allocation {
    let lot = record.lot();
    let source_figures = record.branch(source);

    let retained = safety_retention(demand.branch(source), lot);
    let available = shippable_surplus(
        coverage.branch(source).difference,
        source_figures.stock,
        retained,
    );

    let requests: Vec<DestinationRequest> = source
        .others()
        .map(|branch| {
            let difference = coverage.branch(branch).difference;
            DestinationRequest {
                branch,
                difference,
                desired: desired_quantity(family, lot, difference, record.branch(branch).on_hand()),
            }
        })
        .collect();

    let mut shipped = [0u64; 4];
    for (request, qty) in requests.iter().zip(apportion(available, &requests)) {
        shipped[request.branch.index()] = qty;
    }

    debug!(
        code = %record.code,
        %source,
        retained,
        available,
        shipped = shipped.iter().sum::<u64>(),
        "allocated"
    );

    Allocation {
        source,
        retained,
        available,
        requests,
        shipped,
    }
}
