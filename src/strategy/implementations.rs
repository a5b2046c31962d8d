// src/strategy/implementations.rs

use crate::error::PlanError;
use crate::strategy::traits::{DemandPolicy, FulfillmentWeights};
use std::fmt;
use std::str::FromStr;

// =========================================================================
// Method A: Theoretical
// =========================================================================

/// Corrects under-served items towards their family's fulfillment rate.
///
/// If the item is fulfilled worse than its family (Wp < Wf) the presented
/// quantity is scaled by Wf; otherwise remitted plus a 10% margin is used.
#[derive(Debug, Clone, Default)]
pub struct TheoreticalPolicy;

impl TheoreticalPolicy {
    pub const REMITTED_MARGIN: f64 = 1.1;

    pub fn new() -> Self {
        Self
    }
}

impl DemandPolicy for TheoreticalPolicy {
    fn estimate(&self, presented: f64, remitted: f64, weights: &FulfillmentWeights) -> f64 {
        let demand = if weights.item < weights.family {
            weights.family * presented
        } else {
            Self::REMITTED_MARGIN * remitted
        };
        demand.max(0.0)
    }
}

// =========================================================================
// Method B: Historical (default)
// =========================================================================

/// Blends presented and remitted quantities depending on how far apart they are.
///
/// | condition                                 | demand                   |
/// |-------------------------------------------|--------------------------|
/// | remitted == 0                             | 0.5 * presented          |
/// | remitted < presented < 1.5 * remitted     | (presented+remitted) / 2 |
/// | presented >= 1.5 * remitted               | 1.5 * remitted           |
/// | presented <= remitted                     | remitted                 |
#[derive(Debug, Clone, Default)]
pub struct HistoricalPolicy;

impl HistoricalPolicy {
    pub fn new() -> Self {
        Self
    }
}

impl DemandPolicy for HistoricalPolicy {
    fn estimate(&self, presented: f64, remitted: f64, _weights: &FulfillmentWeights) -> f64 {
        let demand = if remitted == 0.0 {
            presented * 0.5
        } else if presented > remitted && presented < remitted * 1.5 {
            (presented + remitted) / 2.0
        } else if presented >= remitted * 1.5 {
            remitted * 1.5
        } else {
            remitted
        };
        demand.max(0.0)
    }
}

// =========================================================================
// Method selector
// =========================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DemandMethod {
    A,
    #[default]
    B,
}

impl DemandMethod {
    pub fn policy(self) -> Box<dyn DemandPolicy> {
        match self {
            DemandMethod::A => Box::new(TheoreticalPolicy::new()),
            DemandMethod::B => Box::new(HistoricalPolicy::new()),
        }
    }
}

impl fmt::Display for DemandMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DemandMethod::A => f.write_str("A"),
            DemandMethod::B => f.write_str("B"),
        }
    }
}

impl FromStr for DemandMethod {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(DemandMethod::A),
            "B" => Ok(DemandMethod::B),
            other => Err(PlanError::UnknownMethod(other.to_string())),
        }
    }
}
