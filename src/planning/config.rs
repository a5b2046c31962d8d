// src/planning/config.rs

use crate::error::{PlanError, PlanResult};
use crate::io::filters::FilterOptions;
use crate::model::{Branch, Family};
use crate::strategy::DemandMethod;
use std::fmt;
use std::str::FromStr;

pub const MONTHS_PER_YEAR: f64 = 12.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AnalysisMode {
    /// Ship surplus from the source branch to the destinations.
    #[default]
    Replenishment,
    /// Flag destination stock that could go back to the source.
    Return,
}

impl fmt::Display for AnalysisMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnalysisMode::Replenishment => f.write_str("replenishment"),
            AnalysisMode::Return => f.write_str("return"),
        }
    }
}

impl FromStr for AnalysisMode {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "replenishment" | "reposicion" => Ok(AnalysisMode::Replenishment),
            "return" | "devolucion" => Ok(AnalysisMode::Return),
            other => Err(PlanError::UnknownMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct PlanConfig {
    pub mode: AnalysisMode,
    /// Branch that ships (replenishment) or receives returns (return mode).
    pub source: Branch,
    pub method: DemandMethod,
    pub source_target_months: f64,
    pub destination_target_months: f64,
    /// Return mode: coverage (in years) above which destination stock is excess.
    pub return_threshold: f64,
    pub filters: FilterOptions,
    /// Families to plan; the rest are dropped after classification.
    pub families: Vec<Family>,
}

impl Default for PlanConfig {
    fn default() -> Self {
        Self {
            mode: AnalysisMode::Replenishment,
            source: Branch::Sf,
            method: DemandMethod::B,
            source_target_months: 6.0,
            destination_target_months: 4.0,
            return_threshold: 0.5,
            filters: FilterOptions::default(),
            families: Family::ALL.to_vec(),
        }
    }
}

impl PlanConfig {
    pub fn source_target_years(&self) -> f64 {
        self.source_target_months / MONTHS_PER_YEAR
    }

    pub fn destination_target_years(&self) -> f64 {
        self.destination_target_months / MONTHS_PER_YEAR
    }

    pub fn validate(&self) -> PlanResult<()> {
        let months = [
            ("source_target_months", self.source_target_months),
            ("destination_target_months", self.destination_target_months),
        ];
        for (name, value) in months {
            if !value.is_finite() || value < 0.0 {
                return Err(PlanError::invalid(
                    name,
                    format!("expected a non-negative number of months, got {value}"),
                ));
            }
        }

        if !self.return_threshold.is_finite() || self.return_threshold <= 0.0 {
            return Err(PlanError::invalid(
                "return_threshold",
                format!("expected a positive coverage ratio, got {}", self.return_threshold),
            ));
        }
        Ok(())
    }
}
