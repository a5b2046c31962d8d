// src/model/branch.rs

use crate::error::PlanError;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// A physical stocking location in the network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Branch {
    Sf,
    Ba,
    Mdz,
    Slt,
}

impl Branch {
    pub const ALL: [Branch; 4] = [Branch::Sf, Branch::Ba, Branch::Mdz, Branch::Slt];

    /// Position inside per-branch arrays.
    pub fn index(self) -> usize {
        match self {
            Branch::Sf => 0,
            Branch::Ba => 1,
            Branch::Mdz => 2,
            Branch::Slt => 3,
        }
    }

    /// Lower-case suffix used in column names (`stock_ba`, `qremmdz`, ...).
    pub fn key(self) -> &'static str {
        match self {
            Branch::Sf => "sf",
            Branch::Ba => "ba",
            Branch::Mdz => "mdz",
            Branch::Slt => "slt",
        }
    }

    pub fn code(self) -> &'static str {
        match self {
            Branch::Sf => "SF",
            Branch::Ba => "BA",
            Branch::Mdz => "MDZ",
            Branch::Slt => "SLT",
        }
    }

    /// Every branch except `self`, in network order.
    pub fn others(self) -> impl Iterator<Item = Branch> {
        Branch::ALL.into_iter().filter(move |b| *b != self)
    }
}

impl fmt::Display for Branch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Branch {
    type Err = PlanError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SF" => Ok(Branch::Sf),
            "BA" => Ok(Branch::Ba),
            "MDZ" => Ok(Branch::Mdz),
            "SLT" => Ok(Branch::Slt),
            other => Err(PlanError::UnknownBranch(other.to_string())),
        }
    }
}

/// Raw per-branch quantities of one SKU.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct BranchFigures {
    /// On-hand physical stock.
    pub stock: f64,
    /// Stock travelling towards the branch from outside the network.
    pub in_transit: f64,
    /// Internal transfers already committed towards the branch.
    pub inbound: f64,
    /// Quantity requested during the historical period.
    pub presented: f64,
    /// Quantity actually fulfilled during the historical period.
    pub remitted: f64,
}

impl BranchFigures {
    /// Stock the branch can count on without this run's allocation.
    pub fn on_hand(&self) -> f64 {
        self.stock + self.in_transit
    }
}
