//! Stock allocation planner.
//!
//! Distributes a source branch's surplus across destination branches from
//! estimated demand and coverage targets, and flags destination excess that
//! could be returned.

pub mod error;
pub mod io;
pub mod logging;
pub mod model;
pub mod planning;
pub mod strategy;

pub use error::{PlanError, PlanResult};
pub use model::{Branch, BranchFigures, Family, InventoryRecord};
pub use planning::{AnalysisMode, PlanConfig, PlanOutcome, Planner};
