pub mod allocation;
pub mod config;
pub mod coverage;
pub mod demand;
pub mod engine;
pub mod summary;
pub mod surplus;
pub mod weights;

pub use config::{AnalysisMode, PlanConfig};
pub use engine::{PlanOutcome, PlannedItem, Planner, ReplenishmentLine, ReturnLine};
pub use summary::{summarize, summarize_by_family, BranchSummary, FamilySummary};
