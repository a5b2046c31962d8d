pub mod branch;
pub mod family;
pub mod record;

pub use branch::{Branch, BranchFigures};
pub use family::{classify, Family};
pub use record::InventoryRecord;
