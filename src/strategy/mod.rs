pub mod implementations;
pub mod lots;
pub mod traits;

pub use implementations::{DemandMethod, HistoricalPolicy, TheoreticalPolicy};
pub use traits::{DemandPolicy, FulfillmentWeights};
