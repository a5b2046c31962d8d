pub mod filters;
pub mod loader;
pub mod reporting;
pub mod sample;
