//! Stats module - grouped sums and trend narrative

mod aggregator;
mod narrative;

pub use aggregator::{Aggregate, Aggregator};
pub use narrative::{format_thousands, NarrativeGenerator};
