pub mod analysis;
pub mod metrics;
pub mod rating;
pub mod recommendation;
