pub mod analytics;
pub mod feedback;
pub mod generation;
pub mod review;
pub mod store;
