pub mod dashboard;
pub mod models;
pub mod plan;
pub mod progress;
