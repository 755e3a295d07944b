pub mod position;
pub mod report;

// Re-export common types for easier access
pub use position::Position;
pub use report::LocationReport;
