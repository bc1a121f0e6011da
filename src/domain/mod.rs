// Domain layer - Pure types and logic, no I/O
pub mod chart;
pub mod environment;
pub mod series_store;
pub mod time;
