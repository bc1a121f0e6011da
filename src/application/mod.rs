// Application layer - Use cases and ports
pub mod chart_service;
pub mod environment_repository;
pub mod live_series;
pub mod polling_service;
