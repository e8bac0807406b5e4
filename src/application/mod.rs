// Application layer - use cases over the sample repository
pub mod dashboard_service;
pub mod refresh;
pub mod sample_repository;
