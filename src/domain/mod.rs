// Domain layer - sensor data model, statistics and alerting rules
pub mod dashboard;
pub mod recommendation;
pub mod sensor;
pub mod statistics;
pub mod telemetry;
pub mod thresholds;
pub mod window;
