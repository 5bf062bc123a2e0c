pub mod orchestrator;
pub mod session;
pub mod timeseries;
pub mod window;
