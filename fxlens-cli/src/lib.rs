pub mod app;
pub mod report;
pub mod telemetry;

pub use app::run as run_app;
