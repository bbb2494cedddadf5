//! Headless stand-in for the launch UI: plays a scenario into a launch check.
mod app;
mod effects;
mod logging;
mod scenario;
mod ui;

pub use app::run_app;
