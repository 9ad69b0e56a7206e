pub mod app;
pub mod calendar;
pub mod config;
pub mod errors;
pub mod expander;
pub mod handlers;
pub mod models;
pub mod period;
pub mod progress;
pub mod state;
pub mod tracker;
pub mod ui;

pub use app::router;
pub use config::Config;
pub use expander::expand;
pub use progress::compute_progress;
pub use state::AppState;
pub use tracker::Tracker;
