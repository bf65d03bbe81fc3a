pub mod app;
pub mod calendar;
pub mod config;
pub mod debounce;
pub mod errors;
pub mod handlers;
pub mod ledger;
pub mod models;
pub mod notify;
pub mod scheduler;
pub mod settings;
pub mod snapshot;
pub mod state;
pub mod stats;
pub mod storage;
pub mod streak;
pub mod timer;
pub mod tracker;

pub use app::router;
pub use config::AppConfig;
pub use ledger::Ledger;
pub use scheduler::Scheduler;
pub use state::AppState;
pub use storage::JsonStore;
pub use streak::compute_streak;
pub use tracker::Tracker;
