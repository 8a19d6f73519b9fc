pub mod app;
pub mod config;
pub mod db;
pub mod error;
pub mod extract;
pub mod loader;
pub mod recipes;
pub mod state;
pub mod telemetry;

pub use app::build_app;
pub use config::AppConfig;
pub use error::AppError;
pub use state::AppState;
