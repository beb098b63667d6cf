pub mod config;
pub mod error;
pub mod routes;
pub mod service;
pub mod state;

pub use config::Config;
pub use error::ApiError;
pub use state::AppState;
