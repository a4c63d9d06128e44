pub mod config;
pub mod error;
pub mod types;

pub use config::ModelConfig;
pub use error::{FloodError, Result};
