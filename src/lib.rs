pub mod config;
pub mod core;
pub mod utils;

pub use config::{store::ConfigStore, CliConfig};
pub use core::{
    catalog::CatalogClient, database::PostgresAdmin, password::PasswordGenerator,
    rotation::RotationEngine,
};
pub use utils::error::{Result, RotateError};
