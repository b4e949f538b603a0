pub mod audit;
pub mod catalog;
pub mod database;
pub mod model;
pub mod password;
pub mod ports;
pub mod rotation;

pub use model::{
    CatalogEntry, FailureStage, ManagedSource, RotationOutcome, RunSummary, SessionToken,
    SourceReport,
};
pub use ports::{CatalogApi, DatabaseAdmin, SecretSource};

pub use crate::utils::error::Result;
