//! Legacy Mediator Module
//!
//! Mediates between hierarchical records and a legacy relational database
//! exposing flattened views. The public API is defined in
//! `legacy-mediator-sdk` and re-exported here.

use std::sync::Arc;

use sea_orm::DatabaseConnection;
use tracing_subscriber::EnvFilter;

pub use legacy_mediator_sdk::{
    DataAtomic, DataElement, DataGroup, MediatorError, RecordStorage, StorageReadResult,
};

pub mod config;
pub mod domain;
pub mod infra;

pub use config::MediatorConfig;
pub use domain::roles::{PriorityRoleResolver, RoleResolver};
pub use domain::service::LegacyMediator;
pub use infra::storage::SeaOrmExecutor;

/// Wire a mediator over a `SeaORM` connection with the priority role resolver.
#[must_use]
pub fn build_mediator(db: DatabaseConnection, config: MediatorConfig) -> Arc<dyn RecordStorage> {
    Arc::new(LegacyMediator::new(
        Arc::new(SeaOrmExecutor::new(db)),
        Arc::new(PriorityRoleResolver),
        config,
    ))
}

/// Install a `fmt` subscriber filtered by `RUST_LOG`.
///
/// Meant for binaries and tests; the library never installs one itself.
/// Set `json` for structured output. A subscriber installed earlier is kept.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    let result = if json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    if let Err(err) = result {
        tracing::debug!(error = %err, "tracing subscriber already installed");
    }
}
