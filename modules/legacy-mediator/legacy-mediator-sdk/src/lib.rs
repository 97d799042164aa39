//! Legacy Mediator SDK
//!
//! This crate provides the public API for the `legacy_mediator` module:
//! - `RecordStorage` trait, the storage facade over the legacy relational database
//! - Hierarchical record model (`DataGroup`, `DataAtomic`, `DataElement`)
//! - Error type (`MediatorError`)
//! - List result model (`StorageReadResult`)
//!
//! ## Usage
//!
//! ```ignore
//! use legacy_mediator_sdk::RecordStorage;
//!
//! let storage: Arc<dyn RecordStorage> = build_mediator(db, config);
//! let organisation = storage.read("organisation", "51").await?;
//! let parents = organisation.groups_named("parentOrganisation").count();
//! ```

#![forbid(unsafe_code)]
#![deny(rust_2018_idioms)]

pub mod api;
pub mod data;
pub mod errors;
pub mod models;

pub use api::RecordStorage;
pub use data::{DataAtomic, DataElement, DataGroup};
pub use errors::MediatorError;
pub use models::StorageReadResult;
