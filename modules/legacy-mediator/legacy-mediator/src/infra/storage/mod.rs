//! Relational storage adapters.

pub mod sea_orm_executor;

pub use sea_orm_executor::SeaOrmExecutor;
