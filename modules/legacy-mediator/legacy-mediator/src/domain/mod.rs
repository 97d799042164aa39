pub mod convert;
pub mod delimiter;
pub mod error;
pub mod ports;
pub mod record_type;
pub mod roles;
pub mod service;
pub mod statement;
pub mod tree_reader;
pub mod updater;

#[cfg(test)]
pub(crate) mod test_support;
