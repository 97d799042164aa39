//! Conversion of a logical `{fromNo, toNo}` window into SQL `{limit, offset}`.
//!
//! The logical window is 1-based and inclusive; the physical window is a
//! 0-based start offset plus a row count. `fromNo > toNo` is not validated
//! and yields a non-positive limit. Arithmetic saturates at the `i64` bounds.

use legacy_mediator_sdk::DataGroup;

use crate::domain::error::DomainError;

pub const FROM_NO: &str = "fromNo";
pub const TO_NO: &str = "toNo";

/// Physical pagination window; `None` means unbounded / no offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Delimiter {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

impl Delimiter {
    #[must_use]
    pub fn unbounded() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn compute(from_no: Option<i64>, to_no: Option<i64>) -> Self {
        let from_no = from_no.unwrap_or(0);
        let offset = (from_no != 0).then(|| from_no.saturating_sub(1));
        let limit = to_no.map(|to_no| {
            if from_no == 0 {
                to_no
            } else {
                to_no.saturating_sub(from_no).saturating_add(1)
            }
        });
        Self { limit, offset }
    }

    /// Read `fromNo`/`toNo` atomics from a list filter.
    ///
    /// # Errors
    /// Returns `DomainError::Validation` when either value is not an integer.
    pub fn from_filter(filter: &DataGroup) -> Result<Self, DomainError> {
        let from_no = filter_number(filter, FROM_NO)?;
        let to_no = filter_number(filter, TO_NO)?;
        Ok(Self::compute(from_no, to_no))
    }
}

fn filter_number(filter: &DataGroup, name: &str) -> Result<Option<i64>, DomainError> {
    filter
        .first_atomic_value(name)
        .map(|raw| {
            raw.parse::<i64>().map_err(|_| {
                DomainError::validation(format!("filter {name} must be an integer, got '{raw}'"))
            })
        })
        .transpose()
}
