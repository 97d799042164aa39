use legacy_mediator_sdk::DataGroup;

use super::{ConvertContext, record_info, required_text};
use crate::domain::error::DomainError;
use crate::domain::ports::Row;

const DEFAULT_NAME_LANGUAGE: &str = "sv";
const DEFAULT_ALTERNATIVE_LANGUAGE: &str = "en";

/// Address columns of the organisation view and their record names.
pub(crate) const ADDRESS_COLUMNS: [(&str, &str); 5] = [
    ("city", "city"),
    ("street", "street"),
    ("box", "box"),
    ("postnumber", "postcode"),
    ("country_code", "country"),
];

/// Convert one organisation view row.
///
/// # Errors
/// Returns `DomainError::Validation` when the row has no `id`.
pub fn convert_organisation(row: &Row, ctx: &ConvertContext<'_>) -> Result<DataGroup, DomainError> {
    let id = required_text(row, "id")?;

    let mut info = record_info(id, ctx);
    let selectable = if row.flag("not_eligible") { "no" } else { "yes" };
    info.add_atomic("selectable", selectable);
    info.add_atomic_if_present("domain", row.text("domain"));
    info.add_atomic_if_present("tsUpdated", row.text("last_updated"));

    let mut organisation = DataGroup::new("organisation").with_child(info);

    if let Some(name) = row.text("organisation_name") {
        let language = row
            .text("organisation_name_locale")
            .unwrap_or_else(|| DEFAULT_NAME_LANGUAGE.to_owned());
        organisation.add_child(
            DataGroup::new("name")
                .with_atomic("organisationName", name)
                .with_atomic("language", language),
        );
    }

    if let Some(alternative) = row.text("alternative_name") {
        let language = row
            .text("alternative_name_locale")
            .unwrap_or_else(|| DEFAULT_ALTERNATIVE_LANGUAGE.to_owned());
        organisation.add_child(
            DataGroup::new("alternativeName")
                .with_atomic("organisationName", alternative)
                .with_atomic("language", language),
        );
    }

    organisation.add_atomic_if_present("organisationCode", row.text("organisation_code"));
    organisation.add_atomic_if_present("organisationNumber", row.text("orgnumber"));
    organisation.add_atomic_if_present("organisationType", row.text("organisation_type"));
    organisation.add_atomic_if_present("closedDate", row.text("closed_date"));
    organisation.add_atomic_if_present("URL", row.text("url"));

    let mut address = DataGroup::new("address");
    for (column, name) in ADDRESS_COLUMNS {
        address.add_atomic_if_present(name, row.text(column));
    }
    if !address.children().is_empty() {
        organisation.add_child(address);
    }

    Ok(organisation)
}
