#![allow(clippy::unwrap_used, clippy::expect_used)]

//! End-to-end tests against an in-memory `SQLite` copy of the legacy schema.

mod common;

use legacy_mediator::{DataAtomic, DataGroup, MediatorError, RecordStorage};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};

fn window(from: &str, to: &str) -> DataGroup {
    DataGroup::new("filter")
        .with_atomic("fromNo", from)
        .with_atomic("toNo", to)
}

fn record_id(record: &DataGroup) -> String {
    record
        .first_group("recordInfo")
        .and_then(|info| info.first_atomic_value("id"))
        .unwrap()
        .to_owned()
}

fn linked_organisations(record: &DataGroup, name_in_data: &str) -> Vec<String> {
    record
        .groups_named(name_in_data)
        .map(|group| {
            group
                .first_group("organisationLink")
                .and_then(DataGroup::linked_record_id)
                .unwrap()
                .to_owned()
        })
        .collect()
}

fn organisation_record(id: &str, name: &str) -> DataGroup {
    DataGroup::new("organisation")
        .with_child(
            DataGroup::new("recordInfo")
                .with_atomic("id", id)
                .with_atomic("selectable", "yes"),
        )
        .with_child(
            DataGroup::new("name")
                .with_atomic("organisationName", name)
                .with_atomic("language", "sv"),
        )
        .with_atomic("organisationType", "unit")
}

fn parent(id: &str) -> DataGroup {
    DataGroup::new("parentOrganisation").with_child(DataGroup::link(
        "organisationLink",
        "organisation",
        id,
    ))
}

fn predecessor(id: &str, note: &str) -> DataGroup {
    DataGroup::new("predecessorOrganisation")
        .with_child(DataGroup::link("organisationLink", "organisation", id))
        .with_atomic("internalNote", note)
}

async fn stored_name(db: &DatabaseConnection, id: i64) -> String {
    let row = db
        .query_one(Statement::from_sql_and_values(
            db.get_database_backend(),
            "SELECT organisation_name FROM organisation WHERE organisation_id = ?",
            [id.into()],
        ))
        .await
        .unwrap()
        .unwrap();
    row.try_get("", "organisation_name").unwrap()
}

#[tokio::test]
async fn organisation_is_read_with_its_relations() {
    let db = common::setup_db().await;
    let mediator = common::mediator(&db);

    let record = mediator.read("organisation", "3").await.unwrap();

    assert_eq!(record_id(&record), "3");
    assert_eq!(
        record.first_group("name").unwrap().first_atomic_value("organisationName"),
        Some("Institutionen for informationsteknologi")
    );
    assert_eq!(linked_organisations(&record, "parentOrganisation"), vec!["2", "5"]);
    assert_eq!(linked_organisations(&record, "predecessorOrganisation"), vec!["4"]);
    assert_eq!(
        record
            .first_group("predecessorOrganisation")
            .unwrap()
            .first_atomic_value("internalNote"),
        Some("merged 2005")
    );
}

#[tokio::test]
async fn view_columns_map_onto_the_record() {
    let db = common::setup_db().await;
    let mediator = common::mediator(&db);

    let uppsala = mediator.read("organisation", "1").await.unwrap();
    assert_eq!(
        uppsala
            .first_group("alternativeName")
            .unwrap()
            .first_atomic_value("organisationName"),
        Some("Uppsala University")
    );
    assert_eq!(uppsala.first_atomic_value("URL"), Some("https://uu.se"));
    assert_eq!(uppsala.first_atomic_value("organisationNumber"), Some("202100-2932"));
    let address = uppsala.first_group("address").unwrap();
    assert_eq!(address.first_atomic_value("postcode"), Some("751 05"));
    assert_eq!(address.first_atomic_value("country"), Some("SE"));
    assert_eq!(address.first_atomic_value("street"), None);

    let closed = mediator.read("organisation", "4").await.unwrap();
    assert_eq!(closed.first_atomic_value("closedDate"), Some("2004-12-31"));
    assert_eq!(
        closed.first_group("recordInfo").unwrap().first_atomic_value("selectable"),
        Some("no")
    );
    assert!(!closed.contains_child("address"));
}

#[tokio::test]
async fn missing_and_malformed_ids_are_distinguished() {
    let db = common::setup_db().await;
    let mediator = common::mediator(&db);

    assert_eq!(
        mediator.read("organisation", "999").await.unwrap_err(),
        MediatorError::not_found("organisation", "999")
    );
    assert_eq!(
        mediator.read("organisation", "abc").await.unwrap_err(),
        MediatorError::invalid_identifier("abc")
    );
}

#[tokio::test]
async fn variants_read_only_their_view() {
    let db = common::setup_db().await;
    let mediator = common::mediator(&db);

    assert!(mediator.exists("subOrganisation", "3").await);
    assert!(!mediator.exists("topOrganisation", "3").await);
    assert!(mediator.exists("rootOrganisation", "6").await);

    let tops = mediator
        .read_list("topOrganisation", &DataGroup::new("filter"))
        .await
        .unwrap();
    let ids: Vec<_> = tops.records.iter().map(record_id).collect();
    assert_eq!(ids, vec!["1", "5"]);
}

#[tokio::test]
async fn list_and_count_share_the_window() {
    let db = common::setup_db().await;
    let mediator = common::mediator(&db);

    let page = mediator
        .read_list("organisation", &window("2", "4"))
        .await
        .unwrap();
    let ids: Vec<_> = page.records.iter().map(record_id).collect();
    assert_eq!(ids, vec!["2", "3", "4"]);
    assert_eq!(page.total_matches, 3);

    assert_eq!(mediator.count("organisation", &window("2", "4")).await.unwrap(), 3);
    let first_two = DataGroup::new("filter").with_atomic("toNo", "2");
    assert_eq!(mediator.count("organisation", &first_two).await.unwrap(), 2);
    assert_eq!(
        mediator.count("organisation", &DataGroup::new("filter")).await.unwrap(),
        6
    );
    assert_eq!(
        mediator
            .count_abstract("subOrganisation", &[], &DataGroup::new("filter"))
            .await
            .unwrap(),
        3
    );
}

#[tokio::test]
async fn users_carry_their_derived_role() {
    let db = common::setup_db().await;
    let mediator = common::mediator(&db);

    let karin = mediator.read("user", "26").await.unwrap();
    assert_eq!(karin.first_atomic_value("userFirstname"), Some("Karin"));
    let rule_part = karin
        .first_group("userRole")
        .unwrap()
        .first_group("permissionTermRulePart")
        .unwrap();
    let values: Vec<_> = rule_part.atomics_named("value").map(DataAtomic::value).collect();
    assert_eq!(values, vec!["system.uu", "system.kth", "system.uu"]);

    let nils = mediator.read("user", "27").await.unwrap();
    assert_eq!(nils.first_atomic_value("userLastname"), None);
    assert_eq!(
        nils.first_group("userRole")
            .unwrap()
            .first_group("userRole")
            .unwrap()
            .linked_record_id(),
        Some("systemAdministrator")
    );

    let anonymous = mediator.read("user", "28").await.unwrap();
    assert!(!anonymous.contains_child("userRole"));

    let all = mediator.read_list("user", &window("1", "1")).await.unwrap();
    assert_eq!(all.total_matches, 3);
}

#[tokio::test]
async fn ancestors_cover_every_level() {
    let db = common::setup_db().await;
    let mediator = common::mediator(&db);

    let ancestors = mediator.read_ancestors("organisation", "3").await.unwrap();
    assert_eq!(ancestors, vec!["2", "5", "1", "6"]);
}

#[tokio::test]
async fn update_rewrites_the_organisation_tables() {
    let db = common::setup_db().await;
    let mediator = common::mediator(&db);

    let record = organisation_record("2", "TekNat")
        .with_child(
            DataGroup::new("alternativeName")
                .with_atomic("organisationName", "Faculty of Science and Technology")
                .with_atomic("language", "en"),
        )
        .with_child(DataGroup::new("address").with_atomic("city", "Uppsala"))
        .with_child(parent("1"))
        .with_child(parent("5"))
        .with_child(predecessor("4", "split 2010"));
    mediator.update("organisation", "2", record).await.unwrap();

    let stored = mediator.read("organisation", "2").await.unwrap();
    assert_eq!(
        stored.first_group("name").unwrap().first_atomic_value("organisationName"),
        Some("TekNat")
    );
    assert_eq!(
        stored
            .first_group("alternativeName")
            .unwrap()
            .first_atomic_value("organisationName"),
        Some("Faculty of Science and Technology")
    );
    assert_eq!(
        stored.first_group("address").unwrap().first_atomic_value("city"),
        Some("Uppsala")
    );
    assert_eq!(linked_organisations(&stored, "parentOrganisation"), vec!["1", "5"]);
    assert_eq!(linked_organisations(&stored, "predecessorOrganisation"), vec!["4"]);

    let trimmed = organisation_record("2", "TekNat").with_child(parent("5"));
    mediator.update("organisation", "2", trimmed).await.unwrap();

    let stored = mediator.read("organisation", "2").await.unwrap();
    assert!(!stored.contains_child("alternativeName"));
    assert!(!stored.contains_child("address"));
    assert!(!stored.contains_child("predecessorOrganisation"));
    assert_eq!(linked_organisations(&stored, "parentOrganisation"), vec!["5"]);
}

#[tokio::test]
async fn update_closing_an_organisation_stores_the_date() {
    let db = common::setup_db().await;
    let mediator = common::mediator(&db);

    let record = organisation_record("3", "Institutionen for informationsteknologi")
        .with_atomic("closedDate", "2023-06-30")
        .with_child(parent("2"));
    mediator.update("organisation", "3", record).await.unwrap();

    let stored = mediator.read("organisation", "3").await.unwrap();
    assert_eq!(stored.first_atomic_value("closedDate"), Some("2023-06-30"));
    assert_eq!(linked_organisations(&stored, "parentOrganisation"), vec!["2"]);
}

#[tokio::test]
async fn cyclic_parent_is_rejected_without_writing() {
    let db = common::setup_db().await;
    let mediator = common::mediator(&db);

    let record = organisation_record("1", "Renamed").with_child(parent("3"));
    let err = mediator.update("organisation", "1", record).await.unwrap_err();

    assert!(matches!(err, MediatorError::Validation { .. }));
    assert_eq!(stored_name(&db, 1).await, "Uppsala universitet");
    let stored = mediator.read("organisation", "1").await.unwrap();
    assert_eq!(linked_organisations(&stored, "parentOrganisation"), vec!["6"]);
}

#[tokio::test]
async fn failing_statement_rolls_back_the_whole_batch() {
    let db = common::setup_db().await;
    let mediator = common::mediator(&db);

    let record = organisation_record("2", "Renamed")
        .with_child(DataGroup::new("address").with_atomic("country", "SWE"))
        .with_child(parent("1"));
    let err = mediator.update("organisation", "2", record).await.unwrap_err();

    assert!(matches!(err, MediatorError::Backend { .. }));
    assert_eq!(stored_name(&db, 2).await, "Teknisk-naturvetenskapliga fakulteten");
}
