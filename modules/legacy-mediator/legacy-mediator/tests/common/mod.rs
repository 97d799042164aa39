#![allow(clippy::unwrap_used, clippy::expect_used, dead_code)]

//! Common test utilities: an in-memory `SQLite` database shaped like the
//! legacy schema, with its read views.

use std::sync::Arc;

use legacy_mediator::{LegacyMediator, MediatorConfig, PriorityRoleResolver, SeaOrmExecutor};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection};

const SCHEMA: &str = r"
CREATE TABLE organisation (
    organisation_id INTEGER PRIMARY KEY,
    organisation_name TEXT NOT NULL,
    organisation_name_locale TEXT,
    closed_date DATE,
    organisation_code TEXT,
    orgnumber TEXT,
    organisation_homepage TEXT,
    organisation_type TEXT NOT NULL,
    not_eligible BOOLEAN NOT NULL DEFAULT 0,
    domain TEXT,
    last_updated TEXT
);

CREATE TABLE organisation_name (
    organisation_id INTEGER NOT NULL,
    organisation_name TEXT NOT NULL,
    locale TEXT NOT NULL
);

CREATE TABLE organisation_address (
    organisation_id INTEGER PRIMARY KEY,
    city TEXT,
    street TEXT,
    box TEXT,
    postnumber TEXT,
    country_code TEXT CHECK (country_code IS NULL OR length(country_code) = 2)
);

CREATE TABLE organisation_parent (
    organisation_id INTEGER NOT NULL,
    organisation_parent_id INTEGER NOT NULL
);

CREATE TABLE organisation_predecessor (
    organisation_id INTEGER NOT NULL,
    organisation_predecessor_id INTEGER NOT NULL,
    description TEXT
);

CREATE VIEW organisationview AS
SELECT o.organisation_id AS id,
       o.organisation_name,
       o.organisation_name_locale,
       n.organisation_name AS alternative_name,
       n.locale AS alternative_name_locale,
       o.organisation_type,
       o.domain,
       o.closed_date,
       o.organisation_code,
       o.orgnumber,
       o.organisation_homepage AS url,
       a.city,
       a.street,
       a.box,
       a.postnumber,
       a.country_code,
       o.not_eligible,
       o.last_updated
FROM organisation o
LEFT JOIN organisation_name n ON n.organisation_id = o.organisation_id AND n.locale = 'en'
LEFT JOIN organisation_address a ON a.organisation_id = o.organisation_id;

CREATE VIEW rootorganisationview AS
SELECT * FROM organisationview WHERE organisation_type = 'root';

CREATE VIEW toporganisationview AS
SELECT * FROM organisationview WHERE organisation_type = 'university';

CREATE VIEW suborganisationview AS
SELECT * FROM organisationview WHERE organisation_type = 'unit';

CREATE VIEW divaorganisationparent AS
SELECT organisation_id, organisation_parent_id FROM organisation_parent;

CREATE VIEW divaorganisationpredecessor AS
SELECT organisation_id, organisation_predecessor_id, description FROM organisation_predecessor;

CREATE TABLE users (
    db_id INTEGER PRIMARY KEY,
    first_name TEXT,
    last_name TEXT
);

CREATE TABLE groupsforuser (
    db_id INTEGER NOT NULL,
    domain TEXT,
    group_type TEXT
);
";

const SEED: &str = r"
INSERT INTO organisation (organisation_id, organisation_name, organisation_name_locale,
    closed_date, organisation_code, orgnumber, organisation_homepage, organisation_type,
    not_eligible, domain)
VALUES
    (1, 'Uppsala universitet', 'sv', NULL, 'UU', '202100-2932', 'https://uu.se', 'university', 0, 'uu'),
    (2, 'Teknisk-naturvetenskapliga fakulteten', 'sv', NULL, NULL, NULL, NULL, 'unit', 0, 'uu'),
    (3, 'Institutionen for informationsteknologi', 'sv', NULL, NULL, NULL, NULL, 'unit', 0, 'uu'),
    (4, 'Institutionen for teknisk databehandling', 'sv', '2004-12-31', NULL, NULL, NULL, 'unit', 1, 'uu'),
    (5, 'Kungliga Tekniska hogskolan', 'sv', NULL, 'KTH', NULL, NULL, 'university', 0, 'kth'),
    (6, 'Universitetsforbundet', 'sv', NULL, NULL, NULL, NULL, 'root', 0, NULL);

INSERT INTO organisation_name (organisation_id, organisation_name, locale)
VALUES (1, 'Uppsala University', 'en');

INSERT INTO organisation_address (organisation_id, city, street, box, postnumber, country_code)
VALUES (1, 'Uppsala', NULL, 'Box 256', '751 05', 'SE');

INSERT INTO organisation_parent (organisation_id, organisation_parent_id)
VALUES (2, 1), (3, 2), (3, 5), (4, 2), (1, 6), (5, 6);

INSERT INTO organisation_predecessor (organisation_id, organisation_predecessor_id, description)
VALUES (3, 4, 'merged 2005');

INSERT INTO users (db_id, first_name, last_name)
VALUES (26, 'Karin', 'Larsson'), (27, 'Nils', NULL), (28, NULL, NULL);

INSERT INTO groupsforuser (db_id, domain, group_type)
VALUES
    (26, 'uu', 'domainAdmin'),
    (26, 'kth', 'domainAdmin'),
    (26, 'uu', 'domainAdmin'),
    (27, 'uu', 'systemAdmin'),
    (27, 'kth', 'domainAdmin'),
    (28, 'uu', 'other');
";

async fn run_script(db: &DatabaseConnection, script: &str) {
    for statement in script.split(';').map(str::trim).filter(|s| !s.is_empty()) {
        db.execute_unprepared(statement)
            .await
            .unwrap_or_else(|e| panic!("failed to run `{statement}`: {e}"));
    }
}

/// Setup a seeded in-memory `SQLite` database.
pub async fn setup_db() -> DatabaseConnection {
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(opts).await.expect("connect to in-memory sqlite");
    run_script(&db, SCHEMA).await;
    run_script(&db, SEED).await;
    db
}

pub fn mediator(db: &DatabaseConnection) -> LegacyMediator {
    LegacyMediator::new(
        Arc::new(SeaOrmExecutor::new(db.clone())),
        Arc::new(PriorityRoleResolver),
        MediatorConfig::default(),
    )
}
