mod bind_types;
mod errors;
mod prepared;

use crate::{bind_types::bind_types, errors::errors, prepared::prepared};
use conduit_core::{Connection, Connector, DriverKind};
use indoc::indoc;
use log::LevelFilter;
use std::env;

pub fn init_logs() {
    let mut logger = env_logger::builder();
    logger
        .is_test(true)
        .format_file(true)
        .format_line_number(true);
    if env::var("RUST_LOG").is_err() {
        logger.filter_level(LevelFilter::Warn);
    }
    let _ = logger.try_init();
}

pub async fn execute_tests<C: Connection>(connector: &mut Connector<C>) {
    assert!(connector.is_connected());
    prepared(connector).await;
    bind_types(connector).await;
    errors(connector).await;
}

/// Drop and create the `test` table used by every suite.
pub(crate) async fn reset_table<C: Connection>(connector: &mut Connector<C>) {
    connector
        .prepare("DROP TABLE IF EXISTS test", None)
        .await
        .expect("Failed to prepare the drop table")
        .execute()
        .await
        .expect("Failed to drop the test table");
    let create = match connector.driver() {
        DriverKind::MySQL => indoc! {"
            CREATE TABLE IF NOT EXISTS test (
                id INT(11) NOT NULL AUTO_INCREMENT,
                weight FLOAT(10, 2) DEFAULT NULL,
                name VARCHAR(255) DEFAULT NULL,
                PRIMARY KEY (id)
            )
        "},
        DriverKind::PostgreSQL => indoc! {"
            CREATE TABLE IF NOT EXISTS test (
                id SERIAL PRIMARY KEY,
                weight REAL DEFAULT NULL,
                name VARCHAR(255) DEFAULT NULL
            )
        "},
    };
    connector
        .prepare(create, None)
        .await
        .expect("Failed to prepare the create table")
        .execute()
        .await
        .expect("Failed to create the test table");
}

pub(crate) const INSERT_JOHN: &str = indoc! {"
    INSERT INTO test (
        weight,
        name
    ) VALUES (
        63.245,
        'John'
    )
"};

#[macro_export]
macro_rules! silent_logs {
    ($($code:tt)+) => {{
        let level = log::max_level();
        log::set_max_level(log::LevelFilter::Off);
        $($code)+
        log::set_max_level(level);
    }};
}
