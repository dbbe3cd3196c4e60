use crate::{INSERT_JOHN, reset_table};
use conduit_core::{Connection, Connector, DriverKind, Value, params};
use indoc::indoc;
use std::sync::LazyLock;
use tokio::sync::Mutex;

const SELECT_BY_NAME: &str = indoc! {"
    SELECT
        test.name,
        test.weight
    FROM
        test
    WHERE 1=1
        AND test.name = :name
"};

pub async fn prepared<C: Connection>(connector: &mut Connector<C>) {
    static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    let _lock = MUTEX.lock().await;

    // Debug dump
    reset_table(connector).await;
    connector
        .prepare("SELECT 1 FROM test", None)
        .await
        .expect("Failed to prepare a query without parameters");
    assert!(connector.debug().contains("Params:  0"));
    connector
        .prepare(SELECT_BY_NAME, Some(params! { "name" => "John" }))
        .await
        .expect("Failed to prepare a query with one parameter");
    let dump = connector.debug();
    assert!(dump.contains("Params:  1"));
    assert!(dump.contains("param_type=2"));

    // Row count
    let count = connector
        .prepare(INSERT_JOHN, None)
        .await
        .expect("Failed to prepare the insert")
        .execute()
        .await
        .expect("Failed to insert John")
        .row_count();
    assert_eq!(count, 1);
    assert_eq!(connector.fetch_all(), None);

    // Last inserted id
    assert_eq!(
        connector
            .last_inserted_id(None)
            .await
            .expect("Failed to read the last inserted id"),
        1
    );
    if connector.driver() == DriverKind::PostgreSQL {
        assert_eq!(
            connector
                .last_inserted_id(Some("test_id_seq"))
                .await
                .expect("Failed to read the current value of the sequence"),
            1
        );
    }

    // Execute and fetch
    let rows = connector
        .prepare(SELECT_BY_NAME, Some(params! { "name" => "John" }))
        .await
        .expect("Failed to prepare the select")
        .execute()
        .await
        .expect("Failed to execute the select")
        .fetch_all()
        .expect("John should be found");
    assert_eq!(rows.len(), 1);
    assert_eq!(connector.row_count(), 1);
    let row = &rows[0];
    assert_eq!(row.names(), ["name", "weight"]);
    assert!(row.contains(&Value::Varchar(Some("John".into()))));
    let weight = row.get::<f64>("weight").expect("Weight should be a number");
    assert!((weight - 63.245).abs() < 0.01, "Unexpected weight {weight}");
    assert_eq!(connector.fetch_all(), None);

    // Fetch quickly
    let rows = connector
        .fetch(SELECT_BY_NAME, Some(params! { "name" => "John" }))
        .await
        .expect("Failed to fetch John")
        .expect("John should be found");
    assert_eq!(rows[0].get::<String>("name").unwrap(), "John");

    // Nothing found
    let rows = connector
        .fetch(SELECT_BY_NAME, Some(params! { "name" => "Jane" }))
        .await
        .expect("Failed to fetch Jane");
    assert_eq!(rows, None);
    assert_eq!(connector.row_count(), 0);

    // Same statement, other values
    connector
        .prepare(INSERT_JOHN, None)
        .await
        .expect("Failed to prepare the insert")
        .execute()
        .await
        .expect("Failed to insert John again");
    connector
        .prepare(
            "UPDATE test SET name = :name WHERE id = :id",
            Some(params! { "name" => "Jane", "id" => 2 }),
        )
        .await
        .expect("Failed to prepare the update");
    assert_eq!(connector.execute().await.unwrap().row_count(), 1);
    let rows = connector
        .bind("id", 3)
        .expect("Failed to bind the id")
        .execute()
        .await
        .expect("Failed to update a missing row")
        .row_count();
    assert_eq!(rows, 0);
    let rows = connector
        .fetch(SELECT_BY_NAME, Some(params! { "name" => "Jane" }))
        .await
        .expect("Failed to fetch Jane")
        .expect("Jane should be found");
    assert_eq!(rows.len(), 1);
}
