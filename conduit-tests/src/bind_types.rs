use crate::reset_table;
use conduit_core::{BindType, Connection, Connector, Value, params};
use indoc::indoc;
use std::sync::LazyLock;
use tokio::sync::Mutex;

pub async fn bind_types<C: Connection>(connector: &mut Connector<C>) {
    static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    let _lock = MUTEX.lock().await;

    reset_table(connector).await;
    let insert = "INSERT INTO test (weight, name) VALUES (:weight, :name)";

    // Numeric strings are bound as integers
    connector
        .prepare(
            insert,
            Some(params! { "weight" => "63.245", "name" => "Numeric" }),
        )
        .await
        .expect("Failed to prepare the insert");
    assert!(connector.debug().contains("param_type=1"));
    connector.execute().await.expect("Failed to insert a numeric string");

    // Floats lose their fractional part
    connector
        .prepare(insert, Some(params! { "weight" => 80.9, "name" => "Float" }))
        .await
        .expect("Failed to prepare the insert")
        .execute()
        .await
        .expect("Failed to insert a float");

    // Null
    connector
        .prepare(
            insert,
            Some(params! { "weight" => Option::<f64>::None, "name" => Option::<String>::None }),
        )
        .await
        .expect("Failed to prepare the insert");
    assert!(connector.debug().contains("param_type=0"));
    connector.execute().await.expect("Failed to insert nulls");

    // A string that reads as a number goes into a text column
    connector
        .prepare(insert, Some(params! { "weight" => 1, "name" => "42" }))
        .await
        .expect("Failed to prepare the insert")
        .execute()
        .await
        .expect("Failed to insert a numeric name");

    let query = indoc! {"
        SELECT name, weight
        FROM test
        WHERE name = :name OR (name IS NULL AND :name IS NULL)
        ORDER BY id
    "};
    let rows = connector
        .fetch(query, Some(params! { "name" => "Numeric" }))
        .await
        .expect("Failed to fetch the numeric row")
        .expect("The numeric row should be found");
    assert_eq!(rows[0].get::<f64>("weight").unwrap(), 63.0);

    let rows = connector
        .fetch(query, Some(params! { "name" => "Float" }))
        .await
        .expect("Failed to fetch the float row")
        .expect("The float row should be found");
    assert_eq!(rows[0].get::<f64>("weight").unwrap(), 80.0);

    let rows = connector
        .fetch(
            "SELECT name, weight FROM test WHERE name IS NULL",
            None,
        )
        .await
        .expect("Failed to fetch the null row")
        .expect("The null row should be found");
    assert_eq!(rows.len(), 1);
    assert!(rows[0].get_column("name").is_some_and(Value::is_null));
    assert!(rows[0].get_column("weight").is_some_and(Value::is_null));

    let rows = connector
        .fetch(query, Some(params! { "name" => 42 }))
        .await
        .expect("Failed to fetch the numeric name")
        .expect("The numeric name should be found");
    assert_eq!(rows[0].get::<String>("name").unwrap(), "42");

    // Booleans
    let count = "SELECT name FROM test WHERE :flag = TRUE";
    connector
        .prepare(count, Some(params! { "flag" => true }))
        .await
        .expect("Failed to prepare the boolean query");
    assert!(connector.debug().contains(&format!("param_type={}", BindType::Boolean.code())));
    assert_eq!(connector.execute().await.unwrap().row_count(), 4);
    connector
        .prepare(count, Some(params! { "flag" => false }))
        .await
        .expect("Failed to prepare the boolean query");
    assert_eq!(connector.execute().await.unwrap().row_count(), 0);
    assert_eq!(connector.fetch_all(), None);
}
