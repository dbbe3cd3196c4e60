use crate::{reset_table, silent_logs};
use conduit_core::{Connection, Connector, error_kind, params};
use std::sync::LazyLock;
use tokio::sync::Mutex;

pub async fn errors<C: Connection>(connector: &mut Connector<C>) {
    static MUTEX: LazyLock<Mutex<()>> = LazyLock::new(|| Mutex::new(()));
    let _lock = MUTEX.lock().await;

    reset_table(connector).await;
    silent_logs! {
        // Unknown name
        let error = connector
            .prepare(
                "SELECT name FROM test WHERE name = :name",
                Some(params! { "surname" => "Doe" }),
            )
            .await
            .expect_err("Binding an unknown name should fail");
        assert!(error_kind(&error).is_some_and(|v| v.is_bind()));
        assert_eq!(connector.debug(), "SQL: [0] \nParams:  0");

        // Placeholder left unbound
        connector
            .prepare(
                "SELECT name FROM test WHERE name = :name AND weight = :weight",
                Some(params! { "name" => "John" }),
            )
            .await
            .expect("Failed to prepare the select");
        let error = connector
            .execute()
            .await
            .expect_err("Executing with an unbound placeholder should fail");
        assert!(error_kind(&error).is_some_and(|v| v.is_bind()));

        // Invalid query
        let error = connector
            .prepare("SELEC name FORM test", None)
            .await
            .expect_err("An invalid query should fail");
        assert!(error_kind(&error).is_some_and(|v| v.is_execution()));
        let error = connector
            .execute()
            .await
            .expect_err("Nothing is prepared after a failure");
        assert!(error_kind(&error).is_some_and(|v| v.is_execution()));
        assert_eq!(connector.row_count(), 0);

        // Missing table
        let error = connector
            .fetch("SELECT * FROM missing_table", None)
            .await
            .expect_err("A missing table should fail");
        assert!(error_kind(&error).is_some_and(|v| v.is_execution()));

        // Recovers on the next prepare
        let rows = connector
            .fetch("SELECT name FROM test", None)
            .await
            .expect("The connector should recover after a failure");
        assert_eq!(rows, None);
    }
}
