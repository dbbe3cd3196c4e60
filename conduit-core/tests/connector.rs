#[cfg(test)]
mod tests {
    use conduit_core::{
        Bindings, Connection, ConnectionConfig, Connector, DriverKind, Dsn, Error, NamedQuery,
        Prepared, Result, ResultSet, RowLabeled, RowNames, Value, error_kind, params,
    };
    use std::fmt::{self, Display};

    /// Echoes the bound values of a `SELECT` back as a single row.
    struct EchoConnection {
        last_id: i64,
    }

    struct EchoPrepared {
        bindings: Bindings,
    }

    impl Display for EchoPrepared {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.bindings.query())
        }
    }

    impl Prepared for EchoPrepared {
        fn bindings(&self) -> &Bindings {
            &self.bindings
        }
        fn bindings_mut(&mut self) -> &mut Bindings {
            &mut self.bindings
        }
    }

    impl Connection for EchoConnection {
        type Prepared = EchoPrepared;

        fn driver_kind(&self) -> DriverKind {
            DriverKind::MySQL
        }

        async fn connect(dsn: &Dsn) -> Result<Self> {
            if dsn.get("host") == Some("unreachable") {
                return Err(Error::msg("Connection refused"));
            }
            Ok(Self { last_id: 0 })
        }

        async fn prepare(&mut self, query: NamedQuery) -> Result<Self::Prepared> {
            if query.sql().starts_with("INVALID") {
                return Err(Error::msg("You have an error in your SQL syntax"));
            }
            Ok(EchoPrepared {
                bindings: Bindings::new(query),
            })
        }

        async fn execute(&mut self, prepared: &mut Self::Prepared) -> Result<ResultSet> {
            let values = prepared.bindings().values()?;
            let sql = prepared.query().sql();
            if sql.starts_with("INSERT") {
                self.last_id += 1;
                return Ok(ResultSet::affected(1));
            }
            if sql.starts_with("FAIL") {
                return Err(Error::msg("Table 'test' doesn't exist"));
            }
            if values.is_empty() {
                return Ok(ResultSet::default());
            }
            let labels: RowNames = prepared.query().slots().to_vec().into();
            Ok(ResultSet::from_rows(vec![RowLabeled::new(
                labels,
                values.into(),
            )]))
        }

        async fn last_insert_id(&mut self, name: Option<&str>) -> Result<i64> {
            match name {
                Some(name) => Err(Error::msg(format!("relation \"{name}\" does not exist"))),
                None => Ok(self.last_id),
            }
        }
    }

    async fn connector() -> Connector<EchoConnection> {
        Connector::connect(Dsn::build(DriverKind::MySQL, &ConnectionConfig::new()))
            .await
            .expect("Could not connect")
    }

    #[tokio::test]
    async fn connect() {
        let connector = connector().await;
        assert!(connector.is_connected());
        assert!(connector.is_connected());
        assert_eq!(connector.driver(), DriverKind::MySQL);
        assert_eq!(connector.row_count(), 0);

        let dsn = Dsn::build(
            DriverKind::MySQL,
            &ConnectionConfig::new().host("unreachable").password("hunter2"),
        );
        let Err(error) = Connector::<EchoConnection>::connect(dsn).await else {
            panic!("The connection should fail");
        };
        let kind = error_kind(&error).expect("Classified error");
        assert!(kind.is_connection());
        assert!(!format!("{error:#}").contains("hunter2"));
    }

    #[tokio::test]
    async fn debug_dump() {
        let mut connector = connector().await;
        assert_eq!(connector.debug(), "SQL: [0] \nParams:  0");

        connector.prepare("SELECT 1 FROM test", None).await.unwrap();
        assert_eq!(connector.debug(), "SQL: [18] SELECT 1 FROM test\nParams:  0");

        let query = "SELECT name, weight FROM test WHERE name = :name";
        connector
            .prepare(query, Some(params! { "name" => "John" }))
            .await
            .unwrap();
        assert_eq!(
            connector.debug(),
            format!(
                "SQL: [{}] {}\nParams:  1\nKey: Name: [5] :name\nparamno=0\nname=[5] \":name\"\nis_param=1\nparam_type=2",
                query.len(),
                query
            )
        );

        connector
            .prepare(
                "SELECT :flag, :weight",
                Some(params! { ":flag" => true, "weight" => 63.245 }),
            )
            .await
            .unwrap();
        let dump = connector.debug();
        assert!(dump.contains("Params:  2"));
        assert!(dump.contains("Key: Name: [5] :flag\nparamno=0"));
        assert!(dump.contains("param_type=5"));
        assert!(dump.contains("Key: Name: [7] :weight\nparamno=1"));
        assert!(dump.contains("param_type=1"));
    }

    #[tokio::test]
    async fn prepare_execute_fetch() {
        let mut connector = connector().await;
        let rows = connector
            .prepare(
                "SELECT :name AS name, :weight AS weight",
                Some(params! { "name" => "John", "weight" => 63.245 }),
            )
            .await
            .unwrap()
            .execute()
            .await
            .unwrap()
            .fetch_all()
            .expect("One row");
        assert_eq!(rows.len(), 1);
        let row = &rows[0];
        assert_eq!(row.names(), ["name", "weight"]);
        assert!(row.contains(&Value::Varchar(Some("John".into()))));
        assert_eq!(row.get::<String>("name").unwrap(), "John");
        assert_eq!(row.get::<i64>("weight").unwrap(), 63);
        assert_eq!(connector.row_count(), 1);

        assert_eq!(connector.fetch_all(), None);
        assert_eq!(connector.row_count(), 1);

        let rows = connector
            .fetch("SELECT :id", Some(params! { "id" => 7 }))
            .await
            .unwrap()
            .expect("One row");
        assert_eq!(rows[0].values(), [Value::Int64(Some(7))]);
    }

    #[tokio::test]
    async fn not_executed() {
        let mut connector = connector().await;
        assert_eq!(connector.fetch_all(), None);
        connector
            .prepare("SELECT :id", Some(params! { "id" => 1 }))
            .await
            .unwrap();
        assert_eq!(connector.fetch_all(), None);
        assert_eq!(connector.row_count(), 0);

        connector.prepare("SELECT 1", None).await.unwrap();
        connector.execute().await.unwrap();
        assert_eq!(connector.row_count(), 0);
        assert_eq!(connector.fetch_all(), None);
    }

    #[tokio::test]
    async fn insert() {
        let mut connector = connector().await;
        let count = connector
            .prepare("INSERT INTO test (weight, name) VALUES (63.245, 'John')", None)
            .await
            .unwrap()
            .execute()
            .await
            .unwrap()
            .row_count();
        assert_eq!(count, 1);
        assert_eq!(connector.fetch_all(), None);
        assert_eq!(connector.last_inserted_id(None).await.unwrap(), 1);

        connector.execute().await.unwrap();
        assert_eq!(connector.last_inserted_id(None).await.unwrap(), 2);

        let error = connector
            .last_inserted_id(Some("test_id_seq"))
            .await
            .expect_err("Unknown sequence");
        assert!(error_kind(&error).is_some_and(|v| v.is_execution()));
    }

    #[tokio::test]
    async fn bind_errors() {
        let mut connector = connector().await;

        let error = connector
            .prepare("SELECT :name", Some(params! { "age" => 30 }))
            .await
            .expect_err("Unknown placeholder");
        assert_eq!(
            error_kind(&error).unwrap().to_string(),
            "cannot bind the parameter `:age`"
        );
        assert_eq!(connector.debug(), "SQL: [0] \nParams:  0");

        connector
            .prepare("SELECT :name, :age", Some(params! { "name" => "John" }))
            .await
            .unwrap();
        let error = connector.execute().await.expect_err("Unbound placeholder");
        let kind = error_kind(&error).unwrap();
        assert!(kind.is_bind());
        assert_eq!(kind.to_string(), "cannot bind the parameter `:age`");

        let error = connector.bind("name", "John").expect_err("No statement");
        assert!(error_kind(&error).is_some_and(|v| v.is_bind()));

        let error = connector
            .prepare("SELECT :big", Some(params! { "big" => u64::MAX }))
            .await
            .expect_err("Out of range");
        assert!(error_kind(&error).is_some_and(|v| v.is_bind()));
    }

    #[tokio::test]
    async fn rebind() {
        let mut connector = connector().await;
        connector
            .prepare("SELECT :id", Some(params! { "id" => 1 }))
            .await
            .unwrap();
        connector.execute().await.unwrap();
        let rows = connector.bind("id", "2").unwrap().fetch_all();
        assert_eq!(rows, None);
        let rows = connector.execute().await.unwrap().fetch_all().unwrap();
        assert_eq!(rows[0].values(), [Value::Int64(Some(2))]);
    }

    #[tokio::test]
    async fn execution_errors() {
        let mut connector = connector().await;

        let error = connector.execute().await.expect_err("Nothing prepared");
        assert!(error_kind(&error).is_some_and(|v| v.is_execution()));

        let error = connector
            .prepare("INVALID QUERY", None)
            .await
            .expect_err("Syntax error");
        assert!(error_kind(&error).is_some_and(|v| v.is_execution()));

        connector.prepare("FAIL SELECT 1", None).await.unwrap();
        let error = connector.execute().await.expect_err("Missing table");
        let kind = error_kind(&error).unwrap();
        assert!(kind.is_execution());
        assert!(format!("{error:#}").contains("doesn't exist"));
        assert_eq!(connector.row_count(), 0);
        assert!(connector.execute().await.is_err());

        assert!(connector.fetch("FAIL", None).await.is_err());
    }

    #[tokio::test]
    async fn disconnect() {
        let connector = connector().await;
        connector.disconnect().await.unwrap();
    }
}
