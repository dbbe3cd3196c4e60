#[cfg(test)]
mod tests {
    use conduit::{AnyConnection, ConnectionConfig, Connector, DriverKind, Dsn, error_kind};

    #[tokio::test]
    async fn missing_driver() {
        let config = ConnectionConfig::new().host("127.0.0.1");
        let error = conduit::connect(&config)
            .await
            .expect_err("No driver selected");
        assert!(error_kind(&error).is_some_and(|v| v.is_configuration()));
    }

    #[tokio::test]
    async fn unreachable() {
        for driver in [DriverKind::MySQL, DriverKind::PostgreSQL] {
            let config = ConnectionConfig::new()
                .driver(driver)
                .host("127.0.0.1")
                .port(1)
                .password("hunter2");
            let error = conduit::connect(&config)
                .await
                .expect_err("Nothing listens on port 1");
            let kind = error_kind(&error).expect("Classified error");
            assert!(kind.is_connection(), "{driver}: {error:#}");
            assert!(!format!("{error:#}").contains("hunter2"));
        }
    }

    #[tokio::test]
    async fn malformed_dsn() {
        let error = Dsn::parse("sqlite:file=test.db").expect_err("Unknown driver");
        assert!(error_kind(&error).is_some_and(|v| v.is_configuration()));

        let dsn = Dsn::parse("pgsql:host=127.0.0.1;port=1").unwrap();
        let error = Connector::<AnyConnection>::connect(dsn)
            .await
            .expect_err("Nothing listens on port 1");
        assert!(error_kind(&error).is_some_and(|v| v.is_connection()));
    }
}
