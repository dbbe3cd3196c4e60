use conduit_core::{ConnectionConfig, Dsn};
use std::{env, process::Command, time::Duration};
use testcontainers_modules::{
    postgres::Postgres,
    testcontainers::{ContainerAsync, ImageExt, runners::AsyncRunner},
};

/// Settings of the database under test, `None` when neither `CONDUIT_POSTGRES_TEST`
/// (a connection string) nor docker is available.
pub async fn init() -> Option<(ConnectionConfig, Option<ContainerAsync<Postgres>>)> {
    if let Ok(dsn) = env::var("CONDUIT_POSTGRES_TEST") {
        let dsn = Dsn::parse(dsn).expect("Invalid CONDUIT_POSTGRES_TEST");
        let config = ConnectionConfig::from_pairs(dsn.params().filter(|(k, _)| {
            matches!(*k, "host" | "port" | "dbname" | "user" | "password" | "charset")
        }))
        .expect("Unsupported CONDUIT_POSTGRES_TEST setting");
        return Some((config, None));
    };
    if !Command::new("docker")
        .arg("ps")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
    {
        log::error!("Cannot access docker, skipping the PostgreSQL tests");
        return None;
    }
    let container = Postgres::default()
        .with_user("conduit-user")
        .with_password("Sup3r$ecur3")
        .with_db_name("conduit")
        .with_startup_timeout(Duration::from_secs(30))
        .start()
        .await
        .expect("Could not start the container");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Cannot get the port of Postgres");
    let config = ConnectionConfig::new()
        .host("127.0.0.1")
        .port(port)
        .dbname("conduit")
        .user("conduit-user")
        .password("Sup3r$ecur3");
    Some((config, Some(container)))
}
