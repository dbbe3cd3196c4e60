use conduit_core::{ConnectionConfig, Dsn};
use indoc::indoc;
use std::{env, future::Future, pin::Pin, process::Command, time::Duration};
use testcontainers_modules::{
    mysql::Mysql,
    testcontainers::{
        ContainerAsync, ImageExt,
        core::logs::{LogFrame, consumer::LogConsumer},
        runners::AsyncRunner,
    },
};

struct TestcontainersLogConsumer;
impl LogConsumer for TestcontainersLogConsumer {
    fn accept<'a>(&'a self, record: &'a LogFrame) -> Pin<Box<dyn Future<Output = ()> + Send + 'a>> {
        let log = str::from_utf8(record.bytes())
            .unwrap_or("Invalid error message")
            .trim();
        if !log.is_empty() {
            match record {
                LogFrame::StdOut(..) => log::trace!("{log}"),
                LogFrame::StdErr(..) => log::debug!("{log}"),
            }
        }
        Box::pin(async {})
    }
}

/// Settings of the database under test, `None` when neither `CONDUIT_MYSQL_TEST`
/// (a connection string) nor docker is available.
pub async fn init() -> Option<(ConnectionConfig, Option<ContainerAsync<Mysql>>)> {
    if let Ok(dsn) = env::var("CONDUIT_MYSQL_TEST") {
        let dsn = Dsn::parse(dsn).expect("Invalid CONDUIT_MYSQL_TEST");
        let config = ConnectionConfig::from_pairs(dsn.params().filter(|(k, _)| {
            matches!(*k, "host" | "port" | "dbname" | "user" | "password" | "charset")
        }))
        .expect("Unsupported CONDUIT_MYSQL_TEST setting");
        return Some((config, None));
    };
    if !Command::new("docker")
        .arg("ps")
        .output()
        .map(|o| o.status.success())
        .unwrap_or(false)
    {
        log::error!("Cannot access docker, skipping the MySQL tests");
        return None;
    }
    let container = Mysql::default()
        .with_init_sql(
            indoc! {r#"
                CREATE DATABASE conduit;
                CREATE USER 'conduit-user'@'%' IDENTIFIED BY 'Sup3r$ecur3';
                GRANT ALL PRIVILEGES ON conduit.* TO 'conduit-user'@'%';
                FLUSH PRIVILEGES;
            "#}
            .to_string()
            .into_bytes(),
        )
        .with_startup_timeout(Duration::from_secs(60))
        .with_log_consumer(TestcontainersLogConsumer)
        .start()
        .await
        .expect("Could not start the container");
    let port = container
        .get_host_port_ipv4(3306)
        .await
        .expect("Cannot get the port of MySQL");
    let config = ConnectionConfig::new()
        .host("127.0.0.1")
        .port(port)
        .dbname("conduit")
        .user("conduit-user")
        .password("Sup3r$ecur3");
    Some((config, Some(container)))
}
