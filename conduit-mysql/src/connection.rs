use crate::{MySQLPrepared, RowWrap};
use conduit_core::{
    Connection, DriverKind, Dsn, Error, ErrorContext, MYSQL_DEFAULT_CHARSET, MYSQL_DEFAULT_HOST,
    MYSQL_DEFAULT_PORT, NamedQuery, Result, ResultSet, truncate_long,
};
use mysql_async::{Conn, OptsBuilder, prelude::Queryable};

pub struct MySQLConnection {
    pub(crate) connection: Conn,
}

impl Connection for MySQLConnection {
    type Prepared = MySQLPrepared;

    fn driver_kind(&self) -> DriverKind {
        DriverKind::MySQL
    }

    async fn connect(dsn: &Dsn) -> Result<MySQLConnection> {
        let context = || format!("While trying to connect to `{}`", dsn.redacted());
        if dsn.driver()? != DriverKind::MySQL {
            let error = Error::msg(format!(
                "MySQL connection string must start with `{}:`",
                DriverKind::MySQL.prefix()
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let charset = dsn.get("charset").unwrap_or(MYSQL_DEFAULT_CHARSET);
        let opts = OptsBuilder::default()
            .ip_or_hostname(dsn.get("host").unwrap_or(MYSQL_DEFAULT_HOST))
            .tcp_port(dsn.port()?.unwrap_or(MYSQL_DEFAULT_PORT))
            .db_name(dsn.get("dbname"))
            .user(dsn.get("user"))
            .pass(dsn.get("password"))
            .init(vec![format!("SET NAMES {charset}")]);
        let connection = Conn::new(opts).await.with_context(context)?;
        Ok(MySQLConnection { connection })
    }

    async fn prepare(&mut self, query: NamedQuery) -> Result<MySQLPrepared> {
        let statement = self
            .connection
            .prep(query.sql().to_string())
            .await
            .with_context(|| {
                format!("While preparing the query:\n{}", truncate_long!(query.sql()))
            })?;
        Ok(MySQLPrepared::new(statement, query))
    }

    async fn execute(&mut self, prepared: &mut MySQLPrepared) -> Result<ResultSet> {
        let params = prepared.params()?;
        let rows = self
            .connection
            .exec::<RowWrap, _, _>(&prepared.statement, params)
            .await
            .with_context(|| format!("While running the query:\n{}", prepared))?;
        if rows.is_empty() && prepared.statement.columns().is_empty() {
            return Ok(ResultSet::affected(self.connection.affected_rows()));
        }
        Ok(ResultSet::from_rows(rows.into_iter().map(|v| v.0).collect()))
    }

    async fn last_insert_id(&mut self, _name: Option<&str>) -> Result<i64> {
        let id = self.connection.last_insert_id().unwrap_or_default();
        i64::try_from(id).context("The last inserted id does not fit an i64")
    }

    async fn disconnect(self) -> Result<()> {
        self.connection
            .disconnect()
            .await
            .context("While closing the MySQL connection")
    }
}
