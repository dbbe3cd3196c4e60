use crate::{PostgresPrepared, ValueHolder};
use conduit_core::{
    Connection, DriverKind, Dsn, Error, ErrorContext, NamedQuery, POSTGRES_DEFAULT_DBNAME,
    POSTGRES_DEFAULT_HOST, POSTGRES_DEFAULT_PASSWORD, POSTGRES_DEFAULT_PORT,
    POSTGRES_DEFAULT_USER, Result, ResultSet, Row, RowLabeled, RowNames, truncate_long,
};
use postgres_types::ToSql;
use tokio::spawn;
use tokio_postgres::NoTls;

pub struct PostgresConnection {
    pub(crate) client: tokio_postgres::Client,
}

impl Connection for PostgresConnection {
    type Prepared = PostgresPrepared;

    fn driver_kind(&self) -> DriverKind {
        DriverKind::PostgreSQL
    }

    async fn connect(dsn: &Dsn) -> Result<PostgresConnection> {
        let context = || format!("While trying to connect to `{}`", dsn.redacted());
        if dsn.driver()? != DriverKind::PostgreSQL {
            let error = Error::msg(format!(
                "PostgreSQL connection string must start with `{}:`",
                DriverKind::PostgreSQL.prefix()
            ))
            .context(context());
            log::error!("{:#}", error);
            return Err(error);
        }
        let mut config = tokio_postgres::Config::new();
        config
            .host(dsn.get("host").unwrap_or(POSTGRES_DEFAULT_HOST))
            .port(dsn.port()?.unwrap_or(POSTGRES_DEFAULT_PORT))
            .dbname(dsn.get("dbname").unwrap_or(POSTGRES_DEFAULT_DBNAME))
            .user(dsn.get("user").unwrap_or(POSTGRES_DEFAULT_USER))
            .password(dsn.get("password").unwrap_or(POSTGRES_DEFAULT_PASSWORD));
        if let Some(options) = dsn.get("options") {
            config.options(options);
        }
        let (client, connection) = config.connect(NoTls).await.with_context(context)?;
        spawn(async move {
            if let Err(e) = connection.await
                && !e.is_closed()
            {
                log::error!("Postgres connection error: {:#}", e);
            }
        });
        Ok(PostgresConnection { client })
    }

    async fn prepare(&mut self, query: NamedQuery) -> Result<PostgresPrepared> {
        let sql = query.sql().trim_end().trim_end_matches(';');
        let statement = self.client.prepare(sql).await.with_context(|| {
            format!("While preparing the query:\n{}", truncate_long!(sql))
        })?;
        Ok(PostgresPrepared::new(statement, query))
    }

    async fn execute(&mut self, prepared: &mut PostgresPrepared) -> Result<ResultSet> {
        let context = || format!("While running the query:\n{}", prepared);
        let params = prepared.params()?;
        let params: Vec<&(dyn ToSql + Sync)> =
            params.iter().map(|v| v as &(dyn ToSql + Sync)).collect();
        let statement = &prepared.statement;
        if statement.columns().is_empty() {
            let affected = self
                .client
                .execute(statement, &params)
                .await
                .with_context(context)?;
            return Ok(ResultSet::affected(affected));
        }
        let labels: RowNames = statement
            .columns()
            .iter()
            .map(|v| v.name().to_string())
            .collect();
        let rows = self
            .client
            .query(statement, &params)
            .await
            .with_context(context)?
            .into_iter()
            .map(|row| -> Result<RowLabeled> {
                let values = (0..row.len())
                    .map(|i| {
                        row.try_get::<_, ValueHolder>(i)
                            .map(|v| v.0)
                            .with_context(|| format!("While decoding the column `{}`", labels[i]))
                    })
                    .collect::<Result<Row>>()?;
                Ok(RowLabeled::new(labels.clone(), values))
            })
            .collect::<Result<Vec<_>>>()
            .with_context(context)?;
        Ok(ResultSet::from_rows(rows))
    }

    async fn last_insert_id(&mut self, name: Option<&str>) -> Result<i64> {
        let row = match name {
            Some(name) => {
                self.client
                    .query_one("SELECT currval($1::text::regclass)", &[&name])
                    .await
            }
            None => self.client.query_one("SELECT lastval()", &[]).await,
        }
        .with_context(|| match name {
            Some(name) => format!("While reading the current value of the sequence `{name}`"),
            None => "While reading the last inserted id".to_string(),
        })?;
        Ok(row.try_get::<_, i64>(0)?)
    }
}
