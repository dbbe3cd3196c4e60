use conduit_core::{
    Bindings, Connection, ConnectionConfig, Connector, ConnectorError, DriverKind, Dsn, Error,
    NamedQuery, Prepared, Result, ResultSet,
};
#[cfg(feature = "mysql")]
use conduit_mysql::{MySQLConnection, MySQLPrepared};
#[cfg(feature = "postgres")]
use conduit_postgres::{PostgresConnection, PostgresPrepared};
use std::fmt::{self, Display};

/// Connection to whichever family the connection string names.
pub enum AnyConnection {
    #[cfg(feature = "mysql")]
    MySQL(MySQLConnection),
    #[cfg(feature = "postgres")]
    Postgres(PostgresConnection),
}

pub enum AnyPrepared {
    #[cfg(feature = "mysql")]
    MySQL(MySQLPrepared),
    #[cfg(feature = "postgres")]
    Postgres(PostgresPrepared),
}

impl Prepared for AnyPrepared {
    fn bindings(&self) -> &Bindings {
        match self {
            #[cfg(feature = "mysql")]
            AnyPrepared::MySQL(v) => v.bindings(),
            #[cfg(feature = "postgres")]
            AnyPrepared::Postgres(v) => v.bindings(),
        }
    }
    fn bindings_mut(&mut self) -> &mut Bindings {
        match self {
            #[cfg(feature = "mysql")]
            AnyPrepared::MySQL(v) => v.bindings_mut(),
            #[cfg(feature = "postgres")]
            AnyPrepared::Postgres(v) => v.bindings_mut(),
        }
    }
}

impl Display for AnyPrepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            #[cfg(feature = "mysql")]
            AnyPrepared::MySQL(v) => Display::fmt(v, f),
            #[cfg(feature = "postgres")]
            AnyPrepared::Postgres(v) => Display::fmt(v, f),
        }
    }
}

impl Connection for AnyConnection {
    type Prepared = AnyPrepared;

    fn driver_kind(&self) -> DriverKind {
        match self {
            #[cfg(feature = "mysql")]
            AnyConnection::MySQL(..) => DriverKind::MySQL,
            #[cfg(feature = "postgres")]
            AnyConnection::Postgres(..) => DriverKind::PostgreSQL,
        }
    }

    async fn connect(dsn: &Dsn) -> Result<Self> {
        match dsn.driver()? {
            #[cfg(feature = "mysql")]
            DriverKind::MySQL => Ok(AnyConnection::MySQL(MySQLConnection::connect(dsn).await?)),
            #[cfg(feature = "postgres")]
            DriverKind::PostgreSQL => Ok(AnyConnection::Postgres(
                PostgresConnection::connect(dsn).await?,
            )),
            #[allow(unreachable_patterns)]
            kind => Err(Error::new(ConnectorError::Configuration(format!(
                "the `{kind}` driver is not enabled"
            )))),
        }
    }

    async fn prepare(&mut self, query: NamedQuery) -> Result<AnyPrepared> {
        Ok(match self {
            #[cfg(feature = "mysql")]
            AnyConnection::MySQL(v) => AnyPrepared::MySQL(v.prepare(query).await?),
            #[cfg(feature = "postgres")]
            AnyConnection::Postgres(v) => AnyPrepared::Postgres(v.prepare(query).await?),
        })
    }

    async fn execute(&mut self, prepared: &mut AnyPrepared) -> Result<ResultSet> {
        match (self, prepared) {
            #[cfg(feature = "mysql")]
            (AnyConnection::MySQL(connection), AnyPrepared::MySQL(prepared)) => {
                connection.execute(prepared).await
            }
            #[cfg(feature = "postgres")]
            (AnyConnection::Postgres(connection), AnyPrepared::Postgres(prepared)) => {
                connection.execute(prepared).await
            }
            #[allow(unreachable_patterns)]
            (connection, prepared) => Err(Error::msg(format!(
                "The statement `{prepared}` was not prepared by this `{}` connection",
                connection.driver_kind()
            ))),
        }
    }

    async fn last_insert_id(&mut self, name: Option<&str>) -> Result<i64> {
        match self {
            #[cfg(feature = "mysql")]
            AnyConnection::MySQL(v) => v.last_insert_id(name).await,
            #[cfg(feature = "postgres")]
            AnyConnection::Postgres(v) => v.last_insert_id(name).await,
        }
    }

    async fn disconnect(self) -> Result<()> {
        match self {
            #[cfg(feature = "mysql")]
            AnyConnection::MySQL(v) => v.disconnect().await,
            #[cfg(feature = "postgres")]
            AnyConnection::Postgres(v) => v.disconnect().await,
        }
    }
}

/// Open a connector for the family selected by `config.driver`, every other
/// missing setting taking the default of that family.
pub async fn connect(config: &ConnectionConfig) -> Result<Connector<AnyConnection>> {
    let Some(driver) = config.driver else {
        let error = Error::new(ConnectorError::Configuration(
            "no driver was selected".into(),
        ));
        log::error!("{:#}", error);
        return Err(error);
    };
    Connector::connect(Dsn::build(driver, config)).await
}
