use crate::{
    BoundParameter, Connection, ConnectorError, DriverKind, Dsn, Error, NamedQuery, Params,
    Prepared, Result, ResultSet, RowLabeled, Value, error_kind, truncate_long,
};
use std::{
    fmt::{self, Debug, Write},
    mem,
};

/// Stateful proxy over one native connection.
///
/// Holds at most one prepared statement at a time, together with whatever its
/// last execution produced. Preparing a new query discards both.
///
/// ```rust,ignore
/// let rows = connector
///     .prepare("SELECT name FROM test WHERE name = :name", Some(params! { "name" => "John" }))
///     .await?
///     .execute()
///     .await?
///     .fetch_all();
/// ```
pub struct Connector<C: Connection> {
    connection: C,
    statement: Option<Statement<C::Prepared>>,
}

struct Statement<P> {
    prepared: P,
    result: Option<ResultSet>,
}

impl<C: Connection> Connector<C> {
    /// Open the connection described by `dsn`.
    pub async fn connect(dsn: Dsn) -> Result<Self> {
        log::debug!("Connecting to `{}`", dsn.redacted());
        let connection = C::connect(&dsn).await.map_err(|e| {
            let e = if error_kind(&e).is_some() {
                e
            } else {
                e.context(ConnectorError::Connection(dsn.redacted()))
            };
            log::error!("{:#}", e);
            e
        })?;
        Ok(Self::new(connection))
    }

    /// Wrap a connection that is already open.
    pub fn new(connection: C) -> Self {
        Self {
            connection,
            statement: None,
        }
    }

    pub fn driver(&self) -> DriverKind {
        self.connection.driver_kind()
    }

    pub fn connection(&self) -> &C {
        &self.connection
    }

    pub fn connection_mut(&mut self) -> &mut C {
        &mut self.connection
    }

    /// A connector owns an open connection for its whole lifetime.
    pub fn is_connected(&self) -> bool {
        true
    }

    /// Compile `query` and bind `params` in order.
    ///
    /// The previous statement is discarded first, so on failure no statement
    /// is left.
    pub async fn prepare(
        &mut self,
        query: impl Into<String>,
        params: Option<Params>,
    ) -> Result<&mut Self> {
        self.statement = None;
        let query = NamedQuery::parse(query, self.driver().placeholder_style());
        log::debug!("Preparing the query:\n{}", truncate_long!(query.original()));
        let original = query.original().to_owned();
        let mut prepared = self
            .connection
            .prepare(query)
            .await
            .map_err(|e| execution_failure(e, &original))?;
        for (name, value) in params.into_iter().flatten() {
            if let Err(e) = prepared.bind(BoundParameter::new(name, value)) {
                log::error!("{:#}", e);
                return Err(e);
            }
        }
        self.statement = Some(Statement {
            prepared,
            result: None,
        });
        Ok(self)
    }

    /// Bind one more value to the current statement.
    pub fn bind(&mut self, name: impl Into<String>, value: impl Into<Value>) -> Result<&mut Self> {
        let parameter = BoundParameter::new(name, value);
        let Some(statement) = self.statement.as_mut() else {
            let e = Error::msg("No statement was prepared").context(ConnectorError::Bind {
                name: parameter.name().to_string(),
            });
            log::error!("{:#}", e);
            return Err(e);
        };
        statement.result = None;
        let result = statement.prepared.bind(parameter).map(|_| ());
        if let Err(e) = result {
            log::error!("{:#}", e);
            self.statement = None;
            return Err(e);
        }
        Ok(self)
    }

    /// Run the current statement and buffer its outcome.
    pub async fn execute(&mut self) -> Result<&mut Self> {
        let Some(statement) = self.statement.as_mut() else {
            let e = Error::new(ConnectorError::Execution(
                "no statement was prepared".into(),
            ));
            log::error!("{:#}", e);
            return Err(e);
        };
        log::debug!(
            "Executing the query:\n{}",
            truncate_long!(statement.prepared.query().original())
        );
        match self.connection.execute(&mut statement.prepared).await {
            Ok(result) => {
                log::debug!("The query produced {} rows", result.rows_affected);
                statement.result = Some(result);
                Ok(self)
            }
            Err(e) => {
                let e = execution_failure(e, statement.prepared.query().original());
                self.statement = None;
                Err(e)
            }
        }
    }

    /// Rows returned or affected by the last execution, 0 when nothing ran.
    pub fn row_count(&self) -> u64 {
        self.statement
            .as_ref()
            .and_then(|v| v.result.as_ref())
            .map_or(0, |v| v.rows_affected)
    }

    /// Hand out the rows buffered by the last execution.
    ///
    /// Returns `None` when nothing was executed or there is no row left.
    pub fn fetch_all(&mut self) -> Option<Vec<RowLabeled>> {
        let result = self.statement.as_mut()?.result.as_mut()?;
        if result.rows.is_empty() {
            return None;
        }
        Some(mem::take(&mut result.rows))
    }

    /// Prepare, execute and fetch in one call.
    pub async fn fetch(
        &mut self,
        query: impl Into<String>,
        params: Option<Params>,
    ) -> Result<Option<Vec<RowLabeled>>> {
        Ok(self.prepare(query, params).await?.execute().await?.fetch_all())
    }

    pub async fn last_inserted_id(&mut self, name: Option<&str>) -> Result<i64> {
        self.connection.last_insert_id(name).await.map_err(|e| {
            let subject = match name {
                Some(name) => format!("last inserted id of `{name}`"),
                None => "last inserted id".into(),
            };
            execution_failure(e, &subject)
        })
    }

    /// Describe the current statement and its parameters.
    pub fn debug(&self) -> String {
        let Some(statement) = &self.statement else {
            return "SQL: [0] \nParams:  0".into();
        };
        let query = statement.prepared.query().original();
        let parameters = statement.prepared.parameters();
        let mut out = format!(
            "SQL: [{}] {}\nParams:  {}",
            query.len(),
            query,
            parameters.len()
        );
        for (i, parameter) in parameters.iter().enumerate() {
            let name = format!(":{}", parameter.name());
            let _ = write!(
                out,
                "\nKey: Name: [{len}] {name}\nparamno={i}\nname=[{len}] \"{name}\"\nis_param=1\nparam_type={code}",
                len = name.len(),
                code = parameter.bind_type().code(),
            );
        }
        out
    }

    pub async fn disconnect(self) -> Result<()> {
        self.connection.disconnect().await.map_err(|e| {
            log::error!("{:#}", e);
            e
        })
    }
}

impl<C: Connection> Debug for Connector<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Connector")
            .field("driver", &self.driver())
            .field(
                "statement",
                &self.statement.as_ref().map(|v| v.prepared.to_string()),
            )
            .field("row_count", &self.row_count())
            .finish()
    }
}

fn execution_failure(error: Error, subject: &str) -> Error {
    let error = if error_kind(&error).is_some() {
        error
    } else {
        error.context(ConnectorError::Execution(
            truncate_long!(subject).to_string(),
        ))
    };
    log::error!("{:#}", error);
    error
}
