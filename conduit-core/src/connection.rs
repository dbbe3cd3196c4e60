use crate::{DriverKind, Dsn, NamedQuery, Prepared, Result, ResultSet};
use std::future::{self, Future};

/// A native database handle, as provided by a driver.
///
/// This is the capability set the [`Connector`](crate::Connector) proxies:
/// open, prepare, execute and read the last generated identifier. Every
/// method is awaited to completion before the next one is issued.
pub trait Connection: Send + Sized {
    type Prepared: Prepared;

    fn driver_kind(&self) -> DriverKind;

    /// Open a connection described by `dsn`.
    fn connect(dsn: &Dsn) -> impl Future<Output = Result<Self>> + Send;

    /// Compile the rewritten query, placeholders are already positional.
    fn prepare(
        &mut self,
        query: NamedQuery,
    ) -> impl Future<Output = Result<Self::Prepared>> + Send;

    /// Run the statement with its current bindings and buffer what it produced.
    fn execute(
        &mut self,
        prepared: &mut Self::Prepared,
    ) -> impl Future<Output = Result<ResultSet>> + Send;

    /// Identifier generated by the last insert, or the current value of the
    /// sequence `name` when the backend supports it.
    fn last_insert_id(&mut self, name: Option<&str>) -> impl Future<Output = Result<i64>> + Send;

    fn disconnect(self) -> impl Future<Output = Result<()>> + Send {
        future::ready(Ok(()))
    }
}
