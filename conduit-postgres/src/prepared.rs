use crate::ValueHolder;
use conduit_core::{Bindings, NamedQuery, Prepared, Result};
use std::fmt::{self, Display};
use tokio_postgres::Statement;

pub struct PostgresPrepared {
    pub(crate) statement: Statement,
    pub(crate) bindings: Bindings,
}

impl PostgresPrepared {
    pub(crate) fn new(statement: Statement, query: NamedQuery) -> Self {
        Self {
            statement,
            bindings: Bindings::new(query),
        }
    }
    /// Bound values, each one to be encoded as the type the server inferred for its slot.
    pub(crate) fn params(&self) -> Result<Vec<ValueHolder>> {
        Ok(self
            .bindings
            .values()?
            .into_iter()
            .map(ValueHolder)
            .collect())
    }
}

impl Prepared for PostgresPrepared {
    fn bindings(&self) -> &Bindings {
        &self.bindings
    }
    fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }
}

impl Display for PostgresPrepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bindings.query())
    }
}
