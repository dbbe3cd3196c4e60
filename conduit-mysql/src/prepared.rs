use crate::ValueWrap;
use conduit_core::{Bindings, NamedQuery, Prepared, Result};
use mysql_async::Statement;
use std::fmt::{self, Display};

#[derive(Debug)]
pub struct MySQLPrepared {
    pub(crate) statement: Statement,
    pub(crate) bindings: Bindings,
}

impl MySQLPrepared {
    pub(crate) fn new(statement: Statement, query: NamedQuery) -> Self {
        Self {
            statement,
            bindings: Bindings::new(query),
        }
    }
    pub(crate) fn params(&self) -> Result<mysql_async::Params> {
        let values = self.bindings.values()?;
        if values.is_empty() {
            return Ok(mysql_async::Params::Empty);
        }
        Ok(mysql_async::Params::Positional(
            values
                .into_iter()
                .map(|v| ValueWrap(v).try_into())
                .collect::<Result<_>>()?,
        ))
    }
}

impl Prepared for MySQLPrepared {
    fn bindings(&self) -> &Bindings {
        &self.bindings
    }
    fn bindings_mut(&mut self) -> &mut Bindings {
        &mut self.bindings
    }
}

impl Display for MySQLPrepared {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.bindings.query())
    }
}
