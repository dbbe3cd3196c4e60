use crate::{BoundParameter, ConnectorError, Error, NamedQuery, Result, Value};
use std::fmt::Display;

/// A statement compiled by the native client, together with its bindings.
///
/// Drivers only have to expose their [`Bindings`]: name resolution, type
/// inference and coercion are shared.
pub trait Prepared: Send + Sync + Display {
    fn bindings(&self) -> &Bindings;
    fn bindings_mut(&mut self) -> &mut Bindings;

    fn query(&self) -> &NamedQuery {
        self.bindings().query()
    }
    /// The rewritten query, as sent to the native client.
    fn sql(&self) -> &str {
        self.query().sql()
    }
    fn parameters(&self) -> &[BoundParameter] {
        self.bindings().parameters()
    }
    /// Bind a parameter to every placeholder carrying its name.
    fn bind(&mut self, parameter: BoundParameter) -> Result<&mut Self> {
        self.bindings_mut().bind(parameter)?;
        Ok(self)
    }
    /// Remove all the previously bound values.
    fn clear_bindings(&mut self) -> Result<&mut Self> {
        self.bindings_mut().clear();
        Ok(self)
    }
}

/// Values bound to the positional slots of a [`NamedQuery`].
#[derive(Debug, Clone)]
pub struct Bindings {
    query: NamedQuery,
    parameters: Vec<BoundParameter>,
    values: Vec<Option<Value>>,
}

impl Bindings {
    pub fn new(query: NamedQuery) -> Self {
        let len = query.slots().len();
        Self {
            query,
            parameters: Vec::new(),
            values: vec![None; len],
        }
    }

    pub fn query(&self) -> &NamedQuery {
        &self.query
    }

    /// Parameters in the order they were bound, one per name.
    pub fn parameters(&self) -> &[BoundParameter] {
        &self.parameters
    }

    pub fn bind(&mut self, parameter: BoundParameter) -> Result<()> {
        if !self.query.contains(parameter.name()) {
            return Err(Error::msg(format!(
                "The query has no placeholder named `:{}`",
                parameter.name()
            ))
            .context(ConnectorError::Bind {
                name: parameter.name().to_string(),
            }));
        }
        let value = parameter.coerced()?;
        for i in self.query.positions(parameter.name()) {
            self.values[i] = Some(value.clone());
        }
        match self
            .parameters
            .iter_mut()
            .find(|v| v.name() == parameter.name())
        {
            Some(existing) => *existing = parameter,
            None => self.parameters.push(parameter),
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.parameters.clear();
        self.values.iter_mut().for_each(|v| *v = None);
    }

    /// Coerced values in positional order. Fails if a placeholder was left unbound.
    pub fn values(&self) -> Result<Vec<Value>> {
        self.values
            .iter()
            .zip(self.query.slots())
            .map(|(value, name)| {
                value.clone().ok_or_else(|| {
                    Error::msg(format!("The placeholder `:{name}` was not bound"))
                        .context(ConnectorError::Bind { name: name.clone() })
                })
            })
            .collect()
    }
}
