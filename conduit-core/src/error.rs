use crate::Error;

/// Classification of the failures surfaced by a [`Connector`](crate::Connector).
///
/// The variant travels inside the `anyhow` chain as context, the native client
/// error (if any) stays available as its source. Use [`error_kind`] to
/// recover it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConnectorError {
    /// A required setting is absent or malformed. Raised before any connection attempt.
    #[error("invalid configuration: {0}")]
    Configuration(String),
    /// The native client could not open a handle.
    #[error("could not connect to `{0}`")]
    Connection(String),
    /// A value could not be bound to its placeholder.
    #[error("cannot bind the parameter `:{name}`")]
    Bind { name: String },
    /// The native client rejected the statement.
    #[error("execution failed:\n{0}")]
    Execution(String),
}

impl ConnectorError {
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(..))
    }
    pub fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(..))
    }
    pub fn is_bind(&self) -> bool {
        matches!(self, Self::Bind { .. })
    }
    pub fn is_execution(&self) -> bool {
        matches!(self, Self::Execution(..))
    }
}

/// Find the [`ConnectorError`] attached anywhere in the chain of `error`.
pub fn error_kind(error: &Error) -> Option<&ConnectorError> {
    error.downcast_ref::<ConnectorError>()
}

pub(crate) fn configuration_error(message: impl Into<String>) -> Error {
    let error = Error::new(ConnectorError::Configuration(message.into()));
    log::error!("{:#}", error);
    error
}

/// Same as [`configuration_error`], keeping `source` at the root of the chain.
pub(crate) fn configuration_error_from(
    source: impl std::error::Error + Send + Sync + 'static,
    message: impl Into<String>,
) -> Error {
    let error = Error::new(source).context(ConnectorError::Configuration(message.into()));
    log::error!("{:#}", error);
    error
}
