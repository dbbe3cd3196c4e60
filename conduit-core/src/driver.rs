use crate::{
    Connection, ConnectionConfig, Connector, Dsn, Error, PlaceholderStyle, Result,
    configuration_error,
};
use std::{
    fmt::{self, Display},
    future::Future,
    str::FromStr,
};

/// Database family a connection string is written for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DriverKind {
    MySQL,
    PostgreSQL,
}

impl DriverKind {
    /// Leading segment of the connection string.
    pub const fn prefix(&self) -> &'static str {
        match self {
            DriverKind::MySQL => "mysql",
            DriverKind::PostgreSQL => "pgsql",
        }
    }
    pub const fn placeholder_style(&self) -> PlaceholderStyle {
        match self {
            DriverKind::MySQL => PlaceholderStyle::QuestionMark,
            DriverKind::PostgreSQL => PlaceholderStyle::Dollar,
        }
    }
}

impl Display for DriverKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.prefix())
    }
}

impl FromStr for DriverKind {
    type Err = Error;
    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "mysql" | "mariadb" => Ok(DriverKind::MySQL),
            "pgsql" | "postgres" | "postgresql" => Ok(DriverKind::PostgreSQL),
            _ => Err(configuration_error(format!(
                "unknown driver `{value}`, expected `mysql` or `pgsql`"
            ))),
        }
    }
}

/// Entry point of a backend: builds the connection string for its family and
/// opens a [`Connector`] on it.
pub trait Driver {
    type Connection: Connection;

    const KIND: DriverKind;

    fn dsn(&self, config: &ConnectionConfig) -> Dsn {
        Dsn::build(Self::KIND, config)
    }

    fn create(&self, config: &ConnectionConfig) -> impl Future<Output = Result<Connector<Self::Connection>>> {
        Connector::connect(self.dsn(config))
    }
}
