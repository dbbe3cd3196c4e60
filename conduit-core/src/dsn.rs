use crate::{
    ConnectionConfig, DriverKind, Error, Result, configuration_error, configuration_error_from,
    redact_password,
};
use std::{
    fmt::{self, Display},
    str::FromStr,
};

pub const MYSQL_DEFAULT_HOST: &str = "mariadb";
pub const MYSQL_DEFAULT_PORT: u16 = 3306;
pub const MYSQL_DEFAULT_DBNAME: &str = "mariadb";
pub const MYSQL_DEFAULT_USER: &str = "mariadb";
pub const MYSQL_DEFAULT_PASSWORD: &str = "mariadb";
pub const MYSQL_DEFAULT_CHARSET: &str = "utf8mb4";

pub const POSTGRES_DEFAULT_HOST: &str = "postgres";
pub const POSTGRES_DEFAULT_PORT: u16 = 5432;
pub const POSTGRES_DEFAULT_DBNAME: &str = "postgres";
pub const POSTGRES_DEFAULT_USER: &str = "postgres";
pub const POSTGRES_DEFAULT_PASSWORD: &str = "postgres";
pub const POSTGRES_DEFAULT_CLIENT_ENCODING: &str = "utf8";

/// Connection string in the `driver:key=value;key=value` form.
///
/// Built with [`Dsn::build`], which never fails and performs no I/O: every
/// missing setting takes the default of the driver family. Values are written
/// as they are, they must not contain `;` or `=`.
///
/// ```rust
/// use conduit_core::{ConnectionConfig, DriverKind, Dsn};
/// let dsn = Dsn::build(DriverKind::MySQL, &ConnectionConfig::new().host("localhost"));
/// assert_eq!(
///     dsn.as_str(),
///     "mysql:host=localhost;port=3306;dbname=mariadb;user=mariadb;password=mariadb;charset=utf8mb4"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Dsn(String);

impl Dsn {
    pub fn build(driver: DriverKind, config: &ConnectionConfig) -> Self {
        match driver {
            DriverKind::MySQL => build_mysql(config),
            DriverKind::PostgreSQL => build_postgres(config),
        }
    }

    /// Accept an existing connection string after checking its shape.
    pub fn parse(value: impl Into<String>) -> Result<Self> {
        let dsn = Self(value.into());
        dsn.driver()?;
        if let Some(segment) = dsn.segments().find(|v| !v.contains('=')) {
            return Err(configuration_error(format!(
                "segment `{segment}` of `{}` is not a `key=value` pair",
                dsn.redacted()
            )));
        }
        dsn.port()?;
        Ok(dsn)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn driver(&self) -> Result<DriverKind> {
        let Some((prefix, _)) = self.0.split_once(':') else {
            return Err(configuration_error(format!(
                "`{}` does not start with a driver prefix",
                self.redacted()
            )));
        };
        prefix.parse()
    }

    fn segments(&self) -> impl Iterator<Item = &str> {
        self.0
            .split_once(':')
            .map(|(_, v)| v)
            .unwrap_or_default()
            .split(';')
            .filter(|v| !v.is_empty())
    }

    /// `key=value` pairs in order of appearance. The value extends to the end
    /// of the segment, so `options=--client-encoding=utf8` yields
    /// `("options", "--client-encoding=utf8")`.
    pub fn params(&self) -> impl Iterator<Item = (&str, &str)> {
        self.segments().filter_map(|v| v.split_once('='))
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn port(&self) -> Result<Option<u16>> {
        self.get("port")
            .map(|v| {
                v.parse::<u16>().map_err(|e| {
                    configuration_error_from(e, format!("port `{v}` is not a valid port number"))
                })
            })
            .transpose()
    }

    /// The connection string with the password masked, safe to log.
    pub fn redacted(&self) -> String {
        redact_password(&self.0).into_owned()
    }
}

fn build_mysql(config: &ConnectionConfig) -> Dsn {
    Dsn(format!(
        "{}:host={};port={};dbname={};user={};password={};charset={}",
        DriverKind::MySQL.prefix(),
        config.host.as_deref().unwrap_or(MYSQL_DEFAULT_HOST),
        config.port.unwrap_or(MYSQL_DEFAULT_PORT),
        config.dbname.as_deref().unwrap_or(MYSQL_DEFAULT_DBNAME),
        config.user.as_deref().unwrap_or(MYSQL_DEFAULT_USER),
        config.password.as_deref().unwrap_or(MYSQL_DEFAULT_PASSWORD),
        config.charset.as_deref().unwrap_or(MYSQL_DEFAULT_CHARSET),
    ))
}

fn build_postgres(config: &ConnectionConfig) -> Dsn {
    Dsn(format!(
        "{}:host={};port={};dbname={};user={};password={};options=--client-encoding={}",
        DriverKind::PostgreSQL.prefix(),
        config.host.as_deref().unwrap_or(POSTGRES_DEFAULT_HOST),
        config.port.unwrap_or(POSTGRES_DEFAULT_PORT),
        config.dbname.as_deref().unwrap_or(POSTGRES_DEFAULT_DBNAME),
        config.user.as_deref().unwrap_or(POSTGRES_DEFAULT_USER),
        config.password.as_deref().unwrap_or(POSTGRES_DEFAULT_PASSWORD),
        config
            .client_encoding
            .as_deref()
            .unwrap_or(POSTGRES_DEFAULT_CLIENT_ENCODING),
    ))
}

impl Display for Dsn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Dsn {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Dsn {
    type Err = Error;
    fn from_str(value: &str) -> Result<Self> {
        Self::parse(value)
    }
}

impl From<Dsn> for String {
    fn from(value: Dsn) -> Self {
        value.0
    }
}
