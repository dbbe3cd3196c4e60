use crate::{DriverKind, ErrorContext, Result, configuration_error};
use std::env;

pub const ENV_DRIVER: &str = "DB_DRIVER";
pub const ENV_HOST: &str = "DB_HOST";
pub const ENV_PORT: &str = "DB_PORT";
pub const ENV_DBNAME: &str = "DB_NAME";
pub const ENV_USER: &str = "DB_USER";
pub const ENV_PASSWORD: &str = "DB_PASSWORD";
pub const ENV_CHARSET: &str = "DB_CHARSET";

/// Settings a connection string is built from.
///
/// Every field is optional: [`Dsn::build`](crate::Dsn::build) substitutes the
/// default of the driver family for anything missing. `charset` is read by
/// MySQL only, `client_encoding` by PostgreSQL only.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConnectionConfig {
    pub driver: Option<DriverKind>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub dbname: Option<String>,
    pub user: Option<String>,
    pub password: Option<String>,
    pub charset: Option<String>,
    pub client_encoding: Option<String>,
}

impl ConnectionConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn driver(mut self, driver: DriverKind) -> Self {
        self.driver = Some(driver);
        self
    }
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }
    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }
    pub fn dbname(mut self, dbname: impl Into<String>) -> Self {
        self.dbname = Some(dbname.into());
        self
    }
    pub fn user(mut self, user: impl Into<String>) -> Self {
        self.user = Some(user.into());
        self
    }
    pub fn password(mut self, password: impl Into<String>) -> Self {
        self.password = Some(password.into());
        self
    }
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }
    pub fn client_encoding(mut self, client_encoding: impl Into<String>) -> Self {
        self.client_encoding = Some(client_encoding.into());
        self
    }

    /// Assign a setting by its key: `driver`, `host`, `port`, `dbname`,
    /// `user`, `password`, `charset` or `client_encoding`.
    pub fn set(&mut self, key: &str, value: impl AsRef<str>) -> Result<&mut Self> {
        let value = value.as_ref();
        match key {
            "driver" => self.driver = Some(value.parse()?),
            "host" => self.host = Some(value.into()),
            "port" => {
                self.port = Some(value.trim().parse().map_err(|_| {
                    configuration_error(format!("port `{value}` is not a valid port number"))
                })?)
            }
            "dbname" => self.dbname = Some(value.into()),
            "user" => self.user = Some(value.into()),
            "password" => self.password = Some(value.into()),
            "charset" => self.charset = Some(value.into()),
            "client_encoding" => self.client_encoding = Some(value.into()),
            _ => {
                return Err(configuration_error(format!(
                    "unknown connection setting `{key}`"
                )));
            }
        }
        Ok(self)
    }

    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Result<Self>
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut config = Self::new();
        for (key, value) in pairs {
            config.set(key.as_ref(), value)?;
        }
        Ok(config)
    }

    /// Read the settings from the process environment, after loading a `.env`
    /// file from the working directory when there is one.
    ///
    /// `DB_DRIVER`, `DB_HOST`, `DB_PORT`, `DB_NAME`, `DB_USER` and
    /// `DB_PASSWORD` are required, `DB_CHARSET` is optional and feeds both the
    /// MySQL charset and the PostgreSQL client encoding.
    pub fn from_env() -> Result<Self> {
        match dotenvy::dotenv() {
            Ok(path) => log::debug!("Loaded environment from `{}`", path.display()),
            Err(e) if e.not_found() => {}
            Err(e) => log::warn!("Could not load the .env file: {:#}", e),
        }
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Same as [`ConnectionConfig::from_env`] reading from `lookup` instead.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        const REQUIRED: [(&str, &str); 6] = [
            (ENV_DRIVER, "driver"),
            (ENV_HOST, "host"),
            (ENV_PORT, "port"),
            (ENV_DBNAME, "dbname"),
            (ENV_USER, "user"),
            (ENV_PASSWORD, "password"),
        ];
        let values = REQUIRED.map(|(variable, key)| (variable, key, lookup(variable)));
        let missing: Vec<&str> = values
            .iter()
            .filter(|(.., value)| value.is_none())
            .map(|(variable, ..)| *variable)
            .collect();
        if !missing.is_empty() {
            return Err(configuration_error(format!(
                "missing environment variables: {}",
                missing.join(", ")
            )));
        }
        let mut config = Self::new();
        for (variable, key, value) in values {
            if let Some(value) = value {
                config
                    .set(key, value)
                    .with_context(|| format!("While reading `{variable}`"))?;
            }
        }
        if let Some(charset) = lookup(ENV_CHARSET) {
            config.charset = Some(charset.clone());
            config.client_encoding = Some(charset);
        }
        Ok(config)
    }
}
