//! Thin database connector for MySQL and PostgreSQL.
//!
//! Builds connection strings from a [`ConnectionConfig`], opens the native
//! client of the selected family and proxies the prepare, bind, execute and
//! fetch cycle through a [`Connector`].
//!
//! ```rust,ignore
//! use conduit::{ConnectionConfig, DriverKind, params};
//!
//! let config = ConnectionConfig::new().driver(DriverKind::MySQL).host("localhost");
//! let mut connector = conduit::connect(&config).await?;
//! let rows = connector
//!     .fetch("SELECT name FROM test WHERE id = :id", Some(params! { "id" => 1 }))
//!     .await?;
//! ```
#[cfg(any(feature = "mysql", feature = "postgres"))]
mod any;

#[cfg(any(feature = "mysql", feature = "postgres"))]
pub use any::*;
pub use conduit_core::*;
#[cfg(feature = "mysql")]
pub use conduit_mysql as mysql;
#[cfg(feature = "postgres")]
pub use conduit_postgres as postgres;
