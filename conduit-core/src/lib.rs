mod bind;
mod config;
mod connection;
mod connector;
mod driver;
mod dsn;
mod error;
mod named;
mod params;
mod prepared;
mod row;
mod util;
mod value;

pub use ::anyhow::Context as ErrorContext;
pub use bind::*;
pub use config::*;
pub use connection::*;
pub use connector::*;
pub use driver::*;
pub use dsn::*;
pub use error::*;
pub use named::*;
pub use params::*;
pub use prepared::*;
pub use row::*;
pub use util::*;
pub use value::*;

pub type Result<T> = anyhow::Result<T>;
pub type Error = anyhow::Error;
