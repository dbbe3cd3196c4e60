mod connection;
mod driver;
mod prepared;
mod value_holder;

pub use connection::*;
pub use driver::*;
pub use prepared::*;
pub(crate) use value_holder::*;
