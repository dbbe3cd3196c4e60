use crate::PostgresConnection;
use conduit_core::{Driver, DriverKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDriver {}

impl PostgresDriver {
    pub const fn new() -> Self {
        Self {}
    }
}

impl Driver for PostgresDriver {
    type Connection = PostgresConnection;

    const KIND: DriverKind = DriverKind::PostgreSQL;
}
