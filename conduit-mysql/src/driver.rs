use crate::MySQLConnection;
use conduit_core::{Driver, DriverKind};

#[derive(Debug, Clone, Copy, Default)]
pub struct MySQLDriver;
impl MySQLDriver {
    pub const fn new() -> Self {
        Self
    }
}

impl Driver for MySQLDriver {
    type Connection = MySQLConnection;

    const KIND: DriverKind = DriverKind::MySQL;
}
