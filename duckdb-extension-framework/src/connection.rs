use std::ptr;

use tracing::debug;

use crate::duckly::{
    duckdb_connect, duckdb_connection, duckdb_database, duckdb_disconnect,
    duckdb_register_scalar_function, DuckDBSuccess,
};
use crate::error::{Error, Result};
use crate::scalar_functions::{ScalarFunction, ScalarFunctionDef};

/// Anything scalar functions can be registered against.
pub trait FunctionRegistry {
    /// Registers `def`. The descriptor is released whether or not the host accepts it.
    fn register_scalar_function(&self, def: &ScalarFunctionDef) -> Result<()>;
}

/// A host database handle. Owned by the host.
pub struct Database(duckdb_database);

impl Database {
    pub fn from_raw(ptr: duckdb_database) -> Self {
        Self(ptr)
    }

    /// Opens a new connection, disconnected again when dropped.
    pub fn connect(&self) -> Result<Connection> {
        let mut connection: duckdb_connection = ptr::null_mut();
        let state = unsafe { duckdb_connect(self.0, &mut connection) };
        if state != DuckDBSuccess {
            return Err(Error::Connect);
        }
        Ok(Connection {
            ptr: connection,
            owned: true,
        })
    }
}

pub struct Connection {
    ptr: duckdb_connection,
    owned: bool,
}

/// Borrows a connection handle owned by the caller.
impl From<duckdb_connection> for Connection {
    fn from(ptr: duckdb_connection) -> Self {
        Self { ptr, owned: false }
    }
}

impl Connection {
    pub fn as_raw(&self) -> duckdb_connection {
        self.ptr
    }
}

impl FunctionRegistry for Connection {
    fn register_scalar_function(&self, def: &ScalarFunctionDef) -> Result<()> {
        let function = ScalarFunction::from_def(def)?;
        let state = unsafe { duckdb_register_scalar_function(self.ptr, function.ptr) };
        if state != DuckDBSuccess {
            return Err(Error::Registration {
                name: def.name().to_string(),
            });
        }
        debug!(name = def.name(), "registered scalar function");
        Ok(())
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        if self.owned && !self.ptr.is_null() {
            unsafe { duckdb_disconnect(&mut self.ptr) };
        }
    }
}
