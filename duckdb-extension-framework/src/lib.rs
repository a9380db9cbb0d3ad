//! Safe wrappers over the DuckDB C extension API.
//!
//! Everything the extension needs from the host goes through this crate:
//! raw bindings live in [`duckly`], the rest of the modules wrap the opaque
//! host handles (connections, data chunks, vectors, function info) without
//! ever redefining their layout.

pub mod constants;
pub mod connection;
pub mod data_chunk;
pub mod error;
pub mod extension;
pub mod logical_type;
pub mod memory;
pub mod scalar_functions;
pub mod vector;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Raw `libduckdb-sys` bindings.
pub mod duckly {
    pub use libduckdb_sys::*;
}

pub use connection::{Connection, Database, FunctionRegistry};
pub use constants::LogicalTypeId;
pub use data_chunk::DataChunk;
pub use error::{Error, Result};
pub use extension::ExtensionAccess;
pub use logical_type::LogicalType;
pub use memory::{DuckDbAllocator, HostAllocator, HostBuffer};
pub use scalar_functions::{execute_scalar, FunctionInfo, ReportError, ScalarFunctionDef, UnaryStringFunction, VScalar};
pub use vector::{StringInput, StringOutput, ValidityMask, Vector};
