use crate::constants::LogicalTypeId;
use crate::duckly::{duckdb_create_logical_type, duckdb_destroy_logical_type, duckdb_logical_type};

/// Owned host logical type, destroyed on drop.
#[derive(Debug)]
pub struct LogicalType {
    pub(crate) typ: duckdb_logical_type,
}

impl LogicalType {
    pub fn new(id: LogicalTypeId) -> Self {
        unsafe {
            Self {
                typ: duckdb_create_logical_type(id.into()),
            }
        }
    }
}

impl Drop for LogicalType {
    fn drop(&mut self) {
        if !self.typ.is_null() {
            unsafe { duckdb_destroy_logical_type(&mut self.typ) };
        }
    }
}
