use crate::duckly::{duckdb_type, DUCKDB_TYPE_DUCKDB_TYPE_VARCHAR};

/// Type tags accepted in function signatures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalTypeId {
    Varchar,
}

impl From<LogicalTypeId> for duckdb_type {
    fn from(id: LogicalTypeId) -> Self {
        match id {
            LogicalTypeId::Varchar => DUCKDB_TYPE_DUCKDB_TYPE_VARCHAR,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_varchar_maps_to_host_tag() {
        assert_eq!(duckdb_type::from(LogicalTypeId::Varchar), DUCKDB_TYPE_DUCKDB_TYPE_VARCHAR);
    }
}
