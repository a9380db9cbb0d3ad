use crate::duckly::{duckdb_data_chunk, duckdb_data_chunk_get_size, duckdb_data_chunk_get_vector, idx_t};
use crate::vector::Vector;

/// A host-owned batch of rows. Never freed from this side.
pub struct DataChunk {
    ptr: duckdb_data_chunk,
}

impl From<duckdb_data_chunk> for DataChunk {
    fn from(ptr: duckdb_data_chunk) -> Self {
        Self { ptr }
    }
}

impl DataChunk {
    /// Number of rows in the chunk.
    pub fn len(&self) -> usize {
        unsafe { duckdb_data_chunk_get_size(self.ptr) as usize }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Retrieves the vector at the specified column index.
    pub fn get_vector<T>(&self, column_index: usize) -> Vector<T> {
        Vector::from(unsafe { duckdb_data_chunk_get_vector(self.ptr, column_index as idx_t) })
    }
}
