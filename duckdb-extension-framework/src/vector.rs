use crate::data_chunk::DataChunk;
use crate::duckly::{
    duckdb_string_t, duckdb_string_t_data, duckdb_string_t_length, duckdb_validity_row_is_valid,
    duckdb_validity_set_row_invalid, duckdb_vector,
    duckdb_vector_assign_string_element_len, duckdb_vector_ensure_validity_writable,
    duckdb_vector_get_data, duckdb_vector_get_validity, idx_t,
};
use std::{marker::PhantomData, slice};

/// Vector of values of a specified PhysicalType.
///
/// The host owns the vector; this is only a view over the handle.
pub struct Vector<T>(duckdb_vector, PhantomData<T>);

impl<T> From<duckdb_vector> for Vector<T> {
    fn from(ptr: duckdb_vector) -> Self {
        Self(ptr, PhantomData {})
    }
}

impl<T> Vector<T> {
    /// Raw data pointer; the layout depends on the vector's type.
    pub fn get_data(&self) -> *mut T {
        unsafe { duckdb_vector_get_data(self.0).cast() }
    }

    /// Assigns a string element in the vector at the specified location.
    ///
    /// The host copies the bytes; the caller keeps ownership of `bytes`.
    pub fn assign_string_element_len(&self, index: idx_t, bytes: &[u8]) {
        unsafe {
            duckdb_vector_assign_string_element_len(self.0, index, bytes.as_ptr().cast(), bytes.len() as idx_t);
        }
    }

    /// Retrieves the validity mask of the vector.
    ///
    /// If all values are valid the underlying pointer MIGHT be NULL; the host's
    /// validity helpers treat that as "every row valid".
    pub fn get_validity(&self) -> ValidityMask {
        unsafe { ValidityMask(duckdb_vector_get_validity(self.0)) }
    }

    /// Allocates the validity mask so NULLs can be written; afterwards
    /// `get_validity` never yields a null pointer.
    pub fn ensure_validity_writable(&self) {
        unsafe { duckdb_vector_ensure_validity_writable(self.0) };
    }
}

pub struct ValidityMask(*mut u64);

impl ValidityMask {
    /// Whether `row` is non-NULL.
    pub fn row_is_valid(&self, row: idx_t) -> bool {
        unsafe { duckdb_validity_row_is_valid(self.0, row) }
    }

    /// Marks `row` NULL. Requires `ensure_validity_writable` first.
    pub fn set_row_invalid(&self, row: idx_t) {
        unsafe { duckdb_validity_set_row_invalid(self.0, row) }
    }
}

/// Read side of a single VARCHAR column in a batch.
pub trait StringInput {
    /// Number of rows in the batch.
    fn len(&self) -> usize;

    /// The raw bytes of `row`, or `None` when the row is NULL.
    fn value(&self, row: usize) -> Option<&[u8]>;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Write side of a VARCHAR result vector.
pub trait StringOutput {
    fn set_null(&mut self, row: usize);

    /// Stores a copy of `bytes` at `row`.
    fn assign(&mut self, row: usize, bytes: &[u8]);
}

/// A VARCHAR column of a host data chunk.
pub struct VarcharColumn<'a> {
    vector: Vector<duckdb_string_t>,
    validity: ValidityMask,
    len: usize,
    _chunk: PhantomData<&'a DataChunk>,
}

impl<'a> VarcharColumn<'a> {
    pub fn new(chunk: &'a DataChunk, column: usize) -> Self {
        let len = chunk.len();
        let vector = chunk.get_vector::<duckdb_string_t>(column);
        let validity = vector.get_validity();
        Self {
            vector,
            validity,
            len,
            _chunk: PhantomData,
        }
    }
}

impl StringInput for VarcharColumn<'_> {
    fn len(&self) -> usize {
        self.len
    }

    fn value(&self, row: usize) -> Option<&[u8]> {
        debug_assert!(row < self.len);
        if !self.validity.row_is_valid(row as idx_t) {
            return None;
        }
        unsafe {
            let cell = self.vector.get_data().add(row);
            let len = duckdb_string_t_length(*cell) as usize;
            if len == 0 {
                return Some(&[]);
            }
            let data = duckdb_string_t_data(cell);
            Some(slice::from_raw_parts(data.cast::<u8>(), len))
        }
    }
}

/// The host's result vector for a VARCHAR scalar function.
pub struct VarcharVectorWriter {
    vector: Vector<duckdb_string_t>,
    validity: ValidityMask,
}

impl VarcharVectorWriter {
    /// Wraps `output`, making its validity mask writable for `len` rows.
    pub fn new(output: duckdb_vector, len: usize) -> Self {
        let vector = Vector::from(output);
        vector.ensure_validity_writable();
        let validity = vector.get_validity();
        Self { vector, validity }
    }
}

impl StringOutput for VarcharVectorWriter {
    fn set_null(&mut self, row: usize) {
        self.validity.set_row_invalid(row as idx_t);
    }

    fn assign(&mut self, row: usize, bytes: &[u8]) {
        self.vector.assign_string_element_len(row as idx_t, bytes);
    }
}
