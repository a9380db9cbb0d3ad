//! In-memory stand-ins for the host, for exercising kernels and registration
//! logic without loading into DuckDB.

use std::cell::{Cell, RefCell};
use std::collections::HashMap;

use crate::connection::FunctionRegistry;
use crate::error::{Error, Result};
use crate::memory::HostAllocator;
use crate::scalar_functions::{ReportError, ScalarFunctionDef};
use crate::vector::{StringInput, StringOutput};

/// Heap-backed allocator with failure injection and leak accounting.
#[derive(Debug, Default)]
pub struct MockAllocator {
    fail_at: Option<usize>,
    allocations: Cell<usize>,
    live: RefCell<HashMap<usize, usize>>,
}

impl MockAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fails the `nth` (zero-based) allocation request.
    pub fn failing_at(nth: usize) -> Self {
        Self {
            fail_at: Some(nth),
            ..Self::default()
        }
    }

    /// Successful allocations so far.
    pub fn allocations(&self) -> usize {
        self.allocations.get()
    }

    /// Buffers allocated but not yet freed.
    pub fn outstanding(&self) -> usize {
        self.live.borrow().len()
    }
}

impl HostAllocator for MockAllocator {
    fn allocate(&self, size: usize) -> *mut u8 {
        let request = self.allocations.get();
        if self.fail_at == Some(request) {
            return std::ptr::null_mut();
        }
        self.allocations.set(request + 1);
        let buffer = vec![0u8; size.max(1)].into_boxed_slice();
        let len = buffer.len();
        let ptr = Box::into_raw(buffer).cast::<u8>();
        self.live.borrow_mut().insert(ptr as usize, len);
        ptr
    }

    unsafe fn free(&self, ptr: *mut u8) {
        let len = self
            .live
            .borrow_mut()
            .remove(&(ptr as usize))
            .expect("free of a buffer this allocator does not own");
        drop(Box::from_raw(std::ptr::slice_from_raw_parts_mut(ptr, len)));
    }
}

/// A VARCHAR input column.
#[derive(Debug, Clone, Default)]
pub struct MockStrings {
    rows: Vec<Option<Vec<u8>>>,
}

impl MockStrings {
    pub fn new<S: AsRef<[u8]>>(rows: Vec<Option<S>>) -> Self {
        Self {
            rows: rows
                .into_iter()
                .map(|row| row.map(|value| value.as_ref().to_vec()))
                .collect(),
        }
    }
}

impl StringInput for MockStrings {
    fn len(&self) -> usize {
        self.rows.len()
    }

    fn value(&self, row: usize) -> Option<&[u8]> {
        self.rows[row].as_deref()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutputCell {
    Unwritten,
    Null,
    Value(Vec<u8>),
}

/// A VARCHAR result vector that records what was written.
#[derive(Debug, Clone)]
pub struct MockOutput {
    cells: Vec<OutputCell>,
}

impl MockOutput {
    pub fn new(len: usize) -> Self {
        Self {
            cells: vec![OutputCell::Unwritten; len],
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    pub fn cell(&self, row: usize) -> &OutputCell {
        &self.cells[row]
    }

    pub fn cells(&self) -> &[OutputCell] {
        &self.cells
    }
}

impl StringOutput for MockOutput {
    fn set_null(&mut self, row: usize) {
        self.cells[row] = OutputCell::Null;
    }

    fn assign(&mut self, row: usize, bytes: &[u8]) {
        self.cells[row] = OutputCell::Value(bytes.to_vec());
    }
}

/// Collects every reported error message.
#[derive(Debug, Default)]
pub struct MockReporter {
    errors: RefCell<Vec<String>>,
}

impl MockReporter {
    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }
}

impl ReportError for MockReporter {
    fn set_error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }
}

/// A per-connection function catalog.
#[derive(Debug, Default)]
pub struct MockRegistry {
    reject: bool,
    functions: RefCell<Vec<ScalarFunctionDef>>,
}

impl MockRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// A catalog that refuses every descriptor.
    pub fn rejecting() -> Self {
        Self {
            reject: true,
            ..Self::default()
        }
    }

    pub fn functions(&self) -> Vec<ScalarFunctionDef> {
        self.functions.borrow().clone()
    }

    pub fn get(&self, name: &str) -> Option<ScalarFunctionDef> {
        self.functions.borrow().iter().find(|def| def.name() == name).cloned()
    }
}

impl FunctionRegistry for MockRegistry {
    fn register_scalar_function(&self, def: &ScalarFunctionDef) -> Result<()> {
        if self.reject {
            return Err(Error::Registration {
                name: def.name().to_string(),
            });
        }
        self.functions.borrow_mut().push(def.clone());
        Ok(())
    }
}
