use std::ffi::CString;

use tracing::{trace, warn};

use crate::constants::LogicalTypeId;
use crate::data_chunk::DataChunk;
use crate::duckly::{
    duckdb_create_scalar_function, duckdb_data_chunk, duckdb_destroy_scalar_function,
    duckdb_function_info, duckdb_scalar_function, duckdb_scalar_function_add_parameter,
    duckdb_scalar_function_set_error, duckdb_scalar_function_set_function,
    duckdb_scalar_function_set_name, duckdb_scalar_function_set_return_type,
    duckdb_scalar_function_t, duckdb_vector,
};
use crate::error::Result;
use crate::logical_type::LogicalType;
use crate::memory::{DuckDbAllocator, HostAllocator, HostBuffer};
use crate::vector::{StringInput, StringOutput, VarcharColumn, VarcharVectorWriter};

/// A row-batch transform over one VARCHAR column.
///
/// Implementations must be reentrant: the host may run several batches
/// concurrently, so all state stays on the stack of a single `invoke`.
pub trait VScalar {
    fn invoke<A, I, O>(allocator: &A, input: &I, output: &mut O) -> Result<()>
    where
        A: HostAllocator + ?Sized,
        I: StringInput + ?Sized,
        O: StringOutput + ?Sized;
}

/// A per-value VARCHAR -> VARCHAR function.
///
/// The blanket [`VScalar`] impl owns the row loop: NULL rows stay NULL, and
/// each result is written into a host buffer of exactly `result_len` bytes,
/// freed once the host has copied it.
pub trait UnaryStringFunction {
    const NAME: &'static str;

    /// Size of the result for `input`.
    fn result_len(input: &[u8]) -> usize;

    /// Fills `result`, which is exactly `result_len(input)` bytes.
    fn operation(input: &[u8], result: &mut [u8]);
}

impl<F: UnaryStringFunction> VScalar for F {
    fn invoke<A, I, O>(allocator: &A, input: &I, output: &mut O) -> Result<()>
    where
        A: HostAllocator + ?Sized,
        I: StringInput + ?Sized,
        O: StringOutput + ?Sized,
    {
        for row in 0..input.len() {
            let Some(value) = input.value(row) else {
                output.set_null(row);
                continue;
            };

            let len = F::result_len(value);
            if len == 0 {
                output.assign(row, &[]);
                continue;
            }

            let mut result = HostBuffer::allocate(allocator, len)?;
            F::operation(value, result.as_mut_slice());
            output.assign(row, result.as_slice());
        }
        Ok(())
    }
}

/// Sink for errors the host should surface to the user.
pub trait ReportError {
    fn set_error(&self, message: &str);
}

/// Converts an error message for the host, dropping interior NUL bytes.
pub(crate) fn error_cstring(message: &str) -> CString {
    CString::new(message.replace('\0', "")).unwrap_or_default()
}

/// The per-call function info handle.
pub struct FunctionInfo(duckdb_function_info);

impl From<duckdb_function_info> for FunctionInfo {
    fn from(ptr: duckdb_function_info) -> Self {
        Self(ptr)
    }
}

impl ReportError for FunctionInfo {
    fn set_error(&self, message: &str) {
        let message = error_cstring(message);
        unsafe { duckdb_scalar_function_set_error(self.0, message.as_ptr()) };
    }
}

/// Runs one batch through `S`, reporting a failure through `reporter`.
///
/// Returns `false` when the batch was aborted. Rows written before the
/// failure are left in place.
pub fn execute_scalar<S, R, A, I, O>(reporter: &R, allocator: &A, input: &I, output: &mut O) -> bool
where
    S: VScalar,
    R: ReportError + ?Sized,
    A: HostAllocator + ?Sized,
    I: StringInput + ?Sized,
    O: StringOutput + ?Sized,
{
    trace!(rows = input.len(), "invoking scalar function");
    match S::invoke(allocator, input, output) {
        Ok(()) => true,
        Err(e) => {
            warn!(error = %e, "scalar function aborted batch");
            reporter.set_error(&e.to_string());
            false
        }
    }
}

/// The C callback the host calls once per batch.
///
/// # Safety
/// Must only be called by the host with valid handles for a function
/// registered through [`ScalarFunctionDef::set_function`].
pub unsafe extern "C" fn scalar_trampoline<S: VScalar>(
    info: duckdb_function_info,
    input: duckdb_data_chunk,
    output: duckdb_vector,
) {
    let info = FunctionInfo::from(info);
    let chunk = DataChunk::from(input);
    if chunk.is_empty() {
        return;
    }
    let input = VarcharColumn::new(&chunk, 0);
    let mut output = VarcharVectorWriter::new(output, chunk.len());
    execute_scalar::<S, _, _, _, _>(&info, &DuckDbAllocator, &input, &mut output);
}

/// Function descriptor handed to [`crate::FunctionRegistry::register_scalar_function`].
#[derive(Debug, Clone)]
pub struct ScalarFunctionDef {
    name: String,
    parameters: Vec<LogicalTypeId>,
    return_type: LogicalTypeId,
    function: duckdb_scalar_function_t,
}

impl ScalarFunctionDef {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            parameters: Vec::new(),
            return_type: LogicalTypeId::Varchar,
            function: None,
        }
    }

    /// `VARCHAR -> VARCHAR` descriptor for `F`, named `F::NAME`.
    pub fn unary<F: UnaryStringFunction>() -> Self {
        let mut def = Self::new(F::NAME);
        def.add_parameter(LogicalTypeId::Varchar);
        def.set_return_type(LogicalTypeId::Varchar);
        def.set_function::<F>();
        def
    }

    pub fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    pub fn add_parameter(&mut self, logical_type: LogicalTypeId) {
        self.parameters.push(logical_type);
    }

    pub fn set_return_type(&mut self, logical_type: LogicalTypeId) {
        self.return_type = logical_type;
    }

    /// Uses `S` as the per-batch callback.
    pub fn set_function<S: VScalar>(&mut self) {
        self.function = Some(scalar_trampoline::<S>);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parameters(&self) -> &[LogicalTypeId] {
        &self.parameters
    }

    pub fn return_type(&self) -> LogicalTypeId {
        self.return_type
    }

    pub fn has_function(&self) -> bool {
        self.function.is_some()
    }
}

/// Host-side scalar function descriptor, destroyed on drop.
pub(crate) struct ScalarFunction {
    pub(crate) ptr: duckdb_scalar_function,
}

impl ScalarFunction {
    pub(crate) fn from_def(def: &ScalarFunctionDef) -> Result<Self> {
        let name = CString::new(def.name())?;
        let function = Self {
            ptr: unsafe { duckdb_create_scalar_function() },
        };
        unsafe {
            duckdb_scalar_function_set_name(function.ptr, name.as_ptr());
            for parameter in def.parameters() {
                let logical_type = LogicalType::new(*parameter);
                duckdb_scalar_function_add_parameter(function.ptr, logical_type.typ);
            }
            let return_type = LogicalType::new(def.return_type());
            duckdb_scalar_function_set_return_type(function.ptr, return_type.typ);
            duckdb_scalar_function_set_function(function.ptr, def.function);
        }
        Ok(function)
    }
}

impl Drop for ScalarFunction {
    fn drop(&mut self) {
        unsafe { duckdb_destroy_scalar_function(&mut self.ptr) };
    }
}
