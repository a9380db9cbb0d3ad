use std::ffi::NulError;

use thiserror::Error;

/// Errors raised while talking to the DuckDB host.
#[derive(Error, Debug)]
pub enum Error {
    /// The host allocator could not satisfy a request.
    #[error("Failed to allocate memory for result")]
    AllocationFailure { size: usize },

    /// The host rejected a function descriptor, e.g. on a name collision.
    #[error("scalar function '{name}' was rejected by the host")]
    Registration { name: String },

    #[error("Function name contains an interior NUL byte")]
    InvalidName(#[from] NulError),

    #[error("Failed to open a connection to the host database")]
    Connect,

    #[error("Extension access table is missing '{0}'")]
    MissingAccessFunction(&'static str),

    #[error("Failed to initialise the extension API: {0}")]
    ApiInit(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod test {
    use super::*;
    use std::ffi::CString;

    #[test]
    fn test_allocation_failure_message() {
        let err = Error::AllocationFailure { size: 18 };
        assert_eq!(err.to_string(), "Failed to allocate memory for result");
    }

    #[test]
    fn test_registration_message_names_function() {
        let err = Error::Registration { name: "quack".to_string() };
        assert_eq!(err.to_string(), "scalar function 'quack' was rejected by the host");
    }

    #[test]
    fn test_nul_error_converts() {
        let err: Error = CString::new("qu\0ack").unwrap_err().into();
        assert!(matches!(err, Error::InvalidName(_)));
    }
}
