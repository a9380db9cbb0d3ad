use crate::connection::Database;
use crate::duckly::{duckdb_extension_access, duckdb_extension_info};
use crate::error::{Error, Result};
use crate::scalar_functions::{error_cstring, ReportError};

/// The load-info handle together with the host's access table.
pub struct ExtensionAccess {
    info: duckdb_extension_info,
    access: *const duckdb_extension_access,
}

impl ExtensionAccess {
    /// # Safety
    /// `access` must be the table the host passed to the entrypoint alongside `info`.
    pub unsafe fn new(info: duckdb_extension_info, access: *const duckdb_extension_access) -> Self {
        Self { info, access }
    }

    /// Fetches the host API table for `min_version`.
    ///
    /// `Ok(false)` means the host refused the version; it has already
    /// reported why, so callers should just fail the load.
    #[cfg(feature = "loadable-extension")]
    pub fn init_api(&self, min_version: &str) -> Result<bool> {
        unsafe { crate::duckly::duckdb_rs_extension_api_init(self.info, self.access, min_version) }
            .map_err(|e| Error::ApiInit(e.to_string()))
    }

    /// Statically linked builds call the host directly; nothing to initialise.
    #[cfg(not(feature = "loadable-extension"))]
    pub fn init_api(&self, _min_version: &str) -> Result<bool> {
        Ok(true)
    }

    /// The database the extension is being loaded into.
    pub fn database(&self) -> Result<Database> {
        let get_database = unsafe { (*self.access).get_database }
            .ok_or(Error::MissingAccessFunction("get_database"))?;
        let database = unsafe { get_database(self.info) };
        if database.is_null() {
            return Err(Error::Connect);
        }
        Ok(Database::from_raw(unsafe { *database }))
    }
}

impl ReportError for ExtensionAccess {
    fn set_error(&self, message: &str) {
        if let Some(set_error) = unsafe { (*self.access).set_error } {
            let message = error_cstring(message);
            unsafe { set_error(self.info, message.as_ptr()) };
        }
    }
}
