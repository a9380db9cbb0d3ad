//! The `quack` DuckDB extension: registers `quack(name VARCHAR) -> VARCHAR`.

pub mod config;
pub mod function;

use anyhow::Context;
use duckdb_extension_framework::duckly::{duckdb_connection, duckdb_extension_access, duckdb_extension_info};
use duckdb_extension_framework::{Connection, ExtensionAccess, FunctionRegistry, ReportError};
use tracing::{error, info};

use crate::config::ExtensionConfig;
use crate::function::quack::scalar_function_builder::build_scalar_function_def;

/// C API entrypoint DuckDB calls on `LOAD quack`.
///
/// Refuses to load into hosts whose extension API is older than
/// [`ExtensionConfig::min_duckdb_version`].
///
/// # Safety
/// Must only be called by the host with the handles it passes to extension entrypoints.
#[no_mangle]
pub unsafe extern "C" fn quack_init_c_api(
    info: duckdb_extension_info,
    access: *const duckdb_extension_access,
) -> bool {
    let extension = ExtensionAccess::new(info, access);
    let config = ExtensionConfig::default();

    match extension.init_api(config.min_duckdb_version) {
        Ok(true) => {}
        // the host has already explained the version mismatch
        Ok(false) => return false,
        Err(e) => {
            error!(error = %e, extension = config.extension_name, "failed to initialise extension API");
            extension.set_error(&e.to_string());
            return false;
        }
    }

    let connection = match extension.database().and_then(|database| database.connect()) {
        Ok(connection) => connection,
        Err(e) => {
            error!(error = %e, extension = config.extension_name, "failed to connect to host database");
            extension.set_error(&e.to_string());
            return false;
        }
    };

    quack_init(connection.as_raw(), info, access)
}

/// Registers the extension's functions on an existing connection.
///
/// Exported separately from [`quack_init_c_api`] so other entrypoint wrappers
/// can delegate to it.
///
/// # Safety
/// `connection` must be open, and `info`/`access` must be the handles of the
/// load in progress.
#[no_mangle]
pub unsafe extern "C" fn quack_init(
    connection: duckdb_connection,
    info: duckdb_extension_info,
    access: *const duckdb_extension_access,
) -> bool {
    let extension = ExtensionAccess::new(info, access);
    let connection = Connection::from(connection);
    load(&connection, &extension, &ExtensionConfig::default())
}

/// Registers every function of the extension against `registry`.
///
/// Failures are reported through `reporter` and turn into `false`; nothing is
/// left partially registered.
pub fn load<R, E>(registry: &R, reporter: &E, config: &ExtensionConfig) -> bool
where
    R: FunctionRegistry + ?Sized,
    E: ReportError + ?Sized,
{
    match register_functions(registry, config) {
        Ok(()) => {
            info!(extension = config.extension_name, function = config.function_name, "extension loaded");
            true
        }
        Err(e) => {
            let message = format!("{e:#}");
            error!(error = %message, extension = config.extension_name, "extension failed to load");
            reporter.set_error(&message);
            false
        }
    }
}

fn register_functions<R: FunctionRegistry + ?Sized>(registry: &R, config: &ExtensionConfig) -> anyhow::Result<()> {
    let quack_function = build_scalar_function_def(config);
    registry
        .register_scalar_function(&quack_function)
        .context("Failed to register scalar function")?;
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;
    use duckdb_extension_framework::testing::{MockRegistry, MockReporter};
    use duckdb_extension_framework::LogicalTypeId;

    #[test]
    fn test_load_registers_quack() {
        let registry = MockRegistry::new();
        let reporter = MockReporter::default();

        assert!(load(&registry, &reporter, &ExtensionConfig::default()));
        assert!(reporter.errors().is_empty());

        let quack = registry.get("quack").unwrap();
        assert_eq!(quack.parameters(), &[LogicalTypeId::Varchar]);
        assert_eq!(quack.return_type(), LogicalTypeId::Varchar);
        assert!(quack.has_function());
        assert_eq!(registry.functions().len(), 1);
    }

    #[test]
    fn test_load_on_independent_connections() {
        let first = MockRegistry::new();
        let second = MockRegistry::new();
        let reporter = MockReporter::default();

        assert!(load(&first, &reporter, &ExtensionConfig::default()));
        assert!(load(&second, &reporter, &ExtensionConfig::default()));
        assert!(first.get("quack").is_some());
        assert!(second.get("quack").is_some());
        assert!(reporter.errors().is_empty());
    }

    #[test]
    fn test_registry_rejecting_descriptor_fails_load() {
        let registry = MockRegistry::rejecting();
        let reporter = MockReporter::default();

        assert!(!load(&registry, &reporter, &ExtensionConfig::default()));
        assert_eq!(
            reporter.errors(),
            vec!["Failed to register scalar function: scalar function 'quack' was rejected by the host".to_string()]
        );
        assert!(registry.functions().is_empty());
    }
}
