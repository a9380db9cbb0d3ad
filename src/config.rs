use duckdb_extension_framework::UnaryStringFunction;

use crate::function::quack::quack_function::QuackFunction;

/// Compile-time settings of the extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExtensionConfig {
    pub extension_name: &'static str,
    pub function_name: &'static str,
    /// Oldest C extension API the host must offer; older hosts refuse the load.
    pub min_duckdb_version: &'static str,
}

impl ExtensionConfig {
    pub const DEFAULT: Self = Self {
        extension_name: "quack",
        function_name: QuackFunction::NAME,
        min_duckdb_version: "v1.2.0",
    };
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
