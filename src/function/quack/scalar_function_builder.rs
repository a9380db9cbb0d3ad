use duckdb_extension_framework::ScalarFunctionDef;

use crate::config::ExtensionConfig;
use crate::function::quack::quack_function::QuackFunction;

pub fn build_scalar_function_def(config: &ExtensionConfig) -> ScalarFunctionDef {
    let mut scalar_function = ScalarFunctionDef::unary::<QuackFunction>();
    scalar_function.set_name(config.function_name);
    scalar_function
}
