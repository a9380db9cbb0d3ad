pub mod quack_function;
pub mod scalar_function_builder;
