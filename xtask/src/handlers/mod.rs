pub mod codegen;
pub mod testing;
