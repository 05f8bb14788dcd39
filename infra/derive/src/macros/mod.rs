pub mod error;
pub mod migration;
