pub mod error;
pub mod logger;
pub mod memory;
pub mod monitor;
pub mod validation;
