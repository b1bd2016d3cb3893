pub mod category;
pub mod receipt;
pub mod recognition;
pub mod types;
