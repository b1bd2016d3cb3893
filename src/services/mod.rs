pub mod categories;
pub mod errors;
pub mod receipts;
pub mod recognition;

pub use errors::{ServiceError, ServiceResult};
