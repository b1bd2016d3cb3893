pub mod receipts;
pub mod recognition;
