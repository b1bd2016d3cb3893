pub mod categories;
pub mod receipts;
