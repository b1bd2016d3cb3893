use serde::Serialize;

use crate::domain::category::CategoryEntry;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryDto {
    pub code: String,
    pub label: String,
}

impl From<&CategoryEntry> for CategoryDto {
    fn from(value: &CategoryEntry) -> Self {
        Self {
            code: value.code.to_string(),
            label: value.label.to_string(),
        }
    }
}
