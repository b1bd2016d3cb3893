use crate::domain::category;
use crate::dto::categories::CategoryDto;

/// Registry entries in display order.
pub fn list_categories() -> Vec<CategoryDto> {
    category::all().iter().map(CategoryDto::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lists_every_registry_entry() {
        let categories = list_categories();
        assert_eq!(categories.len(), category::all().len());
        assert_eq!(categories[0].code, "food_market");
    }
}
