//! Static spending-category registry.
//!
//! The registry is the single source of truth for display labels: stored
//! labels are never trusted and are re-derived from the code on every write
//! and read.

use serde::Serialize;

/// One registry row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CategoryEntry {
    pub code: &'static str,
    pub label: &'static str,
}

/// Label used for codes the registry does not know.
pub const UNSPECIFIED_LABEL: &str = "Unspecified";

/// Code assigned to legacy records whose category cannot be recovered.
pub const OTHER_CODE: &str = "other";

const CATEGORIES: &[CategoryEntry] = &[
    CategoryEntry {
        code: "food_market",
        label: "Food & Groceries",
    },
    CategoryEntry {
        code: "transport",
        label: "Transportation",
    },
    CategoryEntry {
        code: "bills",
        label: "Bills & Utilities",
    },
    CategoryEntry {
        code: "entertainment",
        label: "Entertainment",
    },
    CategoryEntry {
        code: "clothing",
        label: "Clothing",
    },
    CategoryEntry {
        code: "health",
        label: "Health",
    },
    CategoryEntry {
        code: OTHER_CODE,
        label: "Other",
    },
];

/// All registry entries in display order.
pub fn all() -> &'static [CategoryEntry] {
    CATEGORIES
}

/// Whether `code` is a registry code.
pub fn is_known(code: &str) -> bool {
    CATEGORIES.iter().any(|c| c.code == code)
}

/// Display label for `code`, [`UNSPECIFIED_LABEL`] when unknown.
pub fn label_of(code: &str) -> &'static str {
    CATEGORIES
        .iter()
        .find(|c| c.code == code)
        .map(|c| c.label)
        .unwrap_or(UNSPECIFIED_LABEL)
}

/// Reverse lookup, only used to migrate records that stored a label instead
/// of a code.
pub fn code_of(label: &str) -> Option<&'static str> {
    let label = label.trim();
    CATEGORIES
        .iter()
        .find(|c| c.label.eq_ignore_ascii_case(label))
        .map(|c| c.code)
}

/// Normalizes a persisted `(code, label)` pair.
///
/// Empty codes are recovered from the stored label when it is a registry
/// label and fall back to [`OTHER_CODE`] otherwise. The returned label always
/// comes from the registry.
pub fn normalize_stored(code: &str, stored_label: &str) -> (String, &'static str) {
    let code = code.trim();
    let code = if code.is_empty() {
        code_of(stored_label).unwrap_or(OTHER_CODE)
    } else {
        code
    };
    (code.to_string(), label_of(code))
}
