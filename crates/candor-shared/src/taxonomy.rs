//! The closed feedback taxonomy.
//!
//! Categories and their subcategories are fixed and known to the
//! presentation layer; the store does not enforce them.

/// Top-level feedback categories, in display order.
pub const CATEGORIES: [&str; 4] = ["Department", "Services", "Events", "Others"];

/// Subcategories belonging to a category.  Unknown categories map to an
/// empty slice.
pub fn subcategories(category: &str) -> &'static [&'static str] {
    match category {
        "Department" => &["Development", "Administration", "HR"],
        "Services" => &[
            "IT Support Services",
            "Workplace Tools & Software",
            "Transportation",
        ],
        "Events" => &["Hackathons", "Tech Talks", "Employee Recognition Events"],
        "Others" => &["Other"],
        _ => &[],
    }
}

/// Returns `true` if `subcategory` belongs to `category`.
pub fn is_known_pair(category: &str, subcategory: &str) -> bool {
    subcategories(category).contains(&subcategory)
}
