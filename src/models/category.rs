//! Category vocabulary
//!
//! Categories are free-text labels in the sheet. The fixed vocabulary below
//! seeds the budget grid and is what the classification service is asked to
//! choose from.

/// The closed set of labels offered to the classification service
pub const DEFAULT_CATEGORIES: [&str; 17] = [
    "Food",
    "Transportation",
    "Utilities",
    "Health/medical",
    "Home",
    "EMI",
    "Personal",
    "Gifts",
    "Pets",
    "Outside food/party etc.",
    "Credit card bill",
    "Parents money",
    "Raysn's education etc.",
    "Kauser for monthly exp",
    "Kauser Business",
    "Farmhouse",
    "Other",
];

/// Whether a label is one of the default categories (exact match)
pub fn is_known_category(label: &str) -> bool {
    DEFAULT_CATEGORIES.contains(&label)
}

/// Sorted union of the default vocabulary and any extra labels seen in data
pub fn merged_categories<'a, I>(extra: I) -> Vec<String>
where
    I: IntoIterator<Item = &'a str>,
{
    let mut all: Vec<String> = DEFAULT_CATEGORIES.iter().map(|c| c.to_string()).collect();
    for label in extra {
        let label = label.trim();
        if !label.is_empty() && !all.iter().any(|c| c == label) {
            all.push(label.to_string());
        }
    }
    all.sort();
    all
}
