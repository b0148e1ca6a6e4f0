//! Slug derivation for brand and category identifiers.

/// Lower-cases `name` and collapses every whitespace run into a single
/// hyphen. Leading and trailing whitespace is dropped.
///
/// ```
/// use pricewatch_catalog::domain::slug::slugify;
///
/// assert_eq!(slugify("Acme  Corp"), "acme-corp");
/// ```
#[must_use]
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}
