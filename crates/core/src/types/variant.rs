//! Product variant drafts for the seller product-creation flow.
//!
//! A seller picks a set of colors and a set of sizes; every (color, size)
//! pair becomes one variant draft carrying the same starting price and stock,
//! which the seller can then adjust before the product is submitted.

use serde::{Deserialize, Serialize};

use super::price::Price;

/// Values copied into every generated variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct VariantTemplate {
    pub price: Price,
    pub stock: u32,
}

/// A variant awaiting submission to the backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantDraft {
    pub color: Option<String>,
    pub size: Option<String>,
    pub price: Price,
    pub stock: u32,
}

impl VariantDraft {
    /// Human-readable title, e.g. `"Red / M"`.
    #[must_use]
    pub fn title(&self) -> String {
        match (&self.color, &self.size) {
            (Some(color), Some(size)) => format!("{color} / {size}"),
            (Some(only), None) | (None, Some(only)) => only.clone(),
            (None, None) => "Default".to_string(),
        }
    }
}

/// Generate one variant draft per (color, size) pair.
///
/// Inputs are trimmed; blanks and repeats (case-insensitive) are dropped
/// while keeping first-seen order. Drafts are color-major: all sizes of the
/// first color come first. When one list is empty the drafts range over the
/// other list alone; when both are empty no drafts are produced.
///
/// ```
/// use knitwear_core::{Price, VariantTemplate, generate_variants};
///
/// let drafts = generate_variants(
///     &["Red", "Blue"],
///     &["S", "M", "L"],
///     VariantTemplate { price: Price::from_minor_units(99_900), stock: 5 },
/// );
/// assert_eq!(drafts.len(), 6);
/// assert_eq!(drafts[0].title(), "Red / S");
/// ```
#[must_use]
pub fn generate_variants<C, S>(
    colors: &[C],
    sizes: &[S],
    template: VariantTemplate,
) -> Vec<VariantDraft>
where
    C: AsRef<str>,
    S: AsRef<str>,
{
    let colors = distinct_options(colors);
    let sizes = distinct_options(sizes);

    let draft = |color: Option<&String>, size: Option<&String>| VariantDraft {
        color: color.cloned(),
        size: size.cloned(),
        price: template.price,
        stock: template.stock,
    };

    match (colors.is_empty(), sizes.is_empty()) {
        (true, true) => Vec::new(),
        (false, true) => colors.iter().map(|c| draft(Some(c), None)).collect(),
        (true, false) => sizes.iter().map(|s| draft(None, Some(s))).collect(),
        (false, false) => colors
            .iter()
            .flat_map(|c| sizes.iter().map(move |s| (c, s)))
            .map(|(c, s)| draft(Some(c), Some(s)))
            .collect(),
    }
}

fn distinct_options<T: AsRef<str>>(values: &[T]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::with_capacity(values.len());
    for value in values {
        let value = value.as_ref().trim();
        if value.is_empty() || seen.iter().any(|s| s.eq_ignore_ascii_case(value)) {
            continue;
        }
        seen.push(value.to_owned());
    }
    seen
}
