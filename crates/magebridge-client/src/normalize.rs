//! Reshaping of raw Magento payloads into the forms callers consume.
//!
//! Products get their `custom_attributes` promoted to top-level fields,
//! category trees lose their inactive branches, and attribute options are
//! filtered against a set of candidate values.

use std::collections::HashSet;

use serde_json::Value;

use crate::criteria::ScalarValue;
use crate::types::{AttributeOption, CategoryNode, Product, ProductAttribute};

/// Copies every `custom_attributes` entry onto the product as a top-level
/// field named by its `attribute_code`.
///
/// Entries are applied in order, so a code listed twice ends up with its
/// later value. A promoted code overwrites a top-level member of the same
/// name. Entries without a code are skipped. The `custom_attributes` list
/// itself is kept.
#[must_use]
pub fn normalize_product(mut product: Product) -> Product {
    for attr in &product.custom_attributes {
        let Some(code) = attr.attribute_code.as_deref() else {
            tracing::debug!(sku = ?product.sku(), "custom attribute without a code left unpromoted");
            continue;
        };
        if code == "custom_attributes" {
            continue;
        }
        product.fields.insert(code.to_owned(), attr.value.clone());
    }
    product
}

/// Decodes and normalizes a JSON array of products.
///
/// Entries that do not decode as a product are skipped with a warning; they
/// never fail the whole list.
#[must_use]
pub fn normalize_products(items: Vec<Value>) -> Vec<Product> {
    items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| match serde_json::from_value::<Product>(item) {
            Ok(product) => Some(normalize_product(product)),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping malformed product entry");
                None
            }
        })
        .collect()
}

/// Normalizes the `items` array of a product search response.
///
/// A payload without `items`, with `items: null`, or with a non-array
/// `items` yields an empty list.
#[must_use]
pub fn normalize_product_list(payload: Value) -> Vec<Product> {
    match payload {
        Value::Object(mut map) => match map.remove("items") {
            Some(Value::Array(items)) => normalize_products(items),
            _ => Vec::new(),
        },
        _ => Vec::new(),
    }
}

/// Returns a copy of `root` with every inactive descendant removed, together
/// with its whole subtree.
///
/// The root itself is kept whatever its flag says. Surviving siblings keep
/// their relative order.
#[must_use]
pub fn normalize_category_tree(root: &CategoryNode) -> CategoryNode {
    let children_data = root
        .children_data
        .iter()
        .filter(|child| child.is_active())
        .map(normalize_category_tree)
        .collect();
    CategoryNode {
        children_data,
        ..root.clone_without_children()
    }
}

impl CategoryNode {
    fn clone_without_children(&self) -> CategoryNode {
        CategoryNode {
            id: self.id,
            parent_id: self.parent_id,
            name: self.name.clone(),
            is_active: self.is_active,
            position: self.position,
            level: self.level,
            product_count: self.product_count,
            children_data: Vec::new(),
            extra: self.extra.clone(),
        }
    }
}

/// String form used to compare option values with candidates.
fn comparable(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Options of `attribute` whose value matches one of `candidates`.
///
/// Both sides are compared as strings, so `2` matches `"2"`. The result
/// follows the attribute's option order. An empty `candidates` slice
/// returns an empty list straight away.
#[must_use]
pub fn match_options(attribute: &ProductAttribute, candidates: &[ScalarValue]) -> Vec<AttributeOption> {
    if candidates.is_empty() {
        return Vec::new();
    }
    let wanted: HashSet<String> = candidates.iter().map(ToString::to_string).collect();
    attribute
        .options
        .iter()
        .filter(|option| wanted.contains(&comparable(&option.value)))
        .cloned()
        .collect()
}

#[cfg(test)]
#[path = "normalize_test.rs"]
mod tests;
