//! Magento REST response types.
//!
//! Magento's payloads vary between releases and installed extensions, so
//! each type names the fields this crate reads as `Option`s and keeps every
//! other member in a flattened `extra` map. Nothing is dropped on the way
//! through: a decoded value serializes back to the same members it arrived
//! with.
//!
//! ### `custom_attributes`
//! EAV attributes arrive detached as `[{ "attribute_code": ..., "value": ... }]`
//! rather than as top-level members. [`crate::normalize::normalize_product`]
//! copies them up.
//!
//! ### `is_active` on categories
//! Usually a JSON boolean. A missing flag is treated as inactive.
//!
//! ### Option values
//! Option `value`s are strings on most releases (`"49"`) but some
//! extensions send integers. They are kept as raw JSON and compared as
//! strings.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Deserializes `null` (or a missing member, with `#[serde(default)]`) as
/// `T::default()`.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Reads a string member, treating `null`, a missing member or any other
/// JSON type as `None`.
fn string_or_none<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) => Some(s),
        _ => None,
    })
}

/// One `{attribute_code, value}` pair from a product's `custom_attributes`.
///
/// An entry without a usable string code still decodes, so one bad entry
/// never costs the whole product; it is simply not promoted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CustomAttribute {
    #[serde(
        default,
        deserialize_with = "string_or_none",
        skip_serializing_if = "Option::is_none"
    )]
    pub attribute_code: Option<String>,
    #[serde(default)]
    pub value: Value,
}

/// A catalog product.
///
/// Apart from `custom_attributes`, every member lives in `fields` exactly as
/// Magento sent it; the accessors read the common ones.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Product {
    #[serde(default, deserialize_with = "null_as_default")]
    pub custom_attributes: Vec<CustomAttribute>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

impl Product {
    /// Any top-level member, including promoted custom attributes.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    #[must_use]
    pub fn id(&self) -> Option<i64> {
        self.get("id").and_then(Value::as_i64)
    }

    #[must_use]
    pub fn sku(&self) -> Option<&str> {
        self.get("sku").and_then(Value::as_str)
    }

    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.get("name").and_then(Value::as_str)
    }

    #[must_use]
    pub fn type_id(&self) -> Option<&str> {
        self.get("type_id").and_then(Value::as_str)
    }

    #[must_use]
    pub fn price(&self) -> Option<f64> {
        self.get("price").and_then(Value::as_f64)
    }

    /// Looks a code up in `custom_attributes`; the last occurrence wins.
    #[must_use]
    pub fn custom_attribute(&self, code: &str) -> Option<&Value> {
        self.custom_attributes
            .iter()
            .rev()
            .find(|attr| attr.attribute_code.as_deref() == Some(code))
            .map(|attr| &attr.value)
    }
}

/// A node of the category tree from `GET /V1/categories`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CategoryNode {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub parent_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub is_active: Option<bool>,
    #[serde(default)]
    pub position: Option<i64>,
    #[serde(default)]
    pub level: Option<i64>,
    #[serde(default)]
    pub product_count: Option<i64>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub children_data: Vec<CategoryNode>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CategoryNode {
    /// `true` only for an explicit `is_active: true`.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.is_active == Some(true)
    }

    /// Number of nodes in this subtree, including `self`.
    #[must_use]
    pub fn subtree_len(&self) -> usize {
        1 + self
            .children_data
            .iter()
            .map(CategoryNode::subtree_len)
            .sum::<usize>()
    }
}

/// One selectable option of a `select`/`multiselect` attribute.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeOption {
    #[serde(default, deserialize_with = "null_as_default")]
    pub label: String,
    #[serde(default)]
    pub value: Value,
}

/// A product attribute definition from `GET /V1/products/attributes/{id}`
/// or an attribute-set listing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductAttribute {
    #[serde(default)]
    pub attribute_id: Option<i64>,
    #[serde(default)]
    pub attribute_code: Option<String>,
    #[serde(default)]
    pub frontend_input: Option<String>,
    #[serde(default)]
    pub default_frontend_label: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub options: Vec<AttributeOption>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Stock record nested under `stock_item` in `GET /V1/stockStatuses/{sku}`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StockItem {
    #[serde(default)]
    pub item_id: Option<i64>,
    #[serde(default)]
    pub product_id: Option<i64>,
    #[serde(default)]
    pub stock_id: Option<i64>,
    #[serde(default)]
    pub qty: Option<f64>,
    #[serde(default)]
    pub is_in_stock: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreGroup {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub website_id: Option<i64>,
    #[serde(default)]
    pub root_category_id: Option<i64>,
    #[serde(default)]
    pub default_store_id: Option<i64>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StoreConfig {
    #[serde(default)]
    pub id: Option<i64>,
    #[serde(default)]
    pub code: Option<String>,
    #[serde(default)]
    pub website_id: Option<i64>,
    #[serde(default)]
    pub locale: Option<String>,
    #[serde(default)]
    pub base_currency_code: Option<String>,
    #[serde(default)]
    pub default_display_currency_code: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub secure_base_url: Option<String>,
    #[serde(default)]
    pub base_media_url: Option<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One page of `GET /V1/products`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProductPage {
    pub products: Vec<Product>,
    /// `total_count` from the response, when Magento sent one.
    pub total_count: Option<u64>,
    /// The serialized `searchCriteria` that produced this page.
    pub query: String,
}

/// One page of the `dcapi` extension endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExtensionProductPage {
    pub products: Vec<Product>,
    pub query: String,
}
