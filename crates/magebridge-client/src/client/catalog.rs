use serde_json::Value;

use super::{encode_segment, MagentoClient};
use crate::criteria::ScalarValue;
use crate::error::MagentoError;
use crate::normalize::{match_options, normalize_category_tree, normalize_products};
use crate::transport::Transport;
use crate::types::{AttributeOption, CategoryNode, Product, ProductAttribute};
use crate::visibility::{scoped_path, StoreScope};

impl<T: Transport> MagentoClient<T> {
    /// The category tree with every inactive branch removed.
    ///
    /// # Errors
    ///
    /// [`MagentoError::Api`] on a non-2xx status, [`MagentoError::EmptyBody`],
    /// [`MagentoError::Deserialize`], or any transport error.
    pub async fn get_categories(&self, scope: StoreScope) -> Result<CategoryNode, MagentoError> {
        let path = scoped_path("/V1/categories", scope);
        let tree: CategoryNode = self.get_json(&path, "category tree").await?;
        let pruned = normalize_category_tree(&tree);
        tracing::debug!(
            received = tree.subtree_len(),
            kept = pruned.subtree_len(),
            "pruned inactive categories"
        );
        Ok(pruned)
    }

    /// One category as stored, without pruning.
    ///
    /// # Errors
    ///
    /// [`MagentoError::Api`] on a non-2xx status, [`MagentoError::EmptyBody`],
    /// [`MagentoError::Deserialize`], or any transport error.
    pub async fn get_category_by_id(&self, id: i64) -> Result<CategoryNode, MagentoError> {
        self.get_json(&format!("/V1/categories/{id}"), &format!("category {id}"))
            .await
    }

    /// Options of attribute `attribute_id` whose value is one of `values`.
    ///
    /// An empty `values` returns an empty list without any request.
    ///
    /// # Errors
    ///
    /// [`MagentoError::Api`] on a non-2xx status, [`MagentoError::EmptyBody`],
    /// [`MagentoError::Deserialize`], or any transport error.
    pub async fn get_product_attribute_values(
        &self,
        attribute_id: &str,
        scope: StoreScope,
        values: &[ScalarValue],
    ) -> Result<Vec<AttributeOption>, MagentoError> {
        if values.is_empty() {
            return Ok(Vec::new());
        }
        let path = scoped_path(
            &format!("/V1/products/attributes/{}", encode_segment(attribute_id)),
            scope,
        );
        let attribute: ProductAttribute = self
            .get_json(&path, &format!("attribute {attribute_id}"))
            .await?;
        Ok(match_options(&attribute, values))
    }

    /// Child products of a configurable product, normalized.
    ///
    /// # Errors
    ///
    /// [`MagentoError::Api`] on a non-2xx status, [`MagentoError::Deserialize`]
    /// if the body is not an array, or any transport error.
    pub async fn get_configurable_products(
        &self,
        sku: &str,
        scope: StoreScope,
    ) -> Result<Vec<Product>, MagentoError> {
        let path = scoped_path(
            &format!("/V1/configurable-products/{}/children", encode_segment(sku)),
            scope,
        );
        let items: Vec<Value> = self
            .get_list(&path, &format!("children of {sku}"))
            .await?;
        Ok(normalize_products(items))
    }

    /// Attributes of an attribute set; empty when Magento returns no body.
    ///
    /// # Errors
    ///
    /// [`MagentoError::Api`] on a non-2xx status, [`MagentoError::Deserialize`]
    /// if the body is not an array, or any transport error.
    pub async fn get_attributes_by_attribute_set(
        &self,
        attribute_set_id: i64,
        scope: StoreScope,
    ) -> Result<Vec<ProductAttribute>, MagentoError> {
        let path = scoped_path(
            &format!("/V1/products/attribute-sets/{attribute_set_id}/attributes"),
            scope,
        );
        self.get_list(&path, &format!("attribute set {attribute_set_id}"))
            .await
    }
}
