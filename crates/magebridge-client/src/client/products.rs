use serde_json::Value;

use super::{encode_segment, MagentoClient};
use crate::criteria::{Pagination, PartialSearchCriteria};
use crate::error::MagentoError;
use crate::normalize::{normalize_product, normalize_product_list, normalize_products};
use crate::transport::Transport;
use crate::types::{ExtensionProductPage, Product, ProductPage, StockItem};
use crate::visibility::{product_search_params, StoreScope};

impl<T: Transport> MagentoClient<T> {
    /// Searches enabled, visible products.
    ///
    /// The status and visibility groups (plus the store group on 2.2+) come
    /// first; `filters` are appended after them.
    ///
    /// # Errors
    ///
    /// [`MagentoError::Api`] on a non-2xx status, or any transport error.
    pub async fn get_products(
        &self,
        pagination: Pagination,
        scope: StoreScope,
        filters: &PartialSearchCriteria,
    ) -> Result<ProductPage, MagentoError> {
        let params = product_search_params(scope, pagination, filters, None);
        let query = params.serialize();
        tracing::debug!(%query, "product search");

        let body = self
            .request(&format!("/V1/products?{}", params.to_url_query()))
            .await?
            .unwrap_or(Value::Null);
        let total_count = body.get("total_count").and_then(Value::as_u64);
        Ok(ProductPage {
            products: normalize_product_list(body),
            total_count,
            query,
        })
    }

    /// Searches through the `dcapi` catalog extension, which answers with a
    /// bare product array and honours `additional_attributes`.
    ///
    /// # Errors
    ///
    /// [`MagentoError::Api`] on a non-2xx status, [`MagentoError::Deserialize`]
    /// if the body is neither an array nor empty, or any transport error.
    pub async fn get_products_through_extension(
        &self,
        pagination: Pagination,
        scope: StoreScope,
        additional_attributes: &[String],
        filters: &PartialSearchCriteria,
    ) -> Result<ExtensionProductPage, MagentoError> {
        let params = product_search_params(scope, pagination, filters, Some(additional_attributes));
        let query = params.serialize();
        tracing::debug!(%query, "extension product search");

        let items: Vec<Value> = self
            .get_list(
                &format!("/V1/dcapi/products?{}", params.to_url_query()),
                "dcapi products",
            )
            .await?;
        Ok(ExtensionProductPage {
            products: normalize_products(items),
            query,
        })
    }

    /// Layered-navigation filters, optionally for one category. Returned as
    /// Magento sent them.
    ///
    /// # Errors
    ///
    /// [`MagentoError::Api`] on a non-2xx status, or any transport error.
    pub async fn get_product_filters(&self, category_id: Option<i64>) -> Result<Value, MagentoError> {
        let path = match category_id {
            Some(id) => format!("/V1/products/filters?cat={id}"),
            None => "/V1/products/filters".to_owned(),
        };
        Ok(self.request(&path).await?.unwrap_or(Value::Null))
    }

    /// # Errors
    ///
    /// [`MagentoError::Api`] on a non-2xx status (404 for an unknown SKU),
    /// [`MagentoError::EmptyBody`], [`MagentoError::Deserialize`], or any
    /// transport error.
    pub async fn get_product_by_sku(&self, sku: &str) -> Result<Product, MagentoError> {
        let path = format!("/V1/products/{}", encode_segment(sku));
        let product: Product = self.get_json(&path, &format!("product {sku}")).await?;
        Ok(normalize_product(product))
    }

    /// The `stock_item` member of the SKU's stock status.
    ///
    /// # Errors
    ///
    /// [`MagentoError::Api`] on a non-2xx status, [`MagentoError::EmptyBody`]
    /// when the body or its `stock_item` is missing,
    /// [`MagentoError::Deserialize`], or any transport error.
    pub async fn get_product_stock_by_sku(&self, sku: &str) -> Result<StockItem, MagentoError> {
        let path = format!("/V1/stockStatuses/{}", encode_segment(sku));
        let mut status: Value = self.get_json(&path, &format!("stock status {sku}")).await?;
        let item = status
            .get_mut("stock_item")
            .map(Value::take)
            .filter(|v| !v.is_null())
            .ok_or(MagentoError::EmptyBody { path })?;
        super::decode(item, &format!("stock item {sku}"))
    }
}
