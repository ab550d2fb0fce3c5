//! Command handlers. Each one performs a single client call and prints the
//! result as pretty JSON on stdout.

use magebridge_client::visibility::product_search_params;
use magebridge_client::{
    FilterGroup, MagentoClient, Pagination, PartialSearchCriteria, StoreScope, Transport,
};
use magebridge_core::{MagentoConfig, MagentoVersion, DEFAULT_MAGENTO_VERSION, DEFAULT_STORE_ID};
use serde::Serialize;

use crate::{Commands, SearchArgs};

/// Scope from configuration with command-line overrides applied.
pub(crate) fn scope_from(
    config: &MagentoConfig,
    store_id: Option<u32>,
    version: Option<MagentoVersion>,
) -> StoreScope {
    StoreScope::new(
        store_id.unwrap_or(config.store_id),
        version.unwrap_or(config.magento_version),
    )
}

/// Scope for commands that never talk to Magento: flags first, then the
/// environment if it loads, then the built-in defaults.
pub(crate) fn offline_scope(store_id: Option<u32>, version: Option<MagentoVersion>) -> StoreScope {
    match magebridge_core::load_config_from_env() {
        Ok(config) => scope_from(&config, store_id, version),
        Err(_) => StoreScope::new(
            store_id.unwrap_or(DEFAULT_STORE_ID),
            version.unwrap_or(DEFAULT_MAGENTO_VERSION),
        ),
    }
}

impl SearchArgs {
    pub(crate) fn pagination(&self) -> Pagination {
        Pagination::new(self.page, self.per_page)
    }

    /// Each `--filter` becomes its own group, so flags combine with AND.
    pub(crate) fn criteria(&self) -> PartialSearchCriteria {
        PartialSearchCriteria {
            filter_groups: self.filters.iter().cloned().map(FilterGroup::single).collect(),
            sort_orders: self.sorts.clone(),
        }
    }
}

pub(crate) fn print_criteria(
    scope: StoreScope,
    search: &SearchArgs,
    attributes: Option<&[String]>,
) -> anyhow::Result<()> {
    let params = product_search_params(scope, search.pagination(), &search.criteria(), attributes);
    println!("{params}");
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) async fn run<T: Transport>(
    client: &MagentoClient<T>,
    scope: StoreScope,
    command: Commands,
) -> anyhow::Result<()> {
    match command {
        Commands::Products { search, attributes } => {
            let pagination = search.pagination();
            let criteria = search.criteria();
            match attributes {
                Some(codes) => {
                    let page = client
                        .get_products_through_extension(pagination, scope, &codes, &criteria)
                        .await?;
                    tracing::info!(count = page.products.len(), "extension search complete");
                    print_json(&page)
                }
                None => {
                    let page = client.get_products(pagination, scope, &criteria).await?;
                    tracing::info!(
                        count = page.products.len(),
                        total = ?page.total_count,
                        "product search complete"
                    );
                    print_json(&page)
                }
            }
        }
        Commands::Product { sku } => print_json(&client.get_product_by_sku(&sku).await?),
        Commands::Stock { sku } => print_json(&client.get_product_stock_by_sku(&sku).await?),
        Commands::ProductFilters { category_id } => {
            print_json(&client.get_product_filters(category_id).await?)
        }
        Commands::Categories => print_json(&client.get_categories(scope).await?),
        Commands::Category { id } => print_json(&client.get_category_by_id(id).await?),
        Commands::AttributeValues {
            attribute_id,
            values,
        } => print_json(
            &client
                .get_product_attribute_values(&attribute_id, scope, &values)
                .await?,
        ),
        Commands::Children { sku } => {
            print_json(&client.get_configurable_products(&sku, scope).await?)
        }
        Commands::AttributeSet { id } => {
            print_json(&client.get_attributes_by_attribute_set(id, scope).await?)
        }
        Commands::StoreGroups => print_json(&client.get_store_groups().await?),
        Commands::StoreConfigs => print_json(&client.get_store_configs().await?),
        Commands::Criteria { search, attributes } => {
            print_criteria(scope, &search, attributes.as_deref())
        }
    }
}
