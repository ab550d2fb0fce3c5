//! Default product visibility filters and store scoping.
//!
//! Every product search starts with two fixed groups: enabled products only,
//! and visibility in catalog, search, or both. On releases that pass
//! [`supports_store_filter`] a third group restricts results to one store.
//! Caller groups are numbered right after these.

use magebridge_core::{supports_store_filter, MagentoVersion};

use crate::criteria::{
    ConditionType, FilterCondition, FilterGroup, FilterValue, Pagination, PartialSearchCriteria,
};
use crate::query::{build_search_params, encode_filter_groups, QueryParams};

/// `status` value for enabled products.
pub const STATUS_ENABLED: i64 = 1;

/// `visibility` codes: catalog, search, catalog + search. Code 1 is "not
/// visible individually".
pub const VISIBLE_VISIBILITIES: [i64; 3] = [2, 3, 4];

/// Which store to scope to and which release the server runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StoreScope {
    pub store_id: u32,
    pub version: MagentoVersion,
}

impl StoreScope {
    #[must_use]
    pub fn new(store_id: u32, version: MagentoVersion) -> Self {
        Self { store_id, version }
    }

    #[must_use]
    pub fn supports_store_filter(self) -> bool {
        supports_store_filter(self.version)
    }
}

#[must_use]
pub fn store_filter_group(store_id: u32) -> FilterGroup {
    FilterGroup::single(FilterCondition::eq("store", store_id))
}

/// The groups that precede every caller filter on a product search.
#[must_use]
pub fn default_filter_groups(scope: StoreScope) -> Vec<FilterGroup> {
    let mut groups = vec![
        FilterGroup::single(FilterCondition::eq("status", STATUS_ENABLED)),
        FilterGroup::single(FilterCondition::new(
            "visibility",
            FilterValue::list(VISIBLE_VISIBILITIES),
            ConditionType::In,
        )),
    ];
    if scope.supports_store_filter() {
        groups.push(store_filter_group(scope.store_id));
    }
    groups
}

/// Store filter for endpoints that take nothing else, or `None` on releases
/// older than 2.2.
#[must_use]
pub fn store_scope_params(scope: StoreScope) -> Option<QueryParams> {
    scope
        .supports_store_filter()
        .then(|| encode_filter_groups(&[store_filter_group(scope.store_id)], 0))
}

/// Appends the store filter to `path` when the release supports it.
#[must_use]
pub fn scoped_path(path: &str, scope: StoreScope) -> String {
    match store_scope_params(scope) {
        Some(params) => format!("{path}?{}", params.to_url_query()),
        None => path.to_owned(),
    }
}

/// Full parameter set for a product search: default groups first, then the
/// caller's groups, sorts, paging and optional attribute selection.
#[must_use]
pub fn product_search_params(
    scope: StoreScope,
    pagination: Pagination,
    filters: &PartialSearchCriteria,
    additional_attributes: Option<&[String]>,
) -> QueryParams {
    let defaults = default_filter_groups(scope);
    let mut params = encode_filter_groups(&defaults, 0);
    params.extend(build_search_params(
        filters,
        pagination,
        defaults.len(),
        additional_attributes,
    ));
    params
}
