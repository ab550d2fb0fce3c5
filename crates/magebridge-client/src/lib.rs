pub mod client;
pub mod criteria;
pub mod error;
pub mod normalize;
pub mod query;
mod rate_limit;
pub mod transport;
pub mod types;
pub mod visibility;

pub use client::MagentoClient;
pub use criteria::{
    ConditionType, FilterCondition, FilterGroup, FilterValue, Pagination, PartialSearchCriteria,
    ScalarValue, SearchCriteria, SearchCriteriaBuilder, SortDirection, SortOrder,
};
pub use error::MagentoError;
pub use normalize::{match_options, normalize_category_tree, normalize_product, normalize_product_list};
pub use query::{build_search_params, QueryParams};
pub use transport::{HttpTransport, Transport, TransportResponse};
pub use types::{
    AttributeOption, CategoryNode, CustomAttribute, ExtensionProductPage, Product, ProductAttribute,
    ProductPage, StockItem, StoreConfig, StoreGroup,
};
pub use visibility::{default_filter_groups, StoreScope};
