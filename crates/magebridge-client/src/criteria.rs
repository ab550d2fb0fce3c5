//! Value model for Magento `searchCriteria` queries.
//!
//! A [`SearchCriteria`] is an AND of [`FilterGroup`]s, each group an OR of
//! [`FilterCondition`]s, plus sort orders and paging. Everything here is
//! plain data: nothing performs I/O and nothing is mutated after
//! [`SearchCriteriaBuilder::build`] hands it out.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A single string or numeric value as Magento accepts it in a filter.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ScalarValue {
    Int(i64),
    Float(f64),
    Text(String),
}

impl fmt::Display for ScalarValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScalarValue::Int(n) => write!(f, "{n}"),
            ScalarValue::Float(n) => write!(f, "{n}"),
            ScalarValue::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for ScalarValue {
    fn from(value: i64) -> Self {
        ScalarValue::Int(value)
    }
}

impl From<i32> for ScalarValue {
    fn from(value: i32) -> Self {
        ScalarValue::Int(i64::from(value))
    }
}

impl From<u32> for ScalarValue {
    fn from(value: u32) -> Self {
        ScalarValue::Int(i64::from(value))
    }
}

impl From<f64> for ScalarValue {
    fn from(value: f64) -> Self {
        ScalarValue::Float(value)
    }
}

impl From<&str> for ScalarValue {
    fn from(value: &str) -> Self {
        ScalarValue::Text(value.to_owned())
    }
}

impl From<String> for ScalarValue {
    fn from(value: String) -> Self {
        ScalarValue::Text(value)
    }
}

/// The right-hand side of a filter: one value, or a list for `in`/`nin`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FilterValue {
    List(Vec<ScalarValue>),
    Scalar(ScalarValue),
}

impl fmt::Display for FilterValue {
    /// Lists render comma-joined (`2,3,4`), never as repeated keys.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FilterValue::Scalar(value) => write!(f, "{value}"),
            FilterValue::List(values) => {
                for (idx, value) in values.iter().enumerate() {
                    if idx > 0 {
                        f.write_str(",")?;
                    }
                    write!(f, "{value}")?;
                }
                Ok(())
            }
        }
    }
}

macro_rules! scalar_filter_value {
    ($($ty:ty),*) => {
        $(
            impl From<$ty> for FilterValue {
                fn from(value: $ty) -> Self {
                    FilterValue::Scalar(value.into())
                }
            }
        )*
    };
}

scalar_filter_value!(i64, i32, u32, f64, &str, String);

impl From<ScalarValue> for FilterValue {
    fn from(value: ScalarValue) -> Self {
        FilterValue::Scalar(value)
    }
}

impl FilterValue {
    pub fn list<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<ScalarValue>,
    {
        FilterValue::List(values.into_iter().map(Into::into).collect())
    }
}

/// Magento comparison operators accepted in `condition_type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConditionType {
    Eq,
    Neq,
    Gt,
    Gteq,
    Lt,
    Lteq,
    Like,
    Nlike,
    In,
    Nin,
    Null,
    Notnull,
    Finset,
    Nfinset,
    From,
    To,
    Moreq,
}

impl ConditionType {
    const ALL: [ConditionType; 17] = [
        ConditionType::Eq,
        ConditionType::Neq,
        ConditionType::Gt,
        ConditionType::Gteq,
        ConditionType::Lt,
        ConditionType::Lteq,
        ConditionType::Like,
        ConditionType::Nlike,
        ConditionType::In,
        ConditionType::Nin,
        ConditionType::Null,
        ConditionType::Notnull,
        ConditionType::Finset,
        ConditionType::Nfinset,
        ConditionType::From,
        ConditionType::To,
        ConditionType::Moreq,
    ];

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            ConditionType::Eq => "eq",
            ConditionType::Neq => "neq",
            ConditionType::Gt => "gt",
            ConditionType::Gteq => "gteq",
            ConditionType::Lt => "lt",
            ConditionType::Lteq => "lteq",
            ConditionType::Like => "like",
            ConditionType::Nlike => "nlike",
            ConditionType::In => "in",
            ConditionType::Nin => "nin",
            ConditionType::Null => "null",
            ConditionType::Notnull => "notnull",
            ConditionType::Finset => "finset",
            ConditionType::Nfinset => "nfinset",
            ConditionType::From => "from",
            ConditionType::To => "to",
            ConditionType::Moreq => "moreq",
        }
    }
}

impl fmt::Display for ConditionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConditionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str() == wanted)
            .ok_or_else(|| format!("unknown condition type \"{s}\""))
    }
}

/// One comparison, e.g. `price gt 100`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCondition {
    pub field: String,
    pub value: FilterValue,
    #[serde(alias = "conditionType", alias = "condition")]
    pub condition_type: ConditionType,
}

impl FilterCondition {
    pub fn new(
        field: impl Into<String>,
        value: impl Into<FilterValue>,
        condition_type: ConditionType,
    ) -> Self {
        Self {
            field: field.into(),
            value: value.into(),
            condition_type,
        }
    }

    pub fn eq(field: impl Into<String>, value: impl Into<FilterValue>) -> Self {
        Self::new(field, value, ConditionType::Eq)
    }
}

/// Conditions combined with logical OR. Order is preserved on the wire.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterGroup {
    pub filters: Vec<FilterCondition>,
}

impl FilterGroup {
    #[must_use]
    pub fn new(filters: Vec<FilterCondition>) -> Self {
        Self { filters }
    }

    #[must_use]
    pub fn single(filter: FilterCondition) -> Self {
        Self {
            filters: vec![filter],
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SortDirection::Asc => "ASC",
            SortDirection::Desc => "DESC",
        }
    }
}

impl FromStr for SortDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortDirection::Asc),
            "DESC" => Ok(SortDirection::Desc),
            _ => Err(format!("unknown sort direction \"{s}\"")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortOrder {
    pub field: String,
    pub direction: SortDirection,
}

impl SortOrder {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

/// Page number and size.
///
/// `page` is 1-based and clamped to at least 1. `per_page == 0` is passed
/// through untouched; Magento treats it as "let the server decide".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pagination {
    page: u32,
    per_page: u32,
}

impl Pagination {
    #[must_use]
    pub fn new(page: u32, per_page: u32) -> Self {
        Self {
            page: page.max(1),
            per_page,
        }
    }

    #[must_use]
    pub fn page(self) -> u32 {
        self.page
    }

    #[must_use]
    pub fn per_page(self) -> u32 {
        self.per_page
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 20)
    }
}

/// Caller-supplied filters and sort orders, before paging and the default
/// visibility groups are added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PartialSearchCriteria {
    #[serde(alias = "filterGroups")]
    pub filter_groups: Vec<FilterGroup>,
    #[serde(alias = "sortOrders", alias = "order")]
    pub sort_orders: Vec<SortOrder>,
}

/// The complete, immutable query aggregate.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchCriteria {
    filter_groups: Vec<FilterGroup>,
    sort_orders: Vec<SortOrder>,
    page_size: u32,
    current_page: u32,
}

impl SearchCriteria {
    #[must_use]
    pub fn filter_groups(&self) -> &[FilterGroup] {
        &self.filter_groups
    }

    #[must_use]
    pub fn sort_orders(&self) -> &[SortOrder] {
        &self.sort_orders
    }

    #[must_use]
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.current_page
    }
}

/// Accumulates groups, sorts and paging, then freezes them into a
/// [`SearchCriteria`].
#[derive(Debug, Clone, Default)]
pub struct SearchCriteriaBuilder {
    filter_groups: Vec<FilterGroup>,
    sort_orders: Vec<SortOrder>,
    pagination: Pagination,
}

impl SearchCriteriaBuilder {
    #[must_use]
    pub fn new(pagination: Pagination) -> Self {
        Self {
            filter_groups: Vec::new(),
            sort_orders: Vec::new(),
            pagination,
        }
    }

    #[must_use]
    pub fn filter_group(mut self, group: FilterGroup) -> Self {
        self.filter_groups.push(group);
        self
    }

    #[must_use]
    pub fn filter_groups(mut self, groups: impl IntoIterator<Item = FilterGroup>) -> Self {
        self.filter_groups.extend(groups);
        self
    }

    #[must_use]
    pub fn sort_by(mut self, field: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_orders.push(SortOrder::new(field, direction));
        self
    }

    /// Appends every group and sort order of `partial`, keeping their order.
    #[must_use]
    pub fn with_partial(mut self, partial: &PartialSearchCriteria) -> Self {
        self.filter_groups
            .extend(partial.filter_groups.iter().cloned());
        self.sort_orders.extend(partial.sort_orders.iter().cloned());
        self
    }

    #[must_use]
    pub fn build(self) -> SearchCriteria {
        SearchCriteria {
            filter_groups: self.filter_groups,
            sort_orders: self.sort_orders,
            page_size: self.pagination.per_page(),
            current_page: self.pagination.page(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_value_renders_comma_joined() {
        let value = FilterValue::list([2, 3, 4]);
        assert_eq!(value.to_string(), "2,3,4");
    }

    #[test]
    fn scalar_values_render_plainly() {
        assert_eq!(FilterValue::from(1).to_string(), "1");
        assert_eq!(FilterValue::from("%shirt%").to_string(), "%shirt%");
        assert_eq!(FilterValue::from(19.5).to_string(), "19.5");
    }

    #[test]
    fn condition_type_parses_case_insensitively() {
        assert_eq!("EQ".parse::<ConditionType>(), Ok(ConditionType::Eq));
        assert_eq!("notnull".parse::<ConditionType>(), Ok(ConditionType::Notnull));
        assert!("between".parse::<ConditionType>().is_err());
    }

    #[test]
    fn condition_type_round_trips_through_as_str() {
        for condition in ConditionType::ALL {
            assert_eq!(condition.as_str().parse::<ConditionType>(), Ok(condition));
        }
    }

    #[test]
    fn pagination_clamps_page_but_keeps_zero_page_size() {
        let p = Pagination::new(0, 0);
        assert_eq!(p.page(), 1);
        assert_eq!(p.per_page(), 0);
    }

    #[test]
    fn builder_preserves_group_and_sort_order() {
        let partial = PartialSearchCriteria {
            filter_groups: vec![
                FilterGroup::single(FilterCondition::eq("category_id", 4)),
                FilterGroup::new(vec![
                    FilterCondition::new("price", 100, ConditionType::Gt),
                    FilterCondition::new("name", "%bag%", ConditionType::Like),
                ]),
            ],
            sort_orders: vec![SortOrder::new("name", SortDirection::Asc)],
        };

        let criteria = SearchCriteriaBuilder::new(Pagination::new(3, 25))
            .filter_group(FilterGroup::single(FilterCondition::eq("status", 1)))
            .with_partial(&partial)
            .sort_by("price", SortDirection::Desc)
            .build();

        let fields: Vec<&str> = criteria
            .filter_groups()
            .iter()
            .flat_map(|g| g.filters.iter().map(|f| f.field.as_str()))
            .collect();
        assert_eq!(fields, ["status", "category_id", "price", "name"]);
        assert_eq!(criteria.sort_orders()[0].field, "name");
        assert_eq!(criteria.sort_orders()[1].direction, SortDirection::Desc);
        assert_eq!(criteria.page_size(), 25);
        assert_eq!(criteria.current_page(), 3);
    }

    #[test]
    fn partial_criteria_deserializes_camel_case_payload() {
        let json = serde_json::json!({
            "filterGroups": [
                { "filters": [ { "field": "sku", "value": ["a", "b"], "conditionType": "in" } ] }
            ],
            "sortOrders": [ { "field": "name", "direction": "DESC" } ]
        });
        let partial: PartialSearchCriteria = serde_json::from_value(json).unwrap();
        let filter = &partial.filter_groups[0].filters[0];
        assert_eq!(filter.condition_type, ConditionType::In);
        assert_eq!(filter.value.to_string(), "a,b");
        assert_eq!(partial.sort_orders[0].direction, SortDirection::Desc);
    }
}
