//! Rendering of search criteria into Magento's bracketed query-string grammar.
//!
//! ```text
//! searchCriteria[filterGroups][<g>][filters][<f>][field|value|condition_type]
//! searchCriteria[sortOrders][<s>][field|direction]
//! searchCriteria[pageSize]
//! searchCriteria[currentPage]
//! ```
//!
//! All bracket keys are produced by the `*_key` helpers below and nowhere
//! else. [`QueryParams::serialize`] writes values verbatim for logging and
//! display; [`QueryParams::to_url_query`] is what goes on the wire.
//! Serialized strings never end with `&`, and parameter sets are joined with
//! [`QueryParams::extend`] rather than by string concatenation.

use std::fmt;

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::criteria::{
    FilterGroup, Pagination, PartialSearchCriteria, SearchCriteria, SearchCriteriaBuilder,
    SortOrder,
};

const ROOT: &str = "searchCriteria";
const ADDITIONAL_ATTRIBUTES_KEY: &str = "additionalAttributes[]";

/// Characters escaped in query keys and values. Brackets and commas stay
/// literal so the grammar remains readable in access logs.
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~')
    .remove(b'[')
    .remove(b']')
    .remove(b',');

/// An ordered list of query-string pairs. Keys may repeat.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryParams {
    pairs: Vec<(String, String)>,
}

impl QueryParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, key: impl Into<String>, value: impl fmt::Display) {
        self.pairs.push((key.into(), value.to_string()));
    }

    /// Appends every pair of `other` after the existing ones.
    pub fn extend(&mut self, other: QueryParams) {
        self.pairs.extend(other.pairs);
    }

    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Renders `k1=v1&k2=v2`, with no leading or trailing separator.
    #[must_use]
    pub fn serialize(&self) -> String {
        self.to_string()
    }

    /// Like [`serialize`](Self::serialize) but with keys and values
    /// percent-encoded, so `&`, `=`, `%` and spaces inside values survive.
    #[must_use]
    pub fn to_url_query(&self) -> String {
        self.pairs
            .iter()
            .map(|(key, value)| {
                format!(
                    "{}={}",
                    utf8_percent_encode(key, QUERY_ENCODE_SET),
                    utf8_percent_encode(value, QUERY_ENCODE_SET)
                )
            })
            .collect::<Vec<_>>()
            .join("&")
    }
}

impl fmt::Display for QueryParams {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (idx, (key, value)) in self.pairs.iter().enumerate() {
            if idx > 0 {
                f.write_str("&")?;
            }
            write!(f, "{key}={value}")?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FilterPart {
    Field,
    Value,
    ConditionType,
}

impl FilterPart {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            FilterPart::Field => "field",
            FilterPart::Value => "value",
            FilterPart::ConditionType => "condition_type",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SortPart {
    Field,
    Direction,
}

impl SortPart {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            SortPart::Field => "field",
            SortPart::Direction => "direction",
        }
    }
}

pub(crate) fn filter_key(group: usize, filter: usize, part: FilterPart) -> String {
    format!(
        "{ROOT}[filterGroups][{group}][filters][{filter}][{}]",
        part.as_str()
    )
}

pub(crate) fn sort_key(index: usize, part: SortPart) -> String {
    format!("{ROOT}[sortOrders][{index}][{}]", part.as_str())
}

pub(crate) fn scalar_key(name: &str) -> String {
    format!("{ROOT}[{name}]")
}

/// Encodes `groups` with indices starting at `group_offset`.
///
/// Group `i` of the input becomes group `group_offset + i`; filters inside a
/// group are numbered from 0 in input order. A group with no filters has no
/// wire form and is skipped without consuming an index.
#[must_use]
pub fn encode_filter_groups(groups: &[FilterGroup], group_offset: usize) -> QueryParams {
    let mut params = QueryParams::new();
    let non_empty = groups.iter().filter(|g| !g.filters.is_empty());
    for (group_idx, group) in non_empty.enumerate() {
        let g = group_offset + group_idx;
        for (f, filter) in group.filters.iter().enumerate() {
            params.push(filter_key(g, f, FilterPart::Field), &filter.field);
            params.push(filter_key(g, f, FilterPart::Value), &filter.value);
            params.push(
                filter_key(g, f, FilterPart::ConditionType),
                filter.condition_type,
            );
        }
    }
    params
}

#[must_use]
pub fn encode_sort_orders(sort_orders: &[SortOrder]) -> QueryParams {
    let mut params = QueryParams::new();
    for (idx, order) in sort_orders.iter().enumerate() {
        params.push(sort_key(idx, SortPart::Field), &order.field);
        params.push(sort_key(idx, SortPart::Direction), order.direction.as_str());
    }
    params
}

/// Encodes a whole [`SearchCriteria`]: groups (from `group_offset`), sort
/// orders, then the flat `pageSize` and `currentPage` keys.
#[must_use]
pub fn encode_search_criteria(criteria: &SearchCriteria, group_offset: usize) -> QueryParams {
    let mut params = encode_filter_groups(criteria.filter_groups(), group_offset);
    params.extend(encode_sort_orders(criteria.sort_orders()));
    params.push(scalar_key("pageSize"), criteria.page_size());
    params.push(scalar_key("currentPage"), criteria.current_page());
    params
}

/// Builds the caller-controlled part of a product search.
///
/// The caller's groups start at `group_offset`, directly after whatever
/// default groups occupy `0..group_offset`. When `additional_attributes` is
/// `Some`, one `additionalAttributes[]` pair per code is appended; when
/// `None` the key is omitted entirely.
#[must_use]
pub fn build_search_params(
    filters: &PartialSearchCriteria,
    pagination: Pagination,
    group_offset: usize,
    additional_attributes: Option<&[String]>,
) -> QueryParams {
    let criteria = SearchCriteriaBuilder::new(pagination)
        .with_partial(filters)
        .build();
    let mut params = encode_search_criteria(&criteria, group_offset);

    if let Some(codes) = additional_attributes {
        for code in codes {
            params.push(ADDITIONAL_ATTRIBUTES_KEY, code);
        }
    }
    params
}

#[cfg(test)]
#[path = "query_test.rs"]
mod tests;
