//! Value parsers for filter and sort flags.
//!
//! `--filter` takes `FIELD:CONDITION:VALUE`; the value may itself contain
//! `:`. For `in`, `nin` and `finset` the value is a comma-separated list.
//! `--sort` takes `FIELD:ASC` or `FIELD:DESC`, defaulting to `ASC` when the
//! direction is omitted.

use magebridge_client::{
    ConditionType, FilterCondition, FilterValue, ScalarValue, SortDirection, SortOrder,
};

/// Values are kept exactly as typed; `007` must not become `7`.
pub(crate) fn parse_scalar(raw: &str) -> ScalarValue {
    ScalarValue::Text(raw.to_owned())
}

pub(crate) fn parse_filter(raw: &str) -> Result<FilterCondition, String> {
    let mut parts = raw.splitn(3, ':');
    let (Some(field), Some(condition), Some(value)) = (parts.next(), parts.next(), parts.next())
    else {
        return Err(format!("expected FIELD:CONDITION:VALUE, got \"{raw}\""));
    };
    if field.is_empty() {
        return Err(format!("empty field name in \"{raw}\""));
    }
    let condition: ConditionType = condition.parse()?;
    let value = match condition {
        ConditionType::In | ConditionType::Nin | ConditionType::Finset => {
            FilterValue::list(value.split(',').map(parse_scalar))
        }
        _ => FilterValue::Scalar(parse_scalar(value)),
    };
    Ok(FilterCondition::new(field, value, condition))
}

pub(crate) fn parse_sort(raw: &str) -> Result<SortOrder, String> {
    let (field, direction) = match raw.split_once(':') {
        Some((field, dir)) => (field, dir.parse::<SortDirection>()?),
        None => (raw, SortDirection::Asc),
    };
    if field.is_empty() {
        return Err(format!("empty sort field in \"{raw}\""));
    }
    Ok(SortOrder::new(field, direction))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filter_with_scalar_value() {
        let filter = parse_filter("category_id:eq:12").unwrap();
        assert_eq!(filter.field, "category_id");
        assert_eq!(filter.condition_type, ConditionType::Eq);
        assert_eq!(filter.value, FilterValue::Scalar(ScalarValue::from("12")));
    }

    #[test]
    fn numeric_looking_values_keep_their_spelling() {
        assert_eq!(parse_filter("sku:eq:007").unwrap().value.to_string(), "007");
        assert_eq!(parse_filter("sku:in:00123,+5").unwrap().value.to_string(), "00123,+5");
        assert_eq!(parse_scalar("02"), ScalarValue::from("02"));
        assert_eq!(parse_scalar("-0"), ScalarValue::from("-0"));
    }

    #[test]
    fn filter_value_may_contain_colons() {
        let filter = parse_filter("created_at:gteq:2024-01-01 00:00:00").unwrap();
        assert_eq!(filter.value.to_string(), "2024-01-01 00:00:00");
    }

    #[test]
    fn in_filter_splits_list() {
        let filter = parse_filter("sku:in:MH01,MH02").unwrap();
        assert_eq!(
            filter.value,
            FilterValue::List(vec![ScalarValue::from("MH01"), ScalarValue::from("MH02")])
        );
    }

    #[test]
    fn condition_is_case_insensitive() {
        assert_eq!(parse_filter("name:LIKE:%bag%").unwrap().condition_type, ConditionType::Like);
    }

    #[test]
    fn malformed_filters_are_rejected() {
        assert!(parse_filter("name").is_err());
        assert!(parse_filter("name:like").is_err());
        assert!(parse_filter(":eq:1").is_err());
        assert!(parse_filter("name:between:1").is_err());
    }

    #[test]
    fn sort_defaults_to_ascending() {
        let order = parse_sort("name").unwrap();
        assert_eq!(order.direction, SortDirection::Asc);
        assert_eq!(parse_sort("price:desc").unwrap().direction, SortDirection::Desc);
        assert!(parse_sort("price:sideways").is_err());
        assert!(parse_sort(":ASC").is_err());
    }
}
