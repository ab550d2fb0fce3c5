use super::*;
use magebridge_client::{ConditionType, ScalarValue, SortDirection};

#[test]
fn parses_products_with_filters_and_sort() {
    let cli = Cli::try_parse_from([
        "magebridge-cli",
        "products",
        "--page",
        "3",
        "--per-page",
        "50",
        "--filter",
        "category_id:eq:12",
        "--filter",
        "price:gt:100",
        "--sort",
        "name:DESC",
    ])
    .expect("expected valid cli args");

    let Commands::Products { search, attributes } = cli.command else {
        panic!("expected products command");
    };
    assert!(attributes.is_none());
    assert_eq!(search.page, 3);
    assert_eq!(search.per_page, 50);
    assert_eq!(search.filters.len(), 2);
    assert_eq!(search.filters[1].condition_type, ConditionType::Gt);
    assert_eq!(search.sorts[0].direction, SortDirection::Desc);

    let criteria = search.criteria();
    assert_eq!(criteria.filter_groups.len(), 2);
    assert_eq!(criteria.filter_groups[0].filters.len(), 1);
}

#[test]
fn products_with_attributes_selects_extension() {
    let cli = Cli::try_parse_from([
        "magebridge-cli",
        "products",
        "--attribute",
        "brand",
        "--attribute",
        "color",
    ])
    .expect("expected valid cli args");
    let Commands::Products { attributes, search } = cli.command else {
        panic!("expected products command");
    };
    assert_eq!(attributes, Some(vec!["brand".to_owned(), "color".to_owned()]));
    assert_eq!(search.per_page, 20);
}

#[test]
fn global_overrides_parse_after_subcommand() {
    let cli = Cli::try_parse_from([
        "magebridge-cli",
        "categories",
        "--store-id",
        "7",
        "--magento-version",
        "2.1.18",
    ])
    .expect("expected valid cli args");
    assert!(matches!(cli.command, Commands::Categories));
    assert_eq!(cli.store_id, Some(7));
    assert_eq!(cli.magento_version, Some(MagentoVersion::new(2, 1, 18)));
}

#[test]
fn attribute_values_accepts_mixed_values() {
    let cli = Cli::try_parse_from([
        "magebridge-cli",
        "attribute-values",
        "--attribute-id",
        "color",
        "--value",
        "49",
        "--value",
        "02",
        "--value",
        "red",
    ])
    .expect("expected valid cli args");
    let Commands::AttributeValues {
        attribute_id,
        values,
    } = cli.command
    else {
        panic!("expected attribute-values command");
    };
    assert_eq!(attribute_id, "color");
    assert_eq!(
        values,
        [ScalarValue::from("49"), ScalarValue::from("02"), ScalarValue::from("red")]
    );
}

#[test]
fn rejects_malformed_filter() {
    assert!(Cli::try_parse_from(["magebridge-cli", "products", "--filter", "name"]).is_err());
}

#[test]
fn rejects_bad_version() {
    assert!(
        Cli::try_parse_from(["magebridge-cli", "categories", "--magento-version", "latest"])
            .is_err()
    );
}

#[test]
fn subcommand_is_required() {
    assert!(Cli::try_parse_from(["magebridge-cli"]).is_err());
}

#[test]
fn criteria_scope_prefers_flags() {
    let scope = commands::offline_scope(Some(9), Some(MagentoVersion::new(2, 3, 0)));
    assert_eq!(scope.store_id, 9);
    assert!(scope.supports_store_filter());
}
