mod args;
mod commands;

use clap::{Parser, Subcommand};
use magebridge_client::{FilterCondition, SortOrder};
use magebridge_core::MagentoVersion;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "magebridge-cli")]
#[command(about = "Query a Magento 2 catalog over REST")]
struct Cli {
    /// Store id to scope requests to (overrides MAGENTO_STORE_ID)
    #[arg(long, global = true)]
    store_id: Option<u32>,
    /// Magento release, e.g. 2.4.6 (overrides MAGENTO_VERSION)
    #[arg(long, global = true)]
    magento_version: Option<MagentoVersion>,
    #[command(subcommand)]
    command: Commands,
}

/// Filters and paging shared by the product search commands.
#[derive(Debug, Clone, clap::Args)]
struct SearchArgs {
    #[arg(long, default_value_t = 1)]
    page: u32,
    /// Page size; 0 lets Magento decide
    #[arg(long, default_value_t = 20)]
    per_page: u32,
    /// FIELD:CONDITION:VALUE; each flag is its own AND group
    #[arg(long = "filter", value_parser = args::parse_filter)]
    filters: Vec<FilterCondition>,
    /// FIELD[:ASC|DESC], repeatable
    #[arg(long = "sort", value_parser = args::parse_sort)]
    sorts: Vec<SortOrder>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Search enabled, visible products
    Products {
        #[command(flatten)]
        search: SearchArgs,
        /// Query the dcapi extension endpoint and request these attributes
        #[arg(long = "attribute")]
        attributes: Option<Vec<String>>,
    },
    /// Fetch one product by SKU
    Product {
        #[arg(long)]
        sku: String,
    },
    /// Fetch the stock item for a SKU
    Stock {
        #[arg(long)]
        sku: String,
    },
    /// Layered-navigation filters, optionally for one category
    ProductFilters {
        #[arg(long)]
        category_id: Option<i64>,
    },
    /// Active category tree
    Categories,
    /// Fetch one category by id, unpruned
    Category {
        #[arg(long)]
        id: i64,
    },
    /// Options of an attribute matching the given values
    AttributeValues {
        #[arg(long)]
        attribute_id: String,
        #[arg(long = "value", value_parser = parse_scalar_arg)]
        values: Vec<magebridge_client::ScalarValue>,
    },
    /// Child products of a configurable product
    Children {
        #[arg(long)]
        sku: String,
    },
    /// Attributes of an attribute set
    AttributeSet {
        #[arg(long)]
        id: i64,
    },
    /// List store groups
    StoreGroups,
    /// List store views with their configuration
    StoreConfigs,
    /// Print the product search query string without sending it
    Criteria {
        #[command(flatten)]
        search: SearchArgs,
        #[arg(long = "attribute")]
        attributes: Option<Vec<String>>,
    },
}

#[allow(clippy::unnecessary_wraps)]
fn parse_scalar_arg(raw: &str) -> Result<magebridge_client::ScalarValue, String> {
    Ok(args::parse_scalar(raw))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    if let Commands::Criteria { search, attributes } = &cli.command {
        init_tracing("warn")?;
        let scope = commands::offline_scope(cli.store_id, cli.magento_version);
        return commands::print_criteria(scope, search, attributes.as_deref());
    }

    let config = magebridge_core::load_config()?;
    init_tracing(&config.log_level)?;
    let scope = commands::scope_from(&config, cli.store_id, cli.magento_version);
    tracing::debug!(?config, store_id = scope.store_id, version = %scope.version, "config loaded");

    let client = magebridge_client::MagentoClient::from_config(&config)?;
    commands::run(&client, scope, cli.command).await
}

fn init_tracing(level: &str) -> anyhow::Result<()> {
    let env_filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}

#[cfg(test)]
mod tests;
