use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use housing_match::catalog::{
    CatalogSource, FallbackCatalog, JsonFileCatalog, ListingsApiCatalog, SampleCatalog,
};
use housing_match::config::Config;
use housing_match::intent::{IntentExtractor, KeywordIntentParser};
use housing_match::matching::format_aed;
use housing_match::service::{MatchService, Recommendations};
use housing_match::PageRequest;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Match a housing request against a property catalog and explain every score.
#[derive(Debug, Parser)]
#[command(name = "housing-match", version)]
struct Args {
    /// Free-text request, e.g. "2 bedroom apartment in Dubai Marina under 2M"
    query: Option<String>,

    /// JSON catalog file (defaults to CATALOG_PATH)
    #[arg(long, conflicts_with = "sample")]
    catalog: Option<PathBuf>,

    /// Use the built-in sample catalog
    #[arg(long, conflicts_with = "api")]
    sample: bool,

    /// Fetch from the listings API (LISTINGS_API_URL / LISTINGS_API_KEY),
    /// falling back to the configured catalog when it fails
    #[arg(long)]
    api: bool,

    /// Page size
    #[arg(long)]
    limit: Option<i64>,

    #[arg(long)]
    offset: Option<i64>,

    /// Print the full result as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("HOUSING_MATCH_LOG").unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::from_env();

    let catalog = select_catalog(&args, &config)?;
    info!("🏠 Matching against {} catalog", catalog.source_name());

    let parser = KeywordIntentParser::new();
    let intent = parser.extract(args.query.as_deref().unwrap_or_default()).await?;
    info!(?intent, "parsed intent with {}", parser.extractor_name());

    let request = config.page_request(args.limit, args.offset);
    let service = MatchService::new(catalog).with_snapshot_ttl(config.snapshot_ttl);
    let recommendations = service.search(None, &intent, request).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&recommendations)?);
    } else {
        print_recommendations(&recommendations, request);
    }

    Ok(())
}

fn select_catalog(args: &Args, config: &Config) -> Result<Arc<dyn CatalogSource>> {
    if args.sample {
        return Ok(Arc::new(SampleCatalog::new()));
    }

    let dataset: Arc<dyn CatalogSource> = match args.catalog.as_ref().or(config.catalog_path.as_ref()) {
        Some(path) => Arc::new(JsonFileCatalog::new(path.clone())),
        None => {
            info!("No catalog file configured, using the built-in sample");
            Arc::new(SampleCatalog::new())
        }
    };

    let listings_configured = config.listings.url.is_some() && config.listings.api_key.is_some();
    if args.api || (args.catalog.is_none() && listings_configured) {
        let live = ListingsApiCatalog::from_config(&config.listings)?;
        return Ok(Arc::new(FallbackCatalog::new(Arc::new(live), dataset)));
    }
    Ok(dataset)
}

fn print_recommendations(recommendations: &Recommendations, request: PageRequest) {
    println!("{}\n", recommendations.text);

    let offset = recommendations.pagination.offset;
    for (i, result) in recommendations.results.iter().enumerate() {
        let property = &result.scored.property;
        let price = property
            .listed_price()
            .map(format_aed)
            .unwrap_or_else(|| "Price on request".to_string());

        println!(
            "{}. {} [{}/100]",
            offset + i + 1,
            property.title.as_deref().unwrap_or(&property.id),
            result.display_score
        );
        println!("   {} · {}", property.display_location(), price);
        println!(
            "   {} · {} BR{}",
            property.property_type,
            property.bedrooms,
            property
                .status
                .as_deref()
                .map(|s| format!(" · {}", s))
                .unwrap_or_default()
        );
        for item in &result.scored.breakdown {
            println!(
                "   {:>5.1}/{:<2} {:<13} {}",
                item.points,
                item.weight,
                item.factor.label(),
                item.explanation
            );
        }
        println!("   Why: {}", result.reasons.join("; "));
        println!();
    }

    let pagination = &recommendations.pagination;
    if let Some(next) = request.next_after(pagination) {
        println!(
            "Showing {}-{} of {}. Next page: --limit {} --offset {}",
            pagination.offset + 1,
            pagination.offset + pagination.current_count,
            pagination.total,
            next.limit(),
            next.offset()
        );
    }
}
