//! Command-line interface for the Siteline enrichment pipeline.
#![forbid(unsafe_code)]

use std::fs::File;
use std::io::BufWriter;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use siteline_core::{
    CategoryTaxonomy, DEFAULT_PRIOR_WEIGHT, DEFAULT_RADIUS_M, EnrichConfig, EnrichedCollection,
    Enricher, PriorMean, SuccessParams,
};
use siteline_data::{
    BusinessSchema, PoiSchema, read_businesses, read_pois, write_enriched_csv,
};

mod error;
pub use error::CliError;

/// Run the Siteline CLI with the current process arguments.
///
/// # Errors
/// Returns [`CliError`] when argument parsing, ingestion, enrichment, or
/// export fails.
pub fn run() -> Result<(), CliError> {
    let cli = Cli::try_parse().map_err(CliError::ArgumentParsing)?;
    match cli.command {
        Command::Enrich(args) => run_enrich(&args),
    }
}

#[derive(Debug, Parser)]
#[command(
    name = "siteline",
    about = "Neighbourhood feature engineering for business success modelling",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Enrich a business table with density and success-index features.
    Enrich(EnrichArgs),
}

/// Output format for the enriched table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    /// Row-per-business CSV with one density column per category.
    Csv,
    /// JSON array of enriched records.
    Json,
}

/// CLI arguments for the `enrich` subcommand.
#[derive(Debug, Clone, Parser)]
#[command(about = "Annotate businesses with nearby POI and competitor densities")]
struct EnrichArgs {
    /// Path to the business CSV.
    #[arg(long, value_name = "path")]
    businesses: Utf8PathBuf,
    /// Path to the POI CSV.
    #[arg(long, value_name = "path")]
    pois: Utf8PathBuf,
    /// Destination for the enriched table.
    #[arg(long, short = 'o', value_name = "path")]
    output: Utf8PathBuf,
    /// Buffer radius in metres.
    #[arg(long, default_value_t = DEFAULT_RADIUS_M)]
    radius: f64,
    /// Restrict the business table to one region code before enrichment.
    #[arg(long, value_name = "code")]
    region: Option<String>,
    /// Prior mean for the success index: a fixed value such as 3.5, or
    /// `dataset` to derive it from the business collection.
    #[arg(long, default_value = "3.5", value_name = "value|dataset")]
    prior_mean: PriorMean,
    /// Review-count threshold at which the raw rating outweighs the prior.
    #[arg(long, default_value_t = DEFAULT_PRIOR_WEIGHT)]
    prior_weight: f64,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
    format: OutputFormat,
    /// Header name of the business longitude column.
    #[arg(long, default_value = "longitude", value_name = "name")]
    business_lon_column: String,
    /// Header name of the business latitude column.
    #[arg(long, default_value = "latitude", value_name = "name")]
    business_lat_column: String,
    /// Header name of the POI longitude column.
    #[arg(long, default_value = "lon", value_name = "name")]
    poi_lon_column: String,
    /// Header name of the POI latitude column.
    #[arg(long, default_value = "lat", value_name = "name")]
    poi_lat_column: String,
}

fn run_enrich(args: &EnrichArgs) -> Result<(), CliError> {
    let business_schema = BusinessSchema {
        longitude: args.business_lon_column.clone(),
        latitude: args.business_lat_column.clone(),
        ..BusinessSchema::default()
    };
    let poi_schema = PoiSchema {
        longitude: args.poi_lon_column.clone(),
        latitude: args.poi_lat_column.clone(),
        ..PoiSchema::default()
    };

    let businesses = read_businesses(&args.businesses, &business_schema)?;
    let pois = read_pois(&args.pois, &poi_schema)?;
    log::info!(
        "loaded {} businesses and {} POIs",
        businesses.len(),
        pois.len()
    );

    let config = EnrichConfig {
        radius_m: args.radius,
        taxonomy: CategoryTaxonomy::default(),
        prior: SuccessParams {
            prior_mean: args.prior_mean,
            prior_weight: args.prior_weight,
        },
        region_filter: args.region.clone(),
    };
    let enriched = Enricher::new(config).enrich(businesses, pois)?;

    match args.format {
        OutputFormat::Csv => write_enriched_csv(&args.output, &enriched, &business_schema)?,
        OutputFormat::Json => write_json(&args.output, &enriched)?,
    }
    log::info!("wrote {} enriched businesses to {}", enriched.len(), args.output);
    Ok(())
}

fn write_json(path: &Utf8PathBuf, enriched: &EnrichedCollection) -> Result<(), CliError> {
    let file = File::create(path.as_std_path()).map_err(|source| CliError::CreateOutput {
        path: path.clone(),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), enriched.records())
        .map_err(CliError::SerializeJson)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn parse(args: &[&str]) -> EnrichArgs {
        let cli = Cli::try_parse_from(args).expect("valid arguments");
        match cli.command {
            Command::Enrich(enrich) => enrich,
        }
    }

    const MINIMAL: [&str; 8] = [
        "siteline",
        "enrich",
        "--businesses",
        "b.csv",
        "--pois",
        "p.csv",
        "-o",
        "out.csv",
    ];

    #[rstest]
    fn minimal_invocation_uses_defaults() {
        let args = parse(&MINIMAL);
        assert_eq!(args.radius, DEFAULT_RADIUS_M);
        assert_eq!(args.prior_mean, PriorMean::Fixed(3.5));
        assert_eq!(args.prior_weight, DEFAULT_PRIOR_WEIGHT);
        assert_eq!(args.format, OutputFormat::Csv);
        assert_eq!(args.region, None);
    }

    #[rstest]
    fn dataset_prior_mean_is_recognised() {
        let mut argv = MINIMAL.to_vec();
        argv.extend(["--prior-mean", "dataset"]);
        assert_eq!(parse(&argv).prior_mean, PriorMean::DatasetMean);
    }

    #[rstest]
    fn invalid_prior_mean_is_rejected() {
        let mut argv = MINIMAL.to_vec();
        argv.extend(["--prior-mean", "average"]);
        assert!(Cli::try_parse_from(&argv).is_err());
    }

    #[rstest]
    fn column_overrides_reach_the_schemas() {
        let mut argv = MINIMAL.to_vec();
        argv.extend(["--business-lon-column", "lng", "--format", "json"]);
        let args = parse(&argv);
        assert_eq!(args.business_lon_column, "lng");
        assert_eq!(args.format, OutputFormat::Json);
    }

    #[rstest]
    fn enrich_writes_a_csv_end_to_end() {
        let dir = tempfile::TempDir::new().expect("temp dir");
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).expect("utf-8 path");
        let businesses = base.join("businesses.csv");
        let pois = base.join("pois.csv");
        let output = base.join("enriched.csv");
        std::fs::write(
            &businesses,
            "business_id,longitude,latitude,categories,stars,review_count,state\n\
             b1,0.0,0.0,cafe,5.0,450,PA\n\
             b2,0.0,0.005,\"cafe, bakery\",4.0,10,PA\n",
        )
        .expect("write businesses");
        std::fs::write(&pois, "lat,lon,type\n0.001,0.0,bus_stop\n").expect("write pois");

        let args = parse(&[
            "siteline",
            "enrich",
            "--businesses",
            businesses.as_str(),
            "--pois",
            pois.as_str(),
            "-o",
            output.as_str(),
        ]);
        run_enrich(&args).expect("pipeline succeeds");

        let contents = std::fs::read_to_string(&output).expect("read output");
        let mut lines = contents.lines();
        let header = lines.next().expect("header row");
        assert!(header.contains("competitor_density"));
        assert!(header.contains("transport_density"));
        assert!(!header.contains("stars"));
        let first = lines.next().expect("first business");
        // b1: one competitor, one transport POI, (450*5 + 50*3.5) / 500.
        assert!(first.starts_with("b1,"));
        assert!(first.contains("4.85"));
    }
}
