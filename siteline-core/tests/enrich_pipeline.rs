//! End-to-end behaviour of the enrichment pipeline.

use approx::assert_abs_diff_eq;
use geo::Coord;
use siteline_core::{
    Business, BusinessCollection, Crs, EnrichConfig, EnrichError, Enricher, Poi, PoiCollection,
    PriorMean, SuccessError, SuccessParams,
};

fn rated_cafe(id: &str, lon: f64, lat: f64, stars: f64, review_count: u32) -> Business {
    Business::new(id, Coord { x: lon, y: lat })
        .with_categories(Business::parse_categories("cafe"))
        .with_rating(stars, review_count)
}

fn geographic(records: Vec<Business>) -> BusinessCollection {
    BusinessCollection::new(Crs::Wgs84, records)
}

fn no_pois() -> PoiCollection {
    PoiCollection::new(Crs::Wgs84, Vec::new())
}

#[test]
fn output_is_geographic_and_keyed_by_input_order() {
    let businesses = geographic(vec![
        rated_cafe("first", -87.65, 41.85, 4.0, 10),
        rated_cafe("second", -87.66, 41.86, 3.0, 20),
    ]);
    let pois = PoiCollection::new(
        Crs::Wgs84,
        vec![Poi::new(Coord { x: -87.6501, y: 41.8501 }, "supermarket")],
    );

    let enriched = Enricher::new(EnrichConfig::default())
        .enrich(businesses, pois)
        .expect("pipeline should succeed");

    assert_eq!(enriched.crs(), Crs::Wgs84);
    let ids: Vec<_> = enriched.records().iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["first", "second"]);

    // Locations round-trip back to the original degrees.
    let first = enriched.records().first().expect("two records");
    assert_abs_diff_eq!(first.location.x, -87.65, epsilon = 1e-6);
    assert_abs_diff_eq!(first.location.y, 41.85, epsilon = 1e-6);
    // The nearby supermarket registers under `shopping`.
    assert_eq!(first.poi_densities.get("shopping"), Some(&1));
}

#[test]
fn success_index_matches_the_bayesian_formula() {
    let businesses = geographic(vec![
        rated_cafe("unreviewed", 0.0, 0.0, 5.0, 0),
        rated_cafe("established", 0.5, 0.5, 5.0, 450),
    ]);

    let enriched = Enricher::new(EnrichConfig::default())
        .enrich(businesses, no_pois())
        .expect("pipeline should succeed");

    let by_id = |id: &str| {
        enriched
            .records()
            .iter()
            .find(|r| r.id == id)
            .expect("record present")
            .success_index
    };
    // Zero reviews collapse to the prior mean exactly.
    assert_eq!(by_id("unreviewed"), 3.5);
    // (450 * 5 + 50 * 3.5) / 500
    assert_abs_diff_eq!(by_id("established"), 4.85, epsilon = 1e-12);
}

#[test]
fn dataset_prior_mean_uses_the_collection_average() {
    let businesses = geographic(vec![
        rated_cafe("low", 0.0, 0.0, 2.0, 0),
        rated_cafe("high", 1.0, 1.0, 4.0, 0),
    ]);
    let config = EnrichConfig {
        prior: SuccessParams {
            prior_mean: PriorMean::DatasetMean,
            prior_weight: 50.0,
        },
        ..EnrichConfig::default()
    };

    let enriched = Enricher::new(config)
        .enrich(businesses, no_pois())
        .expect("pipeline should succeed");

    // Both have zero reviews, so both collapse to the dataset mean of 3.0.
    for record in enriched.records() {
        assert_abs_diff_eq!(record.success_index, 3.0, epsilon = 1e-12);
    }
}

#[test]
fn missing_rating_aborts_the_run() {
    let businesses = geographic(vec![
        rated_cafe("rated", 0.0, 0.0, 4.0, 10),
        Business::new("unrated", Coord { x: 0.1, y: 0.1 })
            .with_categories(Business::parse_categories("cafe")),
    ]);

    let result = Enricher::new(EnrichConfig::default()).enrich(businesses, no_pois());
    assert_eq!(
        result,
        Err(EnrichError::Success(SuccessError::MissingRating {
            id: String::from("unrated")
        }))
    );
}

#[test]
fn region_filter_restricts_the_business_set() {
    let businesses = geographic(vec![
        rated_cafe("keep", 0.0, 0.0, 4.0, 10).with_region("PA"),
        rated_cafe("drop", 1.0, 1.0, 4.0, 10).with_region("NV"),
    ]);
    let config = EnrichConfig {
        region_filter: Some(String::from("PA")),
        ..EnrichConfig::default()
    };

    let enriched = Enricher::new(config)
        .enrich(businesses, no_pois())
        .expect("pipeline should succeed");

    assert_eq!(enriched.len(), 1);
    assert_eq!(
        enriched.records().first().map(|r| r.id.as_str()),
        Some("keep")
    );
}

#[test]
fn empty_business_collection_yields_an_empty_result() {
    let enriched = Enricher::new(EnrichConfig::default())
        .enrich(geographic(Vec::new()), no_pois())
        .expect("empty input is not an error");
    assert!(enriched.is_empty());
}

#[test]
fn competitors_are_counted_through_the_whole_pipeline() {
    let businesses = geographic(vec![
        rated_cafe("subject", 0.0, 0.0, 4.0, 10),
        rated_cafe("rival", 0.0, 0.005, 4.0, 10),
    ]);

    let enriched = Enricher::new(EnrichConfig::default())
        .enrich(businesses, no_pois())
        .expect("pipeline should succeed");

    for record in enriched.records() {
        assert_eq!(record.competitor_density, 1);
    }
}
