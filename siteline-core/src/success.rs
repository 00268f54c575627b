//! Bayesian-shrunk success index.
//!
//! The raw star rating of a business with few reviews is noisy. The index
//! pulls the rating towards a prior mean when the review count is small and
//! towards the observed rating as it grows:
//!
//! ```text
//! success_index = (review_count * stars + prior_weight * prior_mean)
//!               / (review_count + prior_weight)
//! ```

use thiserror::Error;

use crate::business::Business;

/// Default prior mean: the assumed global average rating.
pub const DEFAULT_PRIOR_MEAN: f64 = 3.5;

/// Default prior weight: reviews needed before the raw rating is trusted
/// over the prior.
pub const DEFAULT_PRIOR_WEIGHT: f64 = 50.0;

/// Errors raised while computing success indexes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SuccessError {
    /// A business lacks `stars` or `review_count`.
    ///
    /// The formula cannot degrade gracefully; silently defaulting would
    /// bias the prior, so the run aborts and the caller decides whether to
    /// exclude or impute upstream.
    #[error("business {id} lacks stars or review_count; cannot compute success index")]
    MissingRating {
        /// Identifier of the offending business.
        id: String,
    },
    /// `PriorMean::DatasetMean` was requested but no business carries a
    /// rating to average.
    #[error("cannot derive the dataset prior mean: no business carries a rating")]
    NoRatedBusinesses,
}

/// Error raised when parsing a prior-mean setting from text.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("invalid prior mean `{input}`: expected a finite number or `dataset`")]
pub struct PriorMeanParseError {
    /// The rejected input.
    pub input: String,
}

/// Where the prior mean comes from.
///
/// The two observed conventions differ here, so the choice is explicit
/// configuration rather than a silent default.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PriorMean {
    /// A fixed global constant, independent of the dataset.
    Fixed(f64),
    /// The arithmetic mean of `stars` over the run's business collection.
    DatasetMean,
}

impl Default for PriorMean {
    fn default() -> Self {
        Self::Fixed(DEFAULT_PRIOR_MEAN)
    }
}

impl std::str::FromStr for PriorMean {
    type Err = PriorMeanParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.eq_ignore_ascii_case("dataset") || trimmed.eq_ignore_ascii_case("dataset-mean")
        {
            return Ok(Self::DatasetMean);
        }
        match trimmed.parse::<f64>() {
            Ok(value) if value.is_finite() => Ok(Self::Fixed(value)),
            _ => Err(PriorMeanParseError {
                input: s.to_owned(),
            }),
        }
    }
}

impl PriorMean {
    /// Resolve the prior mean against the run's business collection.
    ///
    /// # Errors
    /// Returns [`SuccessError::NoRatedBusinesses`] when `DatasetMean` is
    /// requested and no business has a `stars` value.
    #[expect(
        clippy::float_arithmetic,
        clippy::cast_precision_loss,
        reason = "averaging star ratings; collection sizes fit in f64 exactly"
    )]
    pub fn resolve(&self, businesses: &[Business]) -> Result<f64, SuccessError> {
        match self {
            Self::Fixed(value) => Ok(*value),
            Self::DatasetMean => {
                let ratings: Vec<f64> = businesses.iter().filter_map(|b| b.stars).collect();
                if ratings.is_empty() {
                    return Err(SuccessError::NoRatedBusinesses);
                }
                Ok(ratings.iter().sum::<f64>() / ratings.len() as f64)
            }
        }
    }
}

/// Parameters of the success-index calculation.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SuccessParams {
    /// Source of the prior mean.
    pub prior_mean: PriorMean,
    /// Minimum-review threshold weighting the prior.
    pub prior_weight: f64,
}

impl Default for SuccessParams {
    fn default() -> Self {
        Self {
            prior_mean: PriorMean::default(),
            prior_weight: DEFAULT_PRIOR_WEIGHT,
        }
    }
}

impl SuccessParams {
    /// Compute the success index for one business against a resolved prior.
    ///
    /// # Errors
    /// Returns [`SuccessError::MissingRating`] when `stars` or
    /// `review_count` is absent.
    pub fn index_for(&self, business: &Business, prior_mean: f64) -> Result<f64, SuccessError> {
        match (business.stars, business.review_count) {
            (Some(stars), Some(review_count)) => {
                Ok(success_index(stars, review_count, prior_mean, self.prior_weight))
            }
            _ => Err(SuccessError::MissingRating {
                id: business.id.clone(),
            }),
        }
    }
}

/// The Bayesian weighted-rating formula.
///
/// A convex combination of `stars` and `prior_mean`: zero reviews give
/// exactly the prior mean, and the result approaches `stars` as the review
/// count grows.
///
/// # Examples
/// ```
/// use siteline_core::success_index;
///
/// assert_eq!(success_index(5.0, 0, 3.5, 50.0), 3.5);
/// assert_eq!(success_index(5.0, 450, 3.5, 50.0), 4.85);
/// ```
#[expect(
    clippy::float_arithmetic,
    reason = "the weighted-rating formula is floating-point by nature"
)]
#[must_use]
pub fn success_index(stars: f64, review_count: u32, prior_mean: f64, prior_weight: f64) -> f64 {
    let count = f64::from(review_count);
    (count * stars + prior_weight * prior_mean) / (count + prior_weight)
}
